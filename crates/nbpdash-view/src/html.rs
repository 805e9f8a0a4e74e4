use crate::labels::{format_ratio, Labels};
use crate::page::{
    PageSnapshot, ServiceCard, CONNECTION_STATUS_ID, LAST_UPDATE_ID, SERVICE_DETAIL_ID,
    SERVICE_LIST_ID,
};

/// Render a full HTML document for a page snapshot.
///
/// Clicking a card posts to `/api/select/{id}`; the page reloads itself every
/// `refresh_ms` to pick up the controller's latest render.
pub fn render_page(page: &PageSnapshot, labels: &Labels, refresh_ms: u64) -> String {
    let cards: String = page.service_list.iter().map(render_card).collect();

    let detail_style = if page.service_detail.visible {
        ""
    } else {
        " style=\"display:none\""
    };
    let detail_body = match (&page.service_detail.service_id, &page.service_detail.content) {
        (Some(id), Some(content)) => format!(
            "<h2>{title} [{id}]</h2><pre>{content}</pre>",
            title = html_escape(labels.detail_title),
            id = html_escape(id.as_str()),
            content = html_escape(content),
        ),
        _ => format!("<h2>{}</h2>", html_escape(labels.detail_title)),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<div class="header">
  <h1>{title}</h1>
  <div class="status">
    <span id="{conn_id}" class="{conn_class}">{conn_text}</span>
    <span id="{update_id}">{last_update}</span>
  </div>
</div>
<div id="{list_id}" class="grid">{cards}</div>
<div id="{detail_id}" class="detail"{detail_style}>{detail_body}</div>
<script>
document.querySelectorAll('.service-card').forEach(card => {{
  card.addEventListener('click', () => {{
    fetch('/api/select/' + encodeURIComponent(card.dataset.serviceId), {{ method: 'POST' }})
      .then(() => location.reload());
  }});
}});
setTimeout(() => location.reload(), {refresh_ms});
</script>
</body>
</html>"#,
        lang = match page.locale {
            nbpdash_core::types::Locale::Ko => "ko",
            nbpdash_core::types::Locale::En => "en",
        },
        title = html_escape(labels.title),
        css = CSS,
        conn_id = CONNECTION_STATUS_ID,
        conn_class = page.connection_status.class,
        conn_text = html_escape(page.connection_status.text),
        update_id = LAST_UPDATE_ID,
        last_update = html_escape(&page.last_update),
        list_id = SERVICE_LIST_ID,
        detail_id = SERVICE_DETAIL_ID,
    )
}

fn render_card(card: &ServiceCard) -> String {
    format!(
        r#"<div class="service-card" data-service-id="{id}">
  <h3>{name}</h3>
  <p>{type_line}</p>
  <div class="ratio-display">
    <div class="ratio-bar"><div class="ratio-nbp" style="width: {nbp}%"></div><div class="ratio-dr" style="width: {dr}%"></div></div>
    <p>{ratio_line}</p>
  </div>
  <p class="status {status_class}">{status_line}</p>
</div>
"#,
        id = html_escape(card.service_id.as_str()),
        name = html_escape(&card.name),
        type_line = html_escape(&card.type_line),
        nbp = format_ratio(Some(card.nbp_width.unwrap_or(0.0))),
        dr = format_ratio(Some(card.dr_width.unwrap_or(0.0))),
        ratio_line = html_escape(&card.ratio_line),
        status_class = card.status_class,
        status_line = html_escape(&card.status_line),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS: &str = r#"
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0f172a; color: #e2e8f0; }
  .header { background: #1e293b; padding: 16px 24px; border-bottom: 1px solid #334155; display: flex; justify-content: space-between; align-items: center; }
  .header h1 { font-size: 20px; font-weight: 600; }
  .header .status { display: flex; gap: 12px; font-size: 13px; }
  .status-ok { color: #22c55e; }
  .status-error { color: #ef4444; }
  .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 16px; padding: 24px; }
  .service-card { background: #1e293b; border: 1px solid #334155; border-radius: 8px; padding: 16px; cursor: pointer; }
  .service-card h3 { font-size: 16px; margin-bottom: 8px; }
  .service-card p { font-size: 13px; color: #94a3b8; margin-top: 4px; }
  .ratio-bar { display: flex; height: 8px; border-radius: 4px; overflow: hidden; background: #334155; margin-top: 8px; }
  .ratio-nbp { background: #3b82f6; }
  .ratio-dr { background: #f59e0b; }
  .status.ok { color: #22c55e; }
  .status.warning { color: #eab308; }
  .status.error { color: #ef4444; }
  .detail { margin: 0 24px 24px; background: #1e293b; border: 1px solid #334155; border-radius: 8px; padding: 16px; }
  .detail h2 { font-size: 14px; text-transform: uppercase; color: #94a3b8; margin-bottom: 12px; }
  .detail pre { font-size: 12px; white-space: pre-wrap; }
"#;
