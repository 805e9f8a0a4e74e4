use crate::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use nbpdash_view::html::render_page;
use nbpdash_view::PageSnapshot;

pub async fn dashboard_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.page.snapshot().await;
    Html(render_page(&snapshot, state.page.labels(), state.refresh_ms))
}

pub async fn page_snapshot(State(state): State<AppState>) -> Json<PageSnapshot> {
    Json(state.page.snapshot().await)
}
