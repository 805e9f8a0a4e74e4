use crate::labels::{format_ratio, Labels};
use crate::surface::RenderSurface;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use nbpdash_core::types::{ConnectionStatus, Locale, RatioDetail, Service, ServiceId};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

/// Element ids of the host page. The HTML view uses them verbatim.
pub const SERVICE_LIST_ID: &str = "service-list";
pub const SERVICE_DETAIL_ID: &str = "service-detail";
pub const CONNECTION_STATUS_ID: &str = "connection-status";
pub const LAST_UPDATE_ID: &str = "last-update";

/// One rendered service, the equivalent of a `.service-card` node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCard {
    /// Exposed as `data-service-id`; what a click selects.
    pub service_id: ServiceId,
    pub name: String,
    pub type_line: String,
    pub nbp_width: Option<f64>,
    pub dr_width: Option<f64>,
    pub ratio_line: String,
    pub status_class: &'static str,
    pub status_line: String,
}

impl ServiceCard {
    pub fn from_service(service: &Service, labels: &Labels) -> Self {
        Self {
            service_id: service.id.clone(),
            name: service.name.clone(),
            type_line: format!("{}: {}", labels.type_prefix, service.kind),
            nbp_width: service.nbp_ratio,
            dr_width: service.dr_ratio,
            ratio_line: format!(
                "NBP: {}% | DR: {}%",
                format_ratio(service.nbp_ratio),
                format_ratio(service.dr_ratio)
            ),
            status_class: service.status.as_str(),
            status_line: format!("{}: {}", labels.status_prefix, labels.status(service.status)),
        }
    }

    /// All visible text of the card, one element per line.
    pub fn text(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            self.name, self.type_line, self.ratio_line, self.status_line
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailPanel {
    pub visible: bool,
    pub service_id: Option<ServiceId>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusIndicator {
    pub text: &'static str,
    pub class: &'static str,
}

impl StatusIndicator {
    fn new(status: ConnectionStatus, labels: &Labels) -> Self {
        Self {
            text: labels.connection(status),
            class: if status.is_healthy() {
                "status-ok"
            } else {
                "status-error"
            },
        }
    }
}

/// Point-in-time copy of the whole page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub locale: Locale,
    pub service_list: Vec<ServiceCard>,
    pub service_detail: DetailPanel,
    pub connection_status: StatusIndicator,
    pub last_update: String,
}

/// In-memory page: the render target the web view and tests read back.
pub struct PageModel {
    labels: &'static Labels,
    page: RwLock<PageSnapshot>,
}

impl PageModel {
    pub fn new(locale: Locale) -> Self {
        let labels = Labels::for_locale(locale);
        Self {
            labels,
            page: RwLock::new(PageSnapshot {
                locale,
                service_list: Vec::new(),
                service_detail: DetailPanel::default(),
                connection_status: StatusIndicator::new(ConnectionStatus::Unhealthy, labels),
                last_update: String::new(),
            }),
        }
    }

    pub fn labels(&self) -> &'static Labels {
        self.labels
    }

    pub async fn snapshot(&self) -> PageSnapshot {
        self.page.read().await.clone()
    }

    /// Non-blocking variant of [`snapshot`](Self::snapshot); `None` while a render is in progress.
    pub fn try_snapshot(&self) -> Option<PageSnapshot> {
        self.page.try_read().ok().map(|page| page.clone())
    }
}

#[async_trait]
impl RenderSurface for PageModel {
    async fn render_service_list(&self, services: &[Service]) {
        let cards: Vec<ServiceCard> = services
            .iter()
            .map(|s| ServiceCard::from_service(s, self.labels))
            .collect();
        let mut page = self.page.write().await;
        page.service_list = cards;
        debug!(element = SERVICE_LIST_ID, cards = page.service_list.len(), "page updated");
    }

    async fn show_detail_panel(&self) {
        self.page.write().await.service_detail.visible = true;
    }

    async fn render_service_detail(&self, id: &ServiceId, detail: &RatioDetail) {
        let mut page = self.page.write().await;
        page.service_detail.service_id = Some(id.clone());
        page.service_detail.content = Some(detail.pretty());
        debug!(element = SERVICE_DETAIL_ID, service_id = %id, "page updated");
    }

    async fn render_connection_status(&self, status: ConnectionStatus, at: DateTime<Local>) {
        let mut page = self.page.write().await;
        page.connection_status = StatusIndicator::new(status, self.labels);
        page.last_update = format!(
            "{}: {}",
            self.labels.last_update_prefix,
            at.format("%H:%M:%S")
        );
    }
}
