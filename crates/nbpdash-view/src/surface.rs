use async_trait::async_trait;
use chrono::{DateTime, Local};
use nbpdash_core::types::{ConnectionStatus, RatioDetail, Service, ServiceId};
use std::sync::Arc;

/// Where the dashboard controller draws. Rendering never fails from the
/// controller's point of view; a surface that cannot draw logs and moves on.
#[async_trait]
pub trait RenderSurface: Send + Sync + 'static {
    /// Replace the whole service list view with one card per service.
    async fn render_service_list(&self, services: &[Service]);

    /// Make the detail panel visible. Stays visible once shown.
    async fn show_detail_panel(&self);

    /// Replace the detail panel content.
    async fn render_service_detail(&self, id: &ServiceId, detail: &RatioDetail);

    /// Update the connection indicator and the "last update" time.
    async fn render_connection_status(&self, status: ConnectionStatus, at: DateTime<Local>);
}

/// Fans every call out to several surfaces, in order.
#[derive(Default)]
pub struct MultiSurface {
    surfaces: Vec<Arc<dyn RenderSurface>>,
}

impl MultiSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, surface: Arc<dyn RenderSurface>) -> Self {
        self.surfaces.push(surface);
        self
    }
}

#[async_trait]
impl RenderSurface for MultiSurface {
    async fn render_service_list(&self, services: &[Service]) {
        for surface in &self.surfaces {
            surface.render_service_list(services).await;
        }
    }

    async fn show_detail_panel(&self) {
        for surface in &self.surfaces {
            surface.show_detail_panel().await;
        }
    }

    async fn render_service_detail(&self, id: &ServiceId, detail: &RatioDetail) {
        for surface in &self.surfaces {
            surface.render_service_detail(id, detail).await;
        }
    }

    async fn render_connection_status(&self, status: ConnectionStatus, at: DateTime<Local>) {
        for surface in &self.surfaces {
            surface.render_connection_status(status, at).await;
        }
    }
}
