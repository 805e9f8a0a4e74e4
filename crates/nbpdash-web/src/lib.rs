pub mod dashboard;
pub mod health;
pub mod select;

use axum::routing::{get, post};
use axum::Router;
use nbpdash_controller::UiEvent;
use nbpdash_view::PageModel;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Serves the rendered dashboard page and turns card clicks into UI events.
pub struct WebServer {
    listen_addr: SocketAddr,
    page: Arc<PageModel>,
    events: mpsc::Sender<UiEvent>,
    refresh_ms: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub page: Arc<PageModel>,
    pub events: mpsc::Sender<UiEvent>,
    pub refresh_ms: u64,
}

impl WebServer {
    pub fn new(
        listen_addr: SocketAddr,
        page: Arc<PageModel>,
        events: mpsc::Sender<UiEvent>,
    ) -> Self {
        Self {
            listen_addr,
            page,
            events,
            refresh_ms: 5000,
        }
    }

    /// How often the served page reloads itself.
    pub fn with_refresh_ms(mut self, refresh_ms: u64) -> Self {
        self.refresh_ms = refresh_ms;
        self
    }

    pub async fn run(self, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let app = router(AppState {
            page: self.page,
            events: self.events,
            refresh_ms: self.refresh_ms,
        });

        let listener = tokio::net::TcpListener::bind(self.listen_addr).await?;
        info!("web dashboard listening on http://{}/dashboard", self.listen_addr);

        let mut shutdown = shutdown;
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
            })
            .await?;

        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::dashboard_page))
        .route("/dashboard", get(dashboard::dashboard_page))
        .route("/api/page", get(dashboard::page_snapshot))
        .route("/api/select/{id}", post(select::select_service))
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
