use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use nbpdash_controller::UiEvent;
use nbpdash_core::types::ServiceId;
use tracing::{debug, warn};

/// Card click. The controller applies it asynchronously, hence 202.
pub async fn select_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    debug!(service_id = %id, "select requested from web view");
    match state.events.send(UiEvent::Select(ServiceId::from(id))).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            warn!("dashboard controller is not accepting events: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
