pub mod http;

use async_trait::async_trait;
use nbpdash_core::error::Result;
use nbpdash_core::types::{RatioDetail, Service, ServiceId};

pub use http::HttpServiceSource;

/// Read side of the services backend.
///
/// Implementations must not retry: a failed read is reported once and the
/// caller decides when to try again.
#[async_trait]
pub trait ServiceSource: Send + Sync + 'static {
    /// Fetch the full service collection, in backend order.
    async fn fetch_services(&self) -> Result<Vec<Service>>;

    /// Fetch the traffic-ratio detail of one service.
    async fn fetch_detail(&self, id: &ServiceId) -> Result<RatioDetail>;
}
