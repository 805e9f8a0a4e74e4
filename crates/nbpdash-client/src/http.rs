use crate::ServiceSource;
use async_trait::async_trait;
use nbpdash_core::error::{Error, Result};
use nbpdash_core::types::{RatioDetail, Service, ServiceId};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// `ServiceSource` backed by the dashboard REST API.
pub struct HttpServiceSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpServiceSource {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid api base url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "api base url {base_url} cannot carry a path"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL. Segments are percent-encoded, so an
    /// id containing `/` or spaces stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was ruled out in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl ServiceSource for HttpServiceSource {
    async fn fetch_services(&self) -> Result<Vec<Service>> {
        let url = self.endpoint(&["api", "services"]);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| Error::ListFetch(e.to_string()))?;

        let services: Vec<Service> = response
            .json()
            .await
            .map_err(|e| Error::ListFetch(format!("malformed service list from {url}: {e}")))?;

        debug!(url = %url, count = services.len(), "service list fetched");
        Ok(services)
    }

    async fn fetch_detail(&self, id: &ServiceId) -> Result<RatioDetail> {
        let url = self.endpoint(&["api", "services", id.as_str(), "ratio"]);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| Error::detail_fetch(id, e))?;

        let detail: RatioDetail = response
            .json()
            .await
            .map_err(|e| Error::detail_fetch(id, format!("malformed detail from {url}: {e}")))?;

        debug!(url = %url, service_id = %id, "service detail fetched");
        Ok(detail)
    }
}
