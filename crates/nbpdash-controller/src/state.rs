use crate::connection::ConnectionState;
use nbpdash_core::config::StaleResponsePolicy;
use nbpdash_core::types::{RatioDetail, Service, ServiceId};

/// Everything the controller knows between refresh cycles.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Last applied service list, in backend order
    pub services: Vec<Service>,
    /// Set by select events only; never cleared by a refresh
    pub selected: Option<ServiceId>,
    pub connection: ConnectionState,
    /// Last applied detail and the service it belongs to
    pub detail: Option<(ServiceId, RatioDetail)>,
    applied_list_seq: u64,
    applied_detail_seq: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a completed list fetch (success or failure) may be applied.
    /// Marks it as the latest applied one when it is.
    pub fn accept_list(&mut self, seq: u64, policy: StaleResponsePolicy) -> bool {
        if policy == StaleResponsePolicy::Discard && seq <= self.applied_list_seq {
            return false;
        }
        self.applied_list_seq = seq;
        true
    }

    /// Decide whether a completed detail fetch may be applied.
    pub fn accept_detail(
        &mut self,
        id: &ServiceId,
        seq: u64,
        policy: StaleResponsePolicy,
    ) -> bool {
        if policy == StaleResponsePolicy::Discard
            && (seq <= self.applied_detail_seq || self.selected.as_ref() != Some(id))
        {
            return false;
        }
        self.applied_detail_seq = seq;
        true
    }
}
