use chrono::{DateTime, Local};
use nbpdash_core::types::ConnectionStatus;

/// Health of the dashboard's link to the backend.
///
/// Two states, no hysteresis: every applied list fetch outcome sets the status
/// directly. Starts `Unhealthy` until the first fetch resolves.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    status: ConnectionStatus,
    last_update: Option<DateTime<Local>>,
    /// Consecutive failed list fetches
    consecutive_failures: u32,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a list fetch outcome. Returns the new status if it changed.
    pub fn record(&mut self, success: bool, at: DateTime<Local>) -> Option<ConnectionStatus> {
        let previous = self.status;
        self.status = ConnectionStatus::from_outcome(success);
        self.last_update = Some(at);
        if success {
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures += 1;
        }

        (previous != self.status).then_some(self.status)
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
