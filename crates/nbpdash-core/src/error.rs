use crate::types::ServiceId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Covers transport failures, non-success statuses and malformed payloads alike.
    #[error("service list fetch failed: {0}")]
    ListFetch(String),

    #[error("service detail fetch failed for {id}: {reason}")]
    DetailFetch { id: ServiceId, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn detail_fetch(id: &ServiceId, reason: impl std::fmt::Display) -> Self {
        Error::DetailFetch {
            id: id.clone(),
            reason: reason.to_string(),
        }
    }
}
