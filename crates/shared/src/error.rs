use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only failure the profile browser knows about. Covers non-success HTTP
/// status, transport failures and undecodable payloads alike.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("failed to load profiles: {message}")]
pub struct FetchFailure {
    pub message: String,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
