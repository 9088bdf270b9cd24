use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the remote store client.
///
/// Remote failures arrive as structured bodies, not exceptions; `Remote`
/// carries them as values so callers can log and substitute a safe default.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Remote store error {code}: {message}")]
    Remote {
        code: String,
        message: String,
        details: Option<String>,
    },

    #[error("Unexpected response from remote store: {0}")]
    BadResponse(String),

    #[error("Invalid store base URL: {0}")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Error body returned by the PostgREST endpoint on a failed query.
#[derive(Debug, Deserialize)]
pub struct RemoteErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
}

impl RemoteErrorBody {
    pub fn into_error(self, http_status: u16) -> StoreError {
        StoreError::Remote {
            code: self.code.unwrap_or_else(|| http_status.to_string()),
            message: self
                .message
                .unwrap_or_else(|| "remote store request failed".to_string()),
            details: self.details,
        }
    }
}
