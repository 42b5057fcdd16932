use std::time::Duration;

use thiserror::Error;

use crate::llm::GatewayError;

/// Errors from reading or writing the persisted chat history.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced by session controller operations.
///
/// Every failure of a controller operation is one of these; the HTTP layer
/// maps each variant to a status code.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Session ID is required")]
    MissingSessionId,

    #[error("Session IDs are required")]
    MissingSessionIds,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("model did not respond within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ChatError {
    /// Whether the caller sent an unusable request (as opposed to a server-side failure).
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            ChatError::EmptyMessage | ChatError::MissingSessionId | ChatError::MissingSessionIds
        )
    }
}
