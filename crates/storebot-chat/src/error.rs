use storebot_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("page store error: {0}")]
    Store(#[from] StoreError),
}

/// Failures talking to the text-generation service. The engine never
/// surfaces these; they degrade to template replies.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text generation returned status {status}")]
    Status { status: u16 },

    #[error("text generation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("text generation returned no text")]
    EmptyResponse,

    #[error("failed to decode text generation response: {0}")]
    Deserialize(#[source] serde_json::Error),
}
