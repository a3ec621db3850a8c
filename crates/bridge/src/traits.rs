use crate::envelope::{CommandRequest, ResponseEnvelope};

/// Failure of the invocation channel itself, raised before any envelope
/// exists. The gateway re-raises these unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("engine unreachable at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode reply: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    /// The host refused the call (unknown command, lost connection, ...).
    #[error("{0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// Invocation channel
// ---------------------------------------------------------------------------

/// Host-provided path to the maintenance engine.
///
/// Implementations deliver one request and return exactly one envelope, or
/// fail with a [`TransportError`]. They hold no per-call state, so a single
/// channel can serve any number of concurrent calls.
#[async_trait::async_trait]
pub trait InvokeChannel: Send + Sync {
    async fn invoke(&self, request: &CommandRequest) -> Result<ResponseEnvelope, TransportError>;
}
