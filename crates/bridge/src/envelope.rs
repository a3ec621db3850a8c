use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Argument map carried by a [`CommandRequest`]. Opaque to the gateway.
pub type Args = Map<String, Value>;

// ---------------------------------------------------------------------------
// Request – what the front-end sends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Args>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: None,
        }
    }

    pub fn with_args(name: impl Into<String>, args: Args) -> Self {
        Self {
            name: name.into(),
            args: Some(args),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope – what the engine answers, exactly once per request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
    /// Informational reply (e.g. "nothing to clear"). Anything but
    /// `Success` is a failure from the caller's point of view.
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResponseEnvelope {
    pub fn success(data: impl Into<Value>) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: Some(data.into()),
        }
    }

    /// Success without a payload, as returned by void operations.
    pub fn empty() -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Decode the status discriminator once. Downstream code matches on the
    /// returned [`Outcome`] and never looks at `status` again.
    pub fn into_outcome(self) -> Outcome {
        match self.status {
            Status::Success => Outcome::Success(self.data),
            Status::Error | Status::Info => {
                Outcome::Failure(self.message.filter(|m| !m.is_empty()))
            }
        }
    }
}

/// Tagged form of an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Operation result; `None` for void operations.
    Success(Option<Value>),
    /// Engine-reported failure; `None` when the engine sent no usable message.
    Failure(Option<String>),
}

// ---------------------------------------------------------------------------
// Socket framing – one JSON object per line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFrame {
    pub id: String,
    #[serde(flatten)]
    pub request: CommandRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyFrame {
    pub id: String,
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

/// Generate a new frame ID (UUIDv4).
pub fn new_frame_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
