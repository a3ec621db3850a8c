//! Replay engine – scripted stand-in for the maintenance engine.
//!
//! Answers each command from a YAML fixture and records every request it
//! receives. Used for UI development without root privileges and as the
//! channel under test in the facade and gateway tests.

use crate::envelope::{CommandRequest, ResponseEnvelope};
use crate::traits::{InvokeChannel, TransportError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to parse fixture YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("cannot read fixture: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub responses: BTreeMap<String, ScriptedReply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptedReply {
    /// Fail at transport level with this message; no envelope is produced.
    Transport { transport: String },
    Envelope(ResponseEnvelope),
}

/// Load a fixture from a YAML string.
pub fn load_fixture(yaml: &str) -> Result<Fixture, FixtureError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a fixture from a file.
pub fn read_fixture(path: &std::path::Path) -> Result<Fixture, FixtureError> {
    let yaml = std::fs::read_to_string(path)?;
    load_fixture(&yaml)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ReplayEngine {
    name: Option<String>,
    replies: BTreeMap<String, ScriptedReply>,
    requests: Mutex<Vec<CommandRequest>>,
}

impl ReplayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            name: fixture.name,
            replies: fixture.responses,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, command: &str, envelope: ResponseEnvelope) -> Self {
        self.replies
            .insert(command.to_string(), ScriptedReply::Envelope(envelope));
        self
    }

    pub fn with_transport_failure(mut self, command: &str, message: &str) -> Self {
        self.replies.insert(
            command.to_string(),
            ScriptedReply::Transport {
                transport: message.to_string(),
            },
        );
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Scripted command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        self.replies.keys().map(|s| s.as_str()).collect()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<CommandRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, request: &CommandRequest) {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());
    }
}

#[async_trait::async_trait]
impl InvokeChannel for ReplayEngine {
    async fn invoke(&self, request: &CommandRequest) -> Result<ResponseEnvelope, TransportError> {
        self.record(request);
        match self.replies.get(&request.name) {
            Some(ScriptedReply::Envelope(envelope)) => Ok(envelope.clone()),
            Some(ScriptedReply::Transport { transport }) => {
                Err(TransportError::Rejected(transport.clone()))
            }
            None => Err(TransportError::Rejected(format!(
                "command {} not found",
                request.name
            ))),
        }
    }
}
