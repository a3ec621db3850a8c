//! Command gateway – the single choke point for engine calls.
//!
//! Every facade method ends up in [`CommandGateway::dispatch`], which sends
//! one request, unwraps the envelope, and applies the logging policy. Every
//! failure reaches the caller; `suppress_error` only silences the log line.

use crate::commands::Command;
use crate::envelope::{Args, CommandRequest, Outcome};
use crate::traits::{InvokeChannel, TransportError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The engine answered with a non-success envelope.
    #[error("{message}")]
    Command { command: String, message: String },

    /// The channel failed before an envelope was produced.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A success envelope whose payload does not fit the requested type.
    #[error("unexpected result for {command}: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GatewayError {
    /// Build a command failure, substituting the generic message when the
    /// engine gave none.
    pub fn command_failed(command: &str, message: Option<String>) -> Self {
        GatewayError::Command {
            command: command.to_string(),
            message: message.unwrap_or_else(|| format!("Operation failed: {}", command)),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }

    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            GatewayError::Transport(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Skip the diagnostic log line on failure. Never changes the result.
    pub suppress_error: bool,
}

impl InvokeOptions {
    pub fn quiet() -> Self {
        Self {
            suppress_error: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Stateless; clones share the same channel and may be used concurrently.
#[derive(Clone)]
pub struct CommandGateway {
    channel: Arc<dyn InvokeChannel>,
}

impl CommandGateway {
    pub fn new(channel: Arc<dyn InvokeChannel>) -> Self {
        Self { channel }
    }

    /// Invoke `name` with `args` and default options.
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        name: &str,
        args: Option<Args>,
    ) -> GatewayResult<T> {
        self.invoke_with(name, args, InvokeOptions::default()).await
    }

    pub async fn invoke_with<T: DeserializeOwned>(
        &self,
        name: &str,
        args: Option<Args>,
        options: InvokeOptions,
    ) -> GatewayResult<T> {
        let request = CommandRequest {
            name: name.to_string(),
            args,
        };
        self.dispatch(request, options).await
    }

    /// Invoke a command from the fixed table.
    pub async fn call<T: DeserializeOwned>(
        &self,
        command: Command,
        options: InvokeOptions,
    ) -> GatewayResult<T> {
        self.dispatch(command.into(), options).await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: CommandRequest,
        options: InvokeOptions,
    ) -> GatewayResult<T> {
        let result = self.exchange(&request).await;
        if let Err(ref err) = result {
            if !options.suppress_error {
                tracing::error!(
                    command = %request.name,
                    error = %err,
                    "command invocation failed"
                );
            }
        }
        result
    }

    async fn exchange<T: DeserializeOwned>(&self, request: &CommandRequest) -> GatewayResult<T> {
        tracing::debug!(command = %request.name, "dispatching command");
        let envelope = self.channel.invoke(request).await?;

        match envelope.into_outcome() {
            Outcome::Success(data) => serde_json::from_value(data.unwrap_or(Value::Null))
                .map_err(|source| GatewayError::Decode {
                    command: request.name.clone(),
                    source,
                }),
            Outcome::Failure(message) => Err(GatewayError::command_failed(&request.name, message)),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
