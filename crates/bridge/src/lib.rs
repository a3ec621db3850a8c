//! Bridge crate – the command invocation layer of the sweeper front-end.
//!
//! Turns typed maintenance intents into calls against the out-of-process
//! engine, decodes the response envelope, and gives every caller one error
//! contract. How scanning or deletion works is the engine's business; nothing
//! here inspects or validates maintenance results.

pub mod commands;
#[cfg(unix)]
pub mod daemon;
pub mod envelope;
pub mod facade;
pub mod gateway;
#[cfg(unix)]
pub mod platform;
pub mod release;
pub mod replay;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use commands::Command;
pub use envelope::{CommandRequest, Outcome, ResponseEnvelope, Status};
pub use facade::MaintenanceClient;
pub use gateway::{CommandGateway, GatewayError, GatewayResult, InvokeOptions};
#[cfg(unix)]
pub use platform::UnixSocketChannel;
pub use replay::ReplayEngine;
pub use traits::{InvokeChannel, TransportError};
