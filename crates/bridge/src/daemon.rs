//! Daemon mode – serves an [`InvokeChannel`] over a Unix socket using the
//! line-delimited frame protocol that [`UnixSocketChannel`] speaks.
//!
//! [`UnixSocketChannel`]: crate::platform::UnixSocketChannel

use crate::envelope::{ReplyFrame, RequestFrame, ResponseEnvelope};
use crate::traits::InvokeChannel;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use std::time::Duration;
use tokio::net::{UnixListener, UnixStream};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept connections forever, one task per connection.
pub async fn serve(listener: UnixListener, engine: Arc<dyn InvokeChannel>) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let engine = engine.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, engine.as_ref()).await {
                        tracing::warn!(error = %e, "connection ended with error");
                    }
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "accept failed");
                // EMFILE and friends persist; back off instead of spinning
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, engine: &dyn InvokeChannel) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let Some(reply) = handle_frame(&line, engine).await else {
            // Transport-level failure: hang up without an envelope.
            return Ok(());
        };
        let mut reply_json = serde_json::to_string(&reply).unwrap_or_else(|_| "{}".into());
        reply_json.push('\n');
        writer.write_all(reply_json.as_bytes()).await?;
    }
    Ok(())
}

async fn handle_frame(line: &str, engine: &dyn InvokeChannel) -> Option<ReplyFrame> {
    let frame: RequestFrame = match serde_json::from_str(line) {
        Ok(f) => f,
        Err(e) => {
            return Some(ReplyFrame {
                id: "unknown".into(),
                envelope: ResponseEnvelope::error(format!("invalid request frame: {}", e)),
            });
        }
    };

    tracing::debug!(id = %frame.id, command = %frame.request.name, "request received");
    match engine.invoke(&frame.request).await {
        Ok(envelope) => Some(ReplyFrame {
            id: frame.id,
            envelope,
        }),
        Err(e) => {
            tracing::info!(command = %frame.request.name, error = %e, "dropping connection");
            None
        }
    }
}
