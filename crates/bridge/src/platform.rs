//! Platform implementations of [`InvokeChannel`].
//!
//! - [`UnixSocketChannel`]: line-delimited JSON over a Unix domain socket,
//!   one connection per call

use crate::envelope::{new_frame_id, CommandRequest, ReplyFrame, RequestFrame, ResponseEnvelope};
use crate::traits::*;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

/// Upper bound for one reply line. Large listings stay well below it.
pub const DEFAULT_MAX_REPLY_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UnixSocketChannel {
    path: PathBuf,
    max_reply_bytes: u64,
}

impl UnixSocketChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_reply_bytes: DEFAULT_MAX_REPLY_BYTES,
        }
    }

    pub fn with_max_reply_bytes(mut self, limit: u64) -> Self {
        self.max_reply_bytes = limit;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl InvokeChannel for UnixSocketChannel {
    async fn invoke(&self, request: &CommandRequest) -> Result<ResponseEnvelope, TransportError> {
        let stream = UnixStream::connect(&self.path)
            .await
            .map_err(|e| TransportError::Unreachable {
                endpoint: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        let (reader, mut writer) = stream.into_split();

        let id = new_frame_id();
        let frame = RequestFrame {
            id: id.clone(),
            request: request.clone(),
        };
        let mut line = serde_json::to_string(&frame).map_err(TransportError::Encode)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;

        let mut reply = String::new();
        let read = BufReader::new(reader.take(self.max_reply_bytes))
            .read_line(&mut reply)
            .await?;
        if read == 0 {
            return Err(TransportError::Protocol(format!(
                "connection closed before {} was answered",
                request.name
            )));
        }
        if !reply.ends_with('\n') && read as u64 >= self.max_reply_bytes {
            return Err(TransportError::Protocol(format!(
                "reply to {} exceeds {} bytes",
                request.name, self.max_reply_bytes
            )));
        }

        let reply: ReplyFrame = serde_json::from_str(&reply).map_err(TransportError::Decode)?;
        if reply.id != id {
            return Err(TransportError::Protocol(format!(
                "reply id {} does not match request id {}",
                reply.id, id
            )));
        }
        Ok(reply.envelope)
    }
}
