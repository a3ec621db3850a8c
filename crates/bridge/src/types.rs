//! Payload shapes produced by the maintenance engine.
//!
//! These are passed through as-is after envelope unwrapping. Fields the
//! engine adds later land in `extra` so nothing is dropped on the way to
//! the caller.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// One systemd unit. `getSystemServices` fills `description`, while
/// `getAllServices` fills `load` and `active` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemServiceItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_running: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheFileItem {
    pub path: String,
    pub size: u64,
    #[serde(default)]
    pub modified: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashFileItem {
    pub name: String,
    pub path: String,
    pub size: u64,
    #[serde(default)]
    pub deleted_date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A log listing entry. Depending on the engine build this is either a
/// bare path or a full record; both forms serialize back as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogFileItem {
    Path(String),
    Entry(LogFileEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFileEntry {
    pub path: String,
    pub size: u64,
    #[serde(default)]
    pub modified: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogFileItem {
    pub fn path(&self) -> &str {
        match self {
            LogFileItem::Path(path) => path,
            LogFileItem::Entry(entry) => &entry.path,
        }
    }

    /// Zero when the engine sent only the path.
    pub fn size(&self) -> u64 {
        match self {
            LogFileItem::Path(_) => 0,
            LogFileItem::Entry(entry) => entry.size,
        }
    }

    pub fn modified(&self) -> &str {
        match self {
            LogFileItem::Path(_) => "",
            LogFileItem::Entry(entry) => &entry.modified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargeFileItem {
    pub name: String,
    pub path: String,
    pub size: u64,
    #[serde(default)]
    pub modified: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_size: u64,
    pub file_count: u64,
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePreview {
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub body: PreviewBody,
}

/// Preview content, discriminated by the engine's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewBody {
    Image {
        /// `data:` URL with the base64-encoded image.
        #[serde(rename = "imageUrl")]
        image_url: String,
    },
    Text {
        content: String,
    },
    Binary,
    Unknown,
}
