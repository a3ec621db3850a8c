//! Command table – every engine operation the front-end can request.
//!
//! Each variant maps to exactly one engine command name and one fixed
//! argument shape. The mapping never depends on argument values.

use crate::envelope::{Args, CommandRequest};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // cache
    GetCacheFiles,
    GetCacheSummary,
    ClearSelectedCacheFiles { paths: Vec<String> },
    ClearCache,

    // trash
    GetTrashFiles,
    GetTrashSummary,
    ClearSelectedTrashFiles { paths: Vec<String> },
    ClearTrash,

    // logs
    GetSystemLogs,
    GetLogSummary,
    ClearSelectedLogFiles { paths: Vec<String> },
    ClearAllLogs,

    // large files
    GetLargeFiles,
    GetLargeFilesSummary,
    ClearSelectedLargeFiles { paths: Vec<String> },
    ClearAllLargeFiles,

    // services
    GetSystemServices,
    GetAllServices,
    StopService { service: String },
    StopSelectedServices { services: Vec<String> },
    EnableService { service: String },
    EnableSelectedServices { services: Vec<String> },
    StartService { service: String },

    // files
    PreviewFile { path: String },
    OpenFile { path: String, command: Option<String> },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetCacheFiles => "getCacheFiles",
            Command::GetCacheSummary => "getCacheSummary",
            Command::ClearSelectedCacheFiles { .. } => "clearSelectedCacheFiles",
            Command::ClearCache => "clearCache",
            Command::GetTrashFiles => "getTrashFiles",
            Command::GetTrashSummary => "getTrashSummary",
            Command::ClearSelectedTrashFiles { .. } => "clearSelectedTrashFiles",
            Command::ClearTrash => "clearTrash",
            Command::GetSystemLogs => "getSystemLogs",
            Command::GetLogSummary => "getLogSummary",
            Command::ClearSelectedLogFiles { .. } => "clearSelectedLogFiles",
            Command::ClearAllLogs => "clearAllLogs",
            Command::GetLargeFiles => "getLargeFiles",
            Command::GetLargeFilesSummary => "getLargeFilesSummary",
            Command::ClearSelectedLargeFiles { .. } => "clearSelectedLargeFiles",
            Command::ClearAllLargeFiles => "clearAllLargeFiles",
            Command::GetSystemServices => "getSystemServices",
            Command::GetAllServices => "getAllServices",
            Command::StopService { .. } => "stopService",
            Command::StopSelectedServices { .. } => "stopSelectedServices",
            Command::EnableService { .. } => "enableService",
            Command::EnableSelectedServices { .. } => "enableSelectedServices",
            Command::StartService { .. } => "startService",
            Command::PreviewFile { .. } => "previewFile",
            Command::OpenFile { .. } => "openFile",
        }
    }

    /// Argument map sent with the command, or `None` for argument-less reads
    /// and whole-set clears.
    pub fn args(&self) -> Option<Args> {
        match self {
            Command::ClearSelectedCacheFiles { paths }
            | Command::ClearSelectedTrashFiles { paths }
            | Command::ClearSelectedLogFiles { paths }
            | Command::ClearSelectedLargeFiles { paths } => arg_map([("paths", paths.clone().into())]),
            Command::StopService { service }
            | Command::EnableService { service }
            | Command::StartService { service } => arg_map([("service", service.clone().into())]),
            Command::StopSelectedServices { services }
            | Command::EnableSelectedServices { services } => {
                arg_map([("services", services.clone().into())])
            }
            Command::PreviewFile { path } => arg_map([("path", path.clone().into())]),
            // `command` is always present, null when the default opener is wanted
            Command::OpenFile { path, command } => arg_map([
                ("path", path.clone().into()),
                ("command", command.clone().into()),
            ]),
            _ => None,
        }
    }

    pub fn to_request(&self) -> CommandRequest {
        CommandRequest {
            name: self.name().to_string(),
            args: self.args(),
        }
    }
}

impl From<Command> for CommandRequest {
    fn from(command: Command) -> Self {
        command.to_request()
    }
}

fn arg_map<const N: usize>(pairs: [(&str, Value); N]) -> Option<Args> {
    Some(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

// ===========================================================================
// Tests
// ===========================================================================
