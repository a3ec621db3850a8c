//! Typed maintenance API. Each method is a fixed [`Command`] sent through
//! the gateway; no method adds logic of its own.

use crate::commands::Command;
use crate::gateway::{CommandGateway, GatewayResult, InvokeOptions};
use crate::traits::InvokeChannel;
use crate::types::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Clone)]
pub struct MaintenanceClient {
    gateway: CommandGateway,
    options: InvokeOptions,
}

impl MaintenanceClient {
    pub fn new(gateway: CommandGateway) -> Self {
        Self {
            gateway,
            options: InvokeOptions::default(),
        }
    }

    pub fn from_channel(channel: Arc<dyn InvokeChannel>) -> Self {
        Self::new(CommandGateway::new(channel))
    }

    /// Options applied to every call made through this client.
    pub fn with_options(mut self, options: InvokeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn gateway(&self) -> &CommandGateway {
        &self.gateway
    }

    pub fn options(&self) -> InvokeOptions {
        self.options
    }

    async fn run<T: DeserializeOwned>(&self, command: Command) -> GatewayResult<T> {
        self.gateway.call(command, self.options).await
    }

    // -- cache ---------------------------------------------------------------

    pub async fn get_cache_files(&self) -> GatewayResult<Vec<CacheFileItem>> {
        self.run(Command::GetCacheFiles).await
    }

    pub async fn get_cache_summary(&self) -> GatewayResult<ScanSummary> {
        self.run(Command::GetCacheSummary).await
    }

    pub async fn clear_selected_cache_files(&self, paths: Vec<String>) -> GatewayResult<String> {
        self.run(Command::ClearSelectedCacheFiles { paths }).await
    }

    pub async fn clear_cache(&self) -> GatewayResult<String> {
        self.run(Command::ClearCache).await
    }

    // -- trash ---------------------------------------------------------------

    pub async fn get_trash_files(&self) -> GatewayResult<Vec<TrashFileItem>> {
        self.run(Command::GetTrashFiles).await
    }

    pub async fn get_trash_summary(&self) -> GatewayResult<ScanSummary> {
        self.run(Command::GetTrashSummary).await
    }

    pub async fn clear_selected_trash_files(&self, paths: Vec<String>) -> GatewayResult<String> {
        self.run(Command::ClearSelectedTrashFiles { paths }).await
    }

    pub async fn clear_trash(&self) -> GatewayResult<String> {
        self.run(Command::ClearTrash).await
    }

    // -- logs ----------------------------------------------------------------

    pub async fn get_system_logs(&self) -> GatewayResult<Vec<LogFileItem>> {
        self.run(Command::GetSystemLogs).await
    }

    pub async fn get_log_summary(&self) -> GatewayResult<ScanSummary> {
        self.run(Command::GetLogSummary).await
    }

    pub async fn clear_selected_log_files(&self, paths: Vec<String>) -> GatewayResult<String> {
        self.run(Command::ClearSelectedLogFiles { paths }).await
    }

    pub async fn clear_all_logs(&self) -> GatewayResult<String> {
        self.run(Command::ClearAllLogs).await
    }

    // -- large files ---------------------------------------------------------

    pub async fn get_large_files(&self) -> GatewayResult<Vec<LargeFileItem>> {
        self.run(Command::GetLargeFiles).await
    }

    pub async fn get_large_files_summary(&self) -> GatewayResult<ScanSummary> {
        self.run(Command::GetLargeFilesSummary).await
    }

    pub async fn clear_selected_large_files(&self, paths: Vec<String>) -> GatewayResult<String> {
        self.run(Command::ClearSelectedLargeFiles { paths }).await
    }

    pub async fn clear_all_large_files(&self) -> GatewayResult<String> {
        self.run(Command::ClearAllLargeFiles).await
    }

    // -- services ------------------------------------------------------------

    /// Currently running units.
    pub async fn get_system_services(&self) -> GatewayResult<Vec<SystemServiceItem>> {
        self.run(Command::GetSystemServices).await
    }

    /// Every loaded unit, whatever its state.
    pub async fn get_all_services(&self) -> GatewayResult<Vec<SystemServiceItem>> {
        self.run(Command::GetAllServices).await
    }

    pub async fn stop_service(&self, service: impl Into<String>) -> GatewayResult<String> {
        self.run(Command::StopService {
            service: service.into(),
        })
        .await
    }

    pub async fn stop_selected_services(&self, services: Vec<String>) -> GatewayResult<Vec<String>> {
        self.run(Command::StopSelectedServices { services }).await
    }

    pub async fn enable_service(&self, service: impl Into<String>) -> GatewayResult<String> {
        self.run(Command::EnableService {
            service: service.into(),
        })
        .await
    }

    pub async fn enable_selected_services(
        &self,
        services: Vec<String>,
    ) -> GatewayResult<Vec<String>> {
        self.run(Command::EnableSelectedServices { services }).await
    }

    pub async fn start_service(&self, service: impl Into<String>) -> GatewayResult<String> {
        self.run(Command::StartService {
            service: service.into(),
        })
        .await
    }

    // -- files ---------------------------------------------------------------

    pub async fn preview_file(&self, path: impl Into<String>) -> GatewayResult<FilePreview> {
        self.run(Command::PreviewFile { path: path.into() }).await
    }

    /// Open `path` with `command`, or with the desktop default when `None`.
    pub async fn open_file(
        &self,
        path: impl Into<String>,
        command: Option<String>,
    ) -> GatewayResult<String> {
        self.run(Command::OpenFile {
            path: path.into(),
            command,
        })
        .await
    }
}
