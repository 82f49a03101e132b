//! # 服务层（可注入状态）
//!
//! `ExportServiceState` 作为 Tauri `State` 注入，内部持有 `ExportHandler`。
//! 生命周期由 `main.rs` 统一管理，测试可创建独立实例。

use super::{ExportConfig, ExportError, ExportHandler};

pub struct ExportServiceState {
    handler: ExportHandler,
}

impl ExportServiceState {
    pub fn new() -> Self {
        Self::with_config(ExportConfig::default())
    }

    pub fn with_config(config: ExportConfig) -> Self {
        Self {
            handler: ExportHandler::new(config),
        }
    }

    pub fn handler(&self) -> &ExportHandler {
        &self.handler
    }

    pub fn get_config(&self) -> Result<ExportConfig, ExportError> {
        self.handler.config_snapshot()
    }

    pub fn set_config(&self, config: ExportConfig) -> Result<(), ExportError> {
        self.handler.set_config(config)
    }
}

impl Default for ExportServiceState {
    fn default() -> Self {
        Self::new()
    }
}
