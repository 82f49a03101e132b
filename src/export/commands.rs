//! # Tauri 命令层
//!
//! 命令层仅做 IPC 参数接收与结果返回，不承载业务逻辑。
//! 下载 / 复制 / 打印动作需要经过面板（提示消息），见 `generator::commands`。

use serde::Serialize;
use tauri::State;

use super::{service::ExportServiceState, ExportConfig, ExportError};
use crate::error::AppError;

/// 结构化导出错误，前端可按 `code` 分支。
#[derive(Debug, Clone, Serialize)]
pub struct ExportCommandError {
    pub code: &'static str,
    pub stage: &'static str,
    pub message: String,
}

impl From<&ExportError> for ExportCommandError {
    fn from(error: &ExportError) -> Self {
        Self {
            code: error.code(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

#[tauri::command]
pub fn get_export_config(state: State<'_, ExportServiceState>) -> Result<ExportConfig, AppError> {
    Ok(state.get_config()?)
}

#[tauri::command]
pub fn set_export_config(state: State<'_, ExportServiceState>, config: ExportConfig) -> Result<(), AppError> {
    state.set_config(config)?;
    Ok(())
}
