//! # Tauri 命令层
//!
//! 面板修改类命令都返回最新快照，前端无需再单独拉取。
//! 导出命令在产生提示后安排 3 秒到期任务，并通过事件通知前端。
//! 宿主在这里只是构造出来，导出目录等文件系统操作推迟到保存那一步。

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, State, Wry};

use super::{GeneratorState, PanelKind, PanelSnapshot};
use crate::config::ConfigState;
use crate::error::AppError;
use crate::export::{ExportHost, ExportServiceState, TauriExportHost};
use crate::notification::{ExportAction, Notification};
use crate::options::{BarcodeOptionUpdate, BarcodeOptions, QrOptionUpdate, QrOptions};
use crate::payload::CodeType;

use super::ExportReport;

/// 提示变化事件名。
pub const NOTIFICATION_EVENT: &str = "notification-changed";

#[derive(Debug, Clone, Serialize)]
struct NotificationEventPayload {
    panel: PanelKind,
    notification: Option<Notification>,
}

fn emit_notification(app: &AppHandle<Wry>, panel: PanelKind, notification: Option<Notification>) {
    if let Err(err) = app.emit(NOTIFICATION_EVENT, NotificationEventPayload { panel, notification }) {
        log::warn!("⚠️ 发送提示事件失败: {}", err);
    }
}

/// 推送新提示并安排到期清除。
fn publish_notification(
    app: &AppHandle<Wry>,
    state: &GeneratorState,
    panel: PanelKind,
    generation: u64,
) -> Result<(), AppError> {
    emit_notification(app, panel, state.active_notification(panel)?);

    let handle = app.clone();
    state.schedule_expiry(panel, move || {
        let state = handle.state::<GeneratorState>();
        match state.expire(panel, generation) {
            Ok(true) => emit_notification(&handle, panel, None),
            Ok(false) => {}
            Err(err) => log::warn!("⚠️ 提示到期处理失败: {}", err),
        }
    })
}

// ── 二维码面板 ─────────────────────────────────────

#[tauri::command]
pub fn qr_snapshot(state: State<'_, GeneratorState>) -> Result<PanelSnapshot<QrOptions>, AppError> {
    Ok(state.qr()?.snapshot(Instant::now()))
}

#[tauri::command]
pub fn qr_set_input(state: State<'_, GeneratorState>, value: String) -> Result<PanelSnapshot<QrOptions>, AppError> {
    let mut qr = state.qr()?;
    qr.set_input(value);
    Ok(qr.snapshot(Instant::now()))
}

#[tauri::command]
pub fn qr_set_code_type(
    state: State<'_, GeneratorState>,
    code_type: CodeType,
) -> Result<PanelSnapshot<QrOptions>, AppError> {
    let mut qr = state.qr()?;
    qr.set_code_type(code_type)?;
    Ok(qr.snapshot(Instant::now()))
}

#[tauri::command]
pub fn qr_update_option(
    state: State<'_, GeneratorState>,
    update: QrOptionUpdate,
) -> Result<PanelSnapshot<QrOptions>, AppError> {
    let mut qr = state.qr()?;
    qr.update_option(update);
    Ok(qr.snapshot(Instant::now()))
}

#[tauri::command]
pub fn qr_toggle_advanced(state: State<'_, GeneratorState>) -> Result<PanelSnapshot<QrOptions>, AppError> {
    let mut qr = state.qr()?;
    qr.toggle_advanced();
    Ok(qr.snapshot(Instant::now()))
}

// ── 条码面板 ───────────────────────────────────────

#[tauri::command]
pub fn barcode_snapshot(state: State<'_, GeneratorState>) -> Result<PanelSnapshot<BarcodeOptions>, AppError> {
    Ok(state.barcode()?.snapshot(Instant::now()))
}

#[tauri::command]
pub fn barcode_set_input(
    state: State<'_, GeneratorState>,
    value: String,
) -> Result<PanelSnapshot<BarcodeOptions>, AppError> {
    let mut barcode = state.barcode()?;
    barcode.set_input(value);
    Ok(barcode.snapshot(Instant::now()))
}

#[tauri::command]
pub fn barcode_set_code_type(
    state: State<'_, GeneratorState>,
    code_type: CodeType,
) -> Result<PanelSnapshot<BarcodeOptions>, AppError> {
    let mut barcode = state.barcode()?;
    barcode.set_code_type(code_type)?;
    Ok(barcode.snapshot(Instant::now()))
}

#[tauri::command]
pub fn barcode_update_option(
    state: State<'_, GeneratorState>,
    update: BarcodeOptionUpdate,
) -> Result<PanelSnapshot<BarcodeOptions>, AppError> {
    let mut barcode = state.barcode()?;
    barcode.update_option(update);
    Ok(barcode.snapshot(Instant::now()))
}

#[tauri::command]
pub fn barcode_toggle_advanced(
    state: State<'_, GeneratorState>,
) -> Result<PanelSnapshot<BarcodeOptions>, AppError> {
    let mut barcode = state.barcode()?;
    barcode.toggle_advanced();
    Ok(barcode.snapshot(Instant::now()))
}

// ── 导出与提示 ─────────────────────────────────────

#[tauri::command]
pub async fn export_code(
    app: AppHandle<Wry>,
    generator: State<'_, GeneratorState>,
    export: State<'_, ExportServiceState>,
    config: State<'_, ConfigState>,
    panel: PanelKind,
    action: ExportAction,
) -> Result<ExportReport, AppError> {
    let preferences = config.snapshot()?.export;
    let host: Arc<dyn ExportHost> = Arc::new(TauriExportHost::new(app.clone(), preferences));

    let report = generator.export(panel, action, export.handler(), host).await?;

    if let Some(generation) = report.generation {
        publish_notification(&app, &generator, panel, generation)?;
    }

    Ok(report)
}

#[tauri::command]
pub fn dismiss_notification(
    app: AppHandle<Wry>,
    state: State<'_, GeneratorState>,
    panel: PanelKind,
) -> Result<bool, AppError> {
    let dismissed = state.dismiss(panel)?;
    if dismissed {
        emit_notification(&app, panel, None);
    }
    Ok(dismissed)
}
