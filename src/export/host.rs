//! # 宿主能力
//!
//! 导出链路需要的三项宿主能力（保存文件、图片剪贴板、打印）抽象为 `ExportHost`，
//! 生产环境由 `TauriExportHost` 提供，测试中可替换为记录调用的实现。

use std::path::{Path, PathBuf};

use tauri::{AppHandle, WebviewUrl, WebviewWindowBuilder, Wry};
use tauri_plugin_dialog::DialogExt;

use super::clipboard_writer::{self, ClipboardWriteFailure};
use super::source::ClipboardImage;
use super::ExportError;
use crate::config::ExportPreferences;
use crate::storage;

/// 导出所需的宿主能力。
pub trait ExportHost: Send + Sync {
    /// 保存文件，返回最终写入路径。
    fn save_file(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;

    /// 特性检测：是否支持图片剪贴板。
    fn supports_image_clipboard(&self) -> bool;

    /// 单次写入，不含重试。
    fn write_clipboard_image(&self, image: &ClipboardImage) -> Result<(), ClipboardWriteFailure>;

    /// 打开仅包含画面的打印视图。
    fn print_document(&self, title: &str, html: &str) -> Result<(), ExportError>;
}

/// 基于 Tauri 的宿主实现。
///
/// 导出目录只在真正保存时才解析（可能创建目录），复制与打印不触碰文件系统。
pub struct TauriExportHost {
    app: AppHandle<Wry>,
    preferences: ExportPreferences,
}

impl TauriExportHost {
    pub fn new(app: AppHandle<Wry>, preferences: ExportPreferences) -> Self {
        Self { app, preferences }
    }

    fn export_dir(&self) -> Result<PathBuf, ExportError> {
        storage::resolve_export_dir(&self.app, self.preferences.export_dir.as_deref())
            .map_err(|e| ExportError::FileSystem(e.to_string()))
    }

    fn pick_target(&self, file_name: &str) -> Result<PathBuf, ExportError> {
        let export_dir = self.export_dir()?;
        if !self.preferences.ask_save_location {
            return Ok(export_dir.join(file_name));
        }

        let picked = self
            .app
            .dialog()
            .file()
            .set_directory(&export_dir)
            .set_file_name(file_name)
            .add_filter("PNG", &["png"])
            .blocking_save_file();

        match picked {
            Some(path) => path
                .into_path()
                .map_err(|e| ExportError::FileSystem(format!("无效的保存路径：{}", e))),
            None => Err(ExportError::Cancelled),
        }
    }
}

fn write_file(target: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ExportError::FileSystem(format!("创建目录失败 {}: {}", parent.display(), e)))?;
    }
    std::fs::write(target, bytes)
        .map_err(|e| ExportError::FileSystem(format!("写入文件失败 {}: {}", target.display(), e)))
}

impl ExportHost for TauriExportHost {
    fn save_file(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        let target = self.pick_target(file_name)?;
        write_file(&target, bytes)?;
        log::info!("💾 已保存 {}（{} 字节）", target.display(), bytes.len());
        Ok(target)
    }

    fn supports_image_clipboard(&self) -> bool {
        clipboard_writer::arboard_available()
    }

    fn write_clipboard_image(&self, image: &ClipboardImage) -> Result<(), ClipboardWriteFailure> {
        clipboard_writer::write_with_arboard(image)
    }

    fn print_document(&self, title: &str, html: &str) -> Result<(), ExportError> {
        let document = serde_json::to_string(html)
            .map_err(|e| ExportError::Print(format!("打印文档序列化失败：{}", e)))?;
        let script = format!("window.__PRINT_DOCUMENT__ = {};", document);
        let label = format!("print-{}", chrono::Utc::now().timestamp_millis());

        WebviewWindowBuilder::new(&self.app, &label, WebviewUrl::App("print.html".into()))
            .title(title)
            .inner_size(480.0, 480.0)
            .initialization_script(&script)
            .build()
            .map_err(|e| ExportError::Print(format!("打开打印窗口失败：{}", e)))?;

        log::info!("🖨️ 已打开打印窗口 {}", label);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_file_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("ecode-host-{}", std::process::id()));
        let target = dir.join("nested").join("out.png");
        write_file(&target, b"png").expect("write");
        assert_eq!(std::fs::read(&target).expect("read"), b"png");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
