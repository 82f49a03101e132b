//! 导出目录管理模块
//!
//! # 设计思路
//!
//! 统一管理下载导出的落盘位置，支持用户自定义目录，
//! 并在目录不存在时自动创建。
//!
//! # 实现思路
//!
//! - 优先使用配置中的自定义目录。
//! - 未设置时使用系统下载目录（与浏览器下载行为一致）。
//! - 系统下载目录不可用时回退到应用数据目录下的 `exports` 子目录。
//! - 所有可能失败的操作均返回 `Result`。

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tauri::{AppHandle, Manager, State};

use crate::config::ConfigState;
use crate::error::AppError;

/// 导出目录信息
#[derive(Debug, Clone, Serialize)]
pub struct ExportDirInfo {
    pub path: String,
    /// 目录中已导出的 PNG 数量。
    pub exported_count: u64,
    pub total_size: u64,
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppError> {
    if !path.exists() {
        fs::create_dir_all(&path)
            .map_err(|e| AppError::Storage(format!("创建目录 '{}' 失败: {}", path.display(), e)))?;
    }
    Ok(path)
}

/// 在候选目录中选出第一个可用的。
pub(crate) fn pick_export_dir(
    custom_dir: Option<&str>,
    download_dir: Option<PathBuf>,
    app_data_dir: Option<PathBuf>,
) -> Result<PathBuf, AppError> {
    if let Some(dir) = custom_dir.filter(|d| !d.trim().is_empty()) {
        return ensure_dir(PathBuf::from(dir));
    }

    if let Some(dir) = download_dir {
        return ensure_dir(dir);
    }

    match app_data_dir {
        Some(dir) => ensure_dir(dir.join("exports")),
        None => Err(AppError::Storage("没有可用的导出目录".to_string())),
    }
}

/// 解析导出目录
pub fn resolve_export_dir(app: &AppHandle, custom_dir: Option<&str>) -> Result<PathBuf, AppError> {
    let download_dir = app.path().download_dir().ok();
    let app_data_dir = app.path().app_data_dir().ok();
    pick_export_dir(custom_dir, download_dir, app_data_dir)
}

fn is_export_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    (name.starts_with("qrcode-") || name.starts_with("barcode-")) && name.ends_with(".png")
}

pub(crate) fn scan_export_dir(dir: &Path) -> ExportDirInfo {
    let mut exported_count: u64 = 0;
    let mut total_size: u64 = 0;

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_export_file(&path) {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                if metadata.is_file() {
                    total_size += metadata.len();
                    exported_count += 1;
                }
            }
        }
    }

    ExportDirInfo {
        path: dir.to_string_lossy().to_string(),
        exported_count,
        total_size,
    }
}

/// 获取导出目录信息（路径 + 已导出文件数 + 占用大小）
#[tauri::command]
pub fn get_export_dir_info(app: AppHandle, config: State<'_, ConfigState>) -> Result<ExportDirInfo, AppError> {
    let snapshot = config.snapshot()?;
    let dir = resolve_export_dir(&app, snapshot.export.export_dir.as_deref())?;
    Ok(scan_export_dir(&dir))
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        std::env::temp_dir().join(format!("ecode-storage-test-{nanos}"))
    }

    #[test]
    fn custom_dir_wins_and_is_created() {
        let base = unique_temp_dir();
        let custom = base.join("custom");
        let picked = pick_export_dir(custom.to_str(), Some(base.join("downloads")), None).expect("pick");
        assert_eq!(picked, custom);
        assert!(custom.is_dir());
        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn falls_back_to_app_data_exports() {
        let base = unique_temp_dir();
        let picked = pick_export_dir(Some("  "), None, Some(base.clone())).expect("pick");
        assert_eq!(picked, base.join("exports"));
        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn no_candidate_is_an_error() {
        assert!(matches!(pick_export_dir(None, None, None), Err(AppError::Storage(_))));
    }

    #[test]
    fn scan_counts_only_exports() {
        let dir = unique_temp_dir();
        fs::create_dir_all(&dir).expect("create");
        fs::write(dir.join("qrcode-1.png"), b"12345").expect("write");
        fs::write(dir.join("barcode-2.png"), b"123").expect("write");
        fs::write(dir.join("notes.txt"), b"x").expect("write");

        let info = scan_export_dir(&dir);
        assert_eq!(info.exported_count, 2);
        assert_eq!(info.total_size, 8);
        let _ = fs::remove_dir_all(dir);
    }
}
