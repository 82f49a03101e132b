//! # 导出编排模块
//!
//! ## 设计思路
//!
//! `ExportHandler` 只负责流程编排与配置管理，宿主能力通过 `ExportHost` 注入。
//! 三条链路共享同一个前置校验：载荷为空时直接返回 `EmptyPayload`，
//! 不触碰任何宿主能力。
//!
//! ```text
//! download: 校验 → 栅格化 → Data URL → host.save_file
//! copy:     校验 → 特性检测 → 栅格化 → 解码 RGBA → 剪贴板（重试）
//! print:    校验 → 组装打印文档 → host.print_document
//! ```
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ExportConfig>>` 支持运行时调整，单次请求使用同一快照。
//! - 记录各阶段耗时，便于性能诊断。
//! - 阻塞型宿主调用（文件对话框、剪贴板）放到 `spawn_blocking`。

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use serde::Serialize;

use super::source::{ExportRequest, ExportTarget};
use super::{clipboard_writer, ExportConfig, ExportError, ExportHost};
use crate::render::{data_uri, RenderedSurface};

/// 下载结果。
#[derive(Debug, Clone, Serialize)]
pub struct DownloadOutcome {
    pub file_name: String,
    pub path: PathBuf,
    /// `data:image/png;base64,...`
    pub data_uri: String,
}

/// 导出处理器。
pub struct ExportHandler {
    config: Arc<RwLock<ExportConfig>>,
}

impl ExportHandler {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 获取配置快照，保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<ExportConfig, ExportError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ExportError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    pub fn set_config(&self, next: ExportConfig) -> Result<(), ExportError> {
        next.validate()?;
        let mut config = self
            .config
            .write()
            .map_err(|_| ExportError::ResourceLimit("配置写入锁已中毒".to_string()))?;

        log::info!(
            "⚙️ 已更新导出配置（max_pixels={}, retries={}, budget={}ms）",
            next.max_raster_pixels,
            next.clipboard_retries,
            next.clipboard_retry_max_total_ms
        );
        *config = next;
        Ok(())
    }

    /// 下载为 PNG 文件。
    pub async fn download(
        &self,
        host: Arc<dyn ExportHost>,
        request: ExportRequest,
    ) -> Result<DownloadOutcome, ExportError> {
        let started = Instant::now();
        let surface = validated_surface(&request)?;
        let config = self.config_snapshot()?;

        let raster_started = Instant::now();
        let raster = self.rasterize(surface, &config)?;
        let raster_ms = raster_started.elapsed().as_millis();

        let uri = data_uri("image/png", &raster.png);
        let file_name = export_file_name(request.target);

        let save_started = Instant::now();
        let name = file_name.clone();
        let path = tokio::task::spawn_blocking(move || host.save_file(&name, &raster.png))
            .await
            .map_err(|e| ExportError::FileSystem(format!("线程执行失败：{}", e)))??;
        let save_ms = save_started.elapsed().as_millis();

        log::info!(
            "⏱️ 下载完成 - rasterize={}ms save={}ms total={}ms -> {}",
            raster_ms,
            save_ms,
            started.elapsed().as_millis(),
            path.display()
        );

        Ok(DownloadOutcome {
            file_name,
            path,
            data_uri: uri,
        })
    }

    /// 以图片形式复制到系统剪贴板。
    pub async fn copy(&self, host: Arc<dyn ExportHost>, request: ExportRequest) -> Result<(), ExportError> {
        let started = Instant::now();
        let surface = validated_surface(&request)?;

        if !host.supports_image_clipboard() {
            log::warn!("🚫 宿主不支持图片剪贴板");
            return Err(ExportError::Unsupported);
        }

        let config = self.config_snapshot()?;

        let raster_started = Instant::now();
        let raster = self.rasterize(surface, &config)?;
        let image = self.decode_for_clipboard(&raster, &config)?;
        let raster_ms = raster_started.elapsed().as_millis();

        let copy_started = Instant::now();
        tokio::task::spawn_blocking(move || clipboard_writer::write_image_with_retry(host.as_ref(), &image, &config))
            .await
            .map_err(|e| ExportError::Clipboard(format!("线程执行失败：{}", e)))??;

        log::info!(
            "⏱️ 复制完成 - rasterize={}ms copy={}ms total={}ms",
            raster_ms,
            copy_started.elapsed().as_millis(),
            started.elapsed().as_millis()
        );

        Ok(())
    }

    /// 打开只含画面的打印视图。
    pub fn print(&self, host: &dyn ExportHost, request: &ExportRequest) -> Result<(), ExportError> {
        let surface = validated_surface(request)?;
        let title = format!("Print {}", request.target.noun());
        let html = print_document(&title, surface);
        host.print_document(&title, &html)
    }
}

fn validated_surface(request: &ExportRequest) -> Result<&RenderedSurface, ExportError> {
    if request.payload.is_empty() {
        log::debug!("⛔ 载荷为空，跳过导出");
        return Err(ExportError::EmptyPayload);
    }
    request.surface.as_ref().ok_or(ExportError::NoSurface)
}

/// `{qrcode|barcode}-{毫秒时间戳}.png`
pub fn export_file_name(target: ExportTarget) -> String {
    format!("{}-{}.png", target.file_prefix(), chrono::Utc::now().timestamp_millis())
}

/// 打印文档只包含画面本身，矢量画面直接内联。
fn print_document(title: &str, surface: &RenderedSurface) -> String {
    let body = match surface {
        RenderedSurface::Vector { svg, .. } => svg.clone(),
        RenderedSurface::Raster { width, height, .. } => format!(
            r#"<img src="{}" width="{}" height="{}" alt="">"#,
            surface.preview_data_uri(),
            width,
            height
        ),
    };

    format!(
        concat!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>",
            "<style>@page{{margin:0}}body{{margin:0;display:flex;align-items:center;",
            "justify-content:center;min-height:100vh}}</style></head><body>{}</body></html>"
        ),
        title, body
    )
}
