//! # 绘制表面
//!
//! `RenderedSurface` 是一次渲染的产物；`SurfaceSlot` 是面板持有的持久表面，
//! 每次渲染原地替换内容，调用方不应假设两次渲染之间“表面身份”会变化。

use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use super::{RenderError, SymbolRenderer};

/// 表面种类：二维码为栅格，条码为矢量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Raster,
    Vector,
}

/// 一次渲染的输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedSurface {
    /// PNG 编码的栅格图像。
    Raster { png: Vec<u8>, width: u32, height: u32 },
    /// SVG 文档。
    Vector { svg: String, width: u32, height: u32 },
}

impl RenderedSurface {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Self::Raster { .. } => SurfaceKind::Raster,
            Self::Vector { .. } => SurfaceKind::Vector,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Raster { width, .. } | Self::Vector { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Raster { height, .. } | Self::Vector { height, .. } => *height,
        }
    }

    /// 供前端 `<img src>` 直接预览的 Data URL。
    pub fn preview_data_uri(&self) -> String {
        match self {
            Self::Raster { png, .. } => data_uri("image/png", png),
            Self::Vector { svg, .. } => data_uri("image/svg+xml", svg.as_bytes()),
        }
    }
}

/// 组装 `data:<mime>;base64,<payload>`。
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// 面板持有的持久绘制表面。
#[derive(Debug, Default)]
pub struct SurfaceSlot {
    surface: Option<RenderedSurface>,
    render_count: u64,
    last_error: Option<RenderError>,
}

impl SurfaceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 执行一次完整渲染并写入表面。
    ///
    /// 失败时保留上一次成功的内容，仅记录日志与错误。
    pub fn render_with<R: SymbolRenderer>(
        &mut self,
        renderer: &R,
        value: &str,
        options: &R::Options,
    ) -> Result<(), RenderError> {
        self.render_count += 1;

        match renderer.render(value, options) {
            Ok(surface) => {
                log::debug!(
                    "🖼️ 渲染完成 #{} - {:?} {}x{}",
                    self.render_count,
                    surface.kind(),
                    surface.width(),
                    surface.height()
                );
                self.surface = Some(surface);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                log::error!("❌ 渲染失败 #{}（保留旧画面）: {}", self.render_count, err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn surface(&self) -> Option<&RenderedSurface> {
        self.surface.as_ref()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn last_error(&self) -> Option<&RenderError> {
        self.last_error.as_ref()
    }
}
