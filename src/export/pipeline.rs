//! # 栅格化与解码流水线
//!
//! ## 设计思路
//!
//! 导出只接受 PNG：二维码画面本身就是 PNG，条码的 SVG 需要先经 `resvg`
//! 按其自身尺寸栅格化（等价于浏览器里把 SVG 画到同尺寸 canvas 上）。
//! 在真正分配像素缓冲前先按像素上限快速拒绝。
//!
//! ## 实现思路
//!
//! 1. 矢量 → `usvg::Tree` → 读取尺寸并校验上限 → `tiny_skia::Pixmap` → PNG
//! 2. 栅格 → 用 `infer` 校验 PNG 签名后直接复用
//! 3. 复制场景再解码为 RGBA，并校验字节长度一致性

use std::sync::Arc;

use image::{GenericImageView, ImageFormat};
use once_cell::sync::Lazy;
use resvg::{tiny_skia, usvg};

use super::source::{ClipboardImage, RasterImage};
use super::{ExportConfig, ExportError, ExportHandler};
use crate::render::RenderedSurface;

/// 系统字体库只加载一次，条码下方的文字依赖它。
static FONT_DB: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("🔤 已加载系统字体 {} 个", db.len());
    Arc::new(db)
});

impl ExportHandler {
    /// 将画面转换为 PNG 栅格。
    pub(crate) fn rasterize(
        &self,
        surface: &RenderedSurface,
        config: &ExportConfig,
    ) -> Result<RasterImage, ExportError> {
        match surface {
            RenderedSurface::Raster { png, width, height } => {
                Self::ensure_png(png)?;
                Self::validate_pixel_limits(config, *width, *height)?;
                Ok(RasterImage {
                    png: png.clone(),
                    width: *width,
                    height: *height,
                })
            }
            RenderedSurface::Vector { svg, .. } => Self::rasterize_svg(svg, config),
        }
    }

    fn rasterize_svg(svg: &str, config: &ExportConfig) -> Result<RasterImage, ExportError> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&FONT_DB);

        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| ExportError::Encode(format!("SVG 解析失败：{}", e)))?;

        let size = tree.size().to_int_size();
        Self::validate_pixel_limits(config, size.width(), size.height())?;

        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or_else(|| ExportError::Encode(format!("无法分配画布 {}x{}", size.width(), size.height())))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let png = pixmap
            .encode_png()
            .map_err(|e| ExportError::Encode(format!("PNG 编码失败：{}", e)))?;

        log::debug!("🧩 SVG 栅格化完成 - {}x{}，{} 字节", size.width(), size.height(), png.len());

        Ok(RasterImage {
            png,
            width: size.width(),
            height: size.height(),
        })
    }

    /// 将 PNG 解码为剪贴板可用的 RGBA 数据。
    pub(crate) fn decode_for_clipboard(
        &self,
        raster: &RasterImage,
        config: &ExportConfig,
    ) -> Result<ClipboardImage, ExportError> {
        Self::validate_pixel_limits(config, raster.width, raster.height)?;

        let decoded = image::load_from_memory_with_format(&raster.png, ImageFormat::Png)
            .map_err(|e| ExportError::Encode(format!("PNG 解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        let bytes = decoded.to_rgba8().into_raw();

        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ExportError::ResourceLimit("图片尺寸导致内存溢出风险".to_string()))?;

        if bytes.len() != expected_len {
            return Err(ExportError::Encode("解码后像素数据长度异常".to_string()));
        }

        Ok(ClipboardImage {
            width: width as usize,
            height: height as usize,
            bytes,
        })
    }

    fn ensure_png(bytes: &[u8]) -> Result<(), ExportError> {
        match infer::get(bytes) {
            Some(kind) if kind.mime_type() == "image/png" => Ok(()),
            Some(kind) => Err(ExportError::Encode(format!("画面不是 PNG：{}", kind.mime_type()))),
            None => Err(ExportError::Encode("无法识别画面格式".to_string())),
        }
    }

    fn validate_pixel_limits(config: &ExportConfig, width: u32, height: u32) -> Result<(), ExportError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ExportError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels == 0 {
            return Err(ExportError::Encode("画面尺寸为 0".to_string()));
        }

        if pixels > config.max_raster_pixels {
            return Err(ExportError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_raster_pixels
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BarcodeOptions, QrOptions};
    use crate::render::{BarcodeRenderer, QrRenderer, SymbolRenderer};

    fn handler() -> ExportHandler {
        ExportHandler::new(ExportConfig::default())
    }

    #[test]
    fn qr_raster_passes_through_unchanged() {
        let surface = QrRenderer.render("hello", &QrOptions::default()).expect("render");
        let raster = handler().rasterize(&surface, &ExportConfig::default()).expect("rasterize");
        assert_eq!((raster.width, raster.height), (200, 200));
        match surface {
            RenderedSurface::Raster { png, .. } => assert_eq!(raster.png, png),
            RenderedSurface::Vector { .. } => unreachable!(),
        }
    }

    #[test]
    fn barcode_svg_rasterizes_at_own_size() {
        let options = BarcodeOptions::default();
        let surface = BarcodeRenderer.render("Sample", &options).expect("render");
        let raster = handler().rasterize(&surface, &ExportConfig::default()).expect("rasterize");
        assert_eq!((raster.width, raster.height), (surface.width(), surface.height()));
        assert_eq!(infer::get(&raster.png).map(|k| k.mime_type()), Some("image/png"));
    }

    #[test]
    fn pixel_limit_rejects_large_surface() {
        let config = ExportConfig {
            max_raster_pixels: 10_000,
            ..ExportConfig::default()
        };
        let surface = QrRenderer.render("hello", &QrOptions::default()).expect("render");
        assert!(matches!(
            handler().rasterize(&surface, &config),
            Err(ExportError::ResourceLimit(_))
        ));
    }

    #[test]
    fn non_png_raster_is_rejected() {
        let surface = RenderedSurface::Raster {
            png: b"GIF89a....".to_vec(),
            width: 1,
            height: 1,
        };
        assert!(matches!(
            handler().rasterize(&surface, &ExportConfig::default()),
            Err(ExportError::Encode(_))
        ));
    }

    #[test]
    fn decode_yields_rgba_of_expected_length() {
        let surface = QrRenderer
            .render("hello", &QrOptions { size: 64, ..QrOptions::default() })
            .expect("render");
        let raster = handler().rasterize(&surface, &ExportConfig::default()).expect("rasterize");
        let image = handler()
            .decode_for_clipboard(&raster, &ExportConfig::default())
            .expect("decode");
        assert_eq!((image.width, image.height), (64, 64));
        assert_eq!(image.bytes.len(), 64 * 64 * 4);
    }
}
