//! # 二维码渲染
//!
//! ## 实现思路
//!
//! 1. `qrcode` 按纠错级别计算模块矩阵
//! 2. 以 1 像素 / 模块铺出网格（可选 4 模块静区）
//! 3. 最近邻缩放到精确的 `size × size`（与 canvas 绘制的分数模块宽一致）
//! 4. 编码为 PNG

use fast_image_resize as fr;
use image::codecs::png::PngEncoder;
use image::{ImageBuffer, ImageEncoder, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

use super::{RenderError, RenderedSurface, SymbolRenderer};
use crate::options::{ErrorCorrectionLevel, QrOptions};

/// 静区宽度（模块数）。
const QUIET_ZONE_MODULES: u32 = 4;
/// 防止误输入导致超大画布。
const MAX_QR_SIZE: u32 = 4096;

/// 二维码渲染器。
#[derive(Debug, Default, Clone, Copy)]
pub struct QrRenderer;

impl SymbolRenderer for QrRenderer {
    type Options = QrOptions;

    fn render(&self, value: &str, options: &QrOptions) -> Result<RenderedSurface, RenderError> {
        if options.size == 0 || options.size > MAX_QR_SIZE {
            return Err(RenderError::InvalidOptions(format!(
                "二维码尺寸必须在 1~{} 像素之间：{}",
                MAX_QR_SIZE, options.size
            )));
        }

        let code = QrCode::with_error_correction_level(value.as_bytes(), to_ec_level(options.level))
            .map_err(|e| RenderError::encode("QR", e.to_string()))?;

        let grid = paint_module_grid(&code, options);
        let scaled = scale_to_size(grid, options.size)?;
        let png = encode_png(&scaled)?;

        Ok(RenderedSurface::Raster {
            png,
            width: options.size,
            height: options.size,
        })
    }
}

fn to_ec_level(level: ErrorCorrectionLevel) -> EcLevel {
    match level {
        ErrorCorrectionLevel::L => EcLevel::L,
        ErrorCorrectionLevel::M => EcLevel::M,
        ErrorCorrectionLevel::Q => EcLevel::Q,
        ErrorCorrectionLevel::H => EcLevel::H,
    }
}

/// 1 像素 / 模块的网格图像。
fn paint_module_grid(code: &QrCode, options: &QrOptions) -> RgbaImage {
    let modules = code.width() as u32;
    let quiet = if options.include_margin { QUIET_ZONE_MODULES } else { 0 };
    let side = modules + quiet * 2;

    let dark = Rgba(options.fg_color.to_rgba());
    let mut grid = ImageBuffer::from_pixel(side, side, Rgba(options.bg_color.to_rgba()));

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color == qrcode::Color::Dark {
            let x = (i as u32) % modules + quiet;
            let y = (i as u32) / modules + quiet;
            grid.put_pixel(x, y, dark);
        }
    }

    grid
}

fn scale_to_size(grid: RgbaImage, size: u32) -> Result<RgbaImage, RenderError> {
    if grid.width() == size {
        return Ok(grid);
    }

    match resize_nearest_with_fast_image_resize(&grid, size) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops：{}", err);
            Ok(image::imageops::resize(
                &grid,
                size,
                size,
                image::imageops::FilterType::Nearest,
            ))
        }
    }
}

fn resize_nearest_with_fast_image_resize(grid: &RgbaImage, size: u32) -> Result<RgbaImage, RenderError> {
    let src_image = fr::images::Image::from_vec_u8(
        grid.width(),
        grid.height(),
        grid.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| RenderError::Raster(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(size, size, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Nearest);

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| RenderError::Raster(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(size, size, dst_image.into_vec())
        .ok_or_else(|| RenderError::Raster("fast_image_resize 输出缓冲长度异常".to_string()))
}

pub(crate) fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Raster(format!("PNG 编码失败：{}", e)))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Rgb;

    fn decode(surface: &RenderedSurface) -> RgbaImage {
        match surface {
            RenderedSurface::Raster { png, .. } => image::load_from_memory(png).expect("valid png").to_rgba8(),
            RenderedSurface::Vector { .. } => panic!("QR must render to raster"),
        }
    }

    #[test]
    fn output_has_exact_requested_size() {
        let options = QrOptions {
            size: 237,
            ..QrOptions::default()
        };
        let surface = QrRenderer.render("https://example.com", &options).expect("render");
        assert_eq!((surface.width(), surface.height()), (237, 237));
        let image = decode(&surface);
        assert_eq!(image.dimensions(), (237, 237));
    }

    #[test]
    fn margin_paints_background_corner() {
        let options = QrOptions {
            bg_color: Rgb(10, 20, 30),
            ..QrOptions::default()
        };
        let image = decode(&QrRenderer.render("hello", &options).expect("render"));
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn without_margin_finder_pattern_touches_corner() {
        let options = QrOptions {
            include_margin: false,
            fg_color: Rgb(200, 0, 0),
            ..QrOptions::default()
        };
        let image = decode(&QrRenderer.render("hello", &options).expect("render"));
        assert_eq!(image.get_pixel(0, 0).0, [200, 0, 0, 255]);
    }

    #[test]
    fn rendering_is_deterministic() {
        let options = QrOptions::default();
        let a = QrRenderer.render("WIFI:S:HomeNet;T:WPA;P:;", &options).expect("render");
        let b = QrRenderer.render("WIFI:S:HomeNet;T:WPA;P:;", &options).expect("render");
        assert_eq!(a, b);
    }

    #[test]
    fn zero_size_is_rejected() {
        let options = QrOptions {
            size: 0,
            ..QrOptions::default()
        };
        assert!(matches!(
            QrRenderer.render("x", &options),
            Err(RenderError::InvalidOptions(_))
        ));
    }

    #[test]
    fn oversized_payload_is_an_encode_error() {
        let huge = "x".repeat(8_000);
        let options = QrOptions {
            level: ErrorCorrectionLevel::H,
            ..QrOptions::default()
        };
        assert!(matches!(
            QrRenderer.render(&huge, &options),
            Err(RenderError::Encode { symbology: "QR", .. })
        ));
    }
}
