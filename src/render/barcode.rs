//! # 一维条码渲染
//!
//! ## 实现思路
//!
//! `barcoders` 只给出条空模块序列（`1` 为条、`0` 为空），本模块负责几何布局：
//!
//! ```text
//! ┌──────────────── margin ────────────────┐
//! │  ▌▌ ▌▌▌ ▌ ▌▌  ← height，每模块 width 像素 │
//! │      text_margin                        │
//! │     1234567890  ← font_size，居中        │
//! └──────────────── margin ────────────────┘
//! ```
//!
//! 连续的 `1` 合并为一个 `<rect>`，输出确定性的 SVG 文本。

use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::ean13::EAN13;

use super::{RenderError, RenderedSurface, SymbolRenderer};
use crate::barcode::BarcodeFormat;
use crate::options::BarcodeOptions;

/// CODE128 字符集 B 选择符（ASCII 32~127）。
const CODE128_CHARSET_B: char = 'Ɓ';
/// 画布宽高上限，防止误输入导致溢出或超大画布。
const MAX_BARCODE_CANVAS: u32 = 16_384;

/// 条码渲染器。
#[derive(Debug, Default, Clone, Copy)]
pub struct BarcodeRenderer;

impl SymbolRenderer for BarcodeRenderer {
    type Options = BarcodeOptions;

    fn render(&self, value: &str, options: &BarcodeOptions) -> Result<RenderedSurface, RenderError> {
        if options.width == 0 || options.height == 0 {
            return Err(RenderError::InvalidOptions(format!(
                "条宽与条高必须大于 0：width={} height={}",
                options.width, options.height
            )));
        }

        let modules = encode_modules(options.format, value)?;
        let geometry = Geometry::measure(modules.len(), options)?;
        let text = options.format.human_readable(value);
        let svg = layout_svg(&modules, &text, &geometry, options);

        Ok(RenderedSurface::Vector {
            svg: svg.document,
            width: svg.width,
            height: svg.height,
        })
    }
}

/// 条空模块序列。
fn encode_modules(format: BarcodeFormat, value: &str) -> Result<Vec<u8>, RenderError> {
    let symbology = format.as_str();
    let reject = |e: barcoders::error::Error| RenderError::encode(symbology, format!("{:?}", e));

    match format {
        BarcodeFormat::Code128 => {
            let data = format!("{}{}", CODE128_CHARSET_B, value);
            Ok(Code128::new(data).map_err(reject)?.encode())
        }
        BarcodeFormat::Ean13 => Ok(EAN13::new(value.to_string()).map_err(reject)?.encode()),
        // UPC-A 即首位为 0 的 EAN-13。
        BarcodeFormat::Upc => {
            if value.len() != 11 || !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RenderError::encode(symbology, format!("需要 11 位数字：{:?}", value)));
            }
            Ok(EAN13::new(format!("0{}", value)).map_err(reject)?.encode())
        }
        BarcodeFormat::Code39 => Ok(Code39::new(value.to_uppercase()).map_err(reject)?.encode()),
    }
}

/// 布局尺寸。在 `u64` 中计算并校验上限，之后所有坐标都不超过画布宽高。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    bars_width: u32,
    width: u32,
    height: u32,
    text_baseline: u32,
}

impl Geometry {
    fn measure(module_count: usize, options: &BarcodeOptions) -> Result<Self, RenderError> {
        let margin = u64::from(options.margin);
        let bars_width = (module_count as u64).saturating_mul(u64::from(options.width));
        let width = bars_width.saturating_add(margin * 2);
        let text_block = if options.display_value {
            u64::from(options.font_size) + u64::from(options.text_margin)
        } else {
            0
        };
        let height = u64::from(options.height) + margin * 2 + text_block;
        let text_baseline = margin + u64::from(options.height) + text_block;

        let limit = u64::from(MAX_BARCODE_CANVAS);
        if width > limit || height > limit {
            return Err(RenderError::InvalidOptions(format!(
                "条码画布超出上限 {}px：{}x{}",
                MAX_BARCODE_CANVAS, width, height
            )));
        }

        let narrow = |v: u64| u32::try_from(v).map_err(|_| RenderError::InvalidOptions(format!("尺寸越界：{}", v)));
        Ok(Self {
            bars_width: narrow(bars_width)?,
            width: narrow(width)?,
            height: narrow(height)?,
            text_baseline: narrow(text_baseline)?,
        })
    }
}

struct SvgLayout {
    document: String,
    width: u32,
    height: u32,
}

fn layout_svg(modules: &[u8], text: &str, geometry: &Geometry, options: &BarcodeOptions) -> SvgLayout {
    let Geometry {
        bars_width,
        width,
        height,
        text_baseline,
    } = *geometry;

    let mut doc = String::with_capacity(256 + modules.len() * 48);
    doc.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    ));
    doc.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        width,
        height,
        options.background.to_hex()
    ));

    let line = options.line_color.to_hex();
    for (start, run) in bar_runs(modules) {
        doc.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            options.margin + start as u32 * options.width,
            options.margin,
            run as u32 * options.width,
            options.height,
            line
        ));
    }

    if options.display_value {
        doc.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="monospace" font-size="{}" fill="{}">{}</text>"#,
            options.margin + bars_width / 2,
            text_baseline,
            options.font_size,
            line,
            escape_xml(text)
        ));
    }

    doc.push_str("</svg>");

    SvgLayout {
        document: doc,
        width,
        height,
    }
}

/// 连续条模块的 `(起始下标, 长度)`。
fn bar_runs(modules: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, m) in modules.iter().enumerate() {
        match (*m == 1, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, modules.len() - s));
    }

    runs
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
