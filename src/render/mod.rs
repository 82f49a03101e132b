//! # 渲染适配模块（render）
//!
//! ## 设计思路
//!
//! 符号本身（二维码矩阵、条码条空序列）完全交给外部库计算：
//! - 二维码：`qrcode` 计算模块矩阵，本模块按像素尺寸铺成 RGBA 栅格并编码 PNG
//! - 条码：`barcoders` 计算条空模块，本模块按 JsBarcode 的几何规则布局 SVG
//!
//! 渲染结果写入一个持久的 `SurfaceSlot`：成功则原地替换内容，
//! 失败只记录日志并保留上一次的内容，不让界面崩溃。
//!
//! ## 调用链
//!
//! ```text
//! generator（每次输入 / 选项变化）
//!    ↓
//! SurfaceSlot::render_with
//!    ├─ QrRenderer      → RenderedSurface::Raster（PNG）
//!    └─ BarcodeRenderer → RenderedSurface::Vector（SVG）
//! ```

mod barcode;
mod error;
mod qr;
mod surface;

pub use barcode::BarcodeRenderer;
pub use error::RenderError;
pub use qr::QrRenderer;
pub use surface::{data_uri, RenderedSurface, SurfaceKind, SurfaceSlot};

/// 外部符号渲染能力的薄封装。
///
/// 同样的 `(value, options)` 必须得到逐字节相同的输出。
pub trait SymbolRenderer {
    type Options;

    fn render(&self, value: &str, options: &Self::Options) -> Result<RenderedSurface, RenderError>;
}
