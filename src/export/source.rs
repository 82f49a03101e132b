//! # 导出请求与中间模型
//!
//! - `ExportRequest`：面板在锁内截取的快照（载荷 + 当前画面）
//! - `RasterImage`：栅格化后的 PNG
//! - `ClipboardImage`：可直接写入剪贴板的 RGBA 数据

use serde::Serialize;

use crate::render::RenderedSurface;

/// 导出目标，决定文件名前缀与提示文案。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    QrCode,
    Barcode,
}

impl ExportTarget {
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::QrCode => "qrcode",
            Self::Barcode => "barcode",
        }
    }

    /// 提示文案中的名词。
    pub fn noun(self) -> &'static str {
        match self {
            Self::QrCode => "QR code",
            Self::Barcode => "Barcode",
        }
    }
}

/// 一次导出动作的输入。
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub target: ExportTarget,
    /// 格式化后的载荷，空串表示用户尚未输入。
    pub payload: String,
    pub surface: Option<RenderedSurface>,
}

/// 栅格化输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// 解码后的 RGBA 像素（`width * height * 4`）。
#[derive(Debug, Clone)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
}
