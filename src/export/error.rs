//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 单一错误枚举承载导出链路（栅格化 → 剪贴板 / 保存 / 打印）中的所有失败来源。
//! `code()` / `stage()` 提供稳定标识，命令层据此生成结构化错误，
//! 面板层据此挑选面向用户的提示文案。

/// 导出链路统一错误类型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// 载荷为空，不触发任何宿主能力。
    #[error("Please enter a value first")]
    EmptyPayload,

    /// 尚无可导出的画面（首次渲染即失败）。
    #[error("Nothing to export yet")]
    NoSurface,

    /// 宿主不支持图片剪贴板。
    #[error("Your system does not support copying images")]
    Unsupported,

    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("剪贴板忙：{0}")]
    ClipboardBusy(String),

    #[error("图像编码错误：{0}")]
    Encode(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    /// 用户在保存对话框中取消。
    #[error("已取消保存")]
    Cancelled,

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("打印错误：{0}")]
    Print(String),
}

impl ExportError {
    /// 稳定错误码，供前端分支判断。
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyPayload => "EMPTY_PAYLOAD",
            Self::NoSurface => "NO_SURFACE",
            Self::Unsupported => "UNSUPPORTED",
            Self::Clipboard(_) => "CLIPBOARD",
            Self::ClipboardBusy(_) => "CLIPBOARD_BUSY",
            Self::Encode(_) => "ENCODE",
            Self::FileSystem(_) => "FILE_SYSTEM",
            Self::Cancelled => "CANCELLED",
            Self::ResourceLimit(_) => "RESOURCE_LIMIT",
            Self::Print(_) => "PRINT",
        }
    }

    /// 失败所处阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::EmptyPayload | Self::NoSurface => "validate",
            Self::Encode(_) | Self::ResourceLimit(_) => "rasterize",
            Self::Unsupported | Self::Clipboard(_) | Self::ClipboardBusy(_) => "clipboard",
            Self::FileSystem(_) | Self::Cancelled => "save",
            Self::Print(_) => "print",
        }
    }
}
