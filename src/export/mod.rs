//! # 导出模块（export）
//!
//! ## 设计思路
//!
//! 将“校验 → 栅格化 → 保存 / 写剪贴板 / 打印 → Tauri 命令暴露”按职责拆分为多个子模块：
//!
//! - `commands`：仅做 IPC 入参/出参适配（薄封装）
//! - `service`：承载可注入状态（`ExportServiceState`）
//! - `handler`：编排三条导出链路
//! - `pipeline`：SVG 栅格化、PNG 校验与 RGBA 解码
//! - `clipboard_writer`：剪贴板写入分类与重试
//! - `host`：宿主能力抽象与 Tauri 实现
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! generator::commands（面板动作）
//!    ↓
//! service.rs（State 注入）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ pipeline.rs（栅格化 + 像素限制）
//!    ├─ clipboard_writer.rs（写剪贴板 + 重试）
//!    └─ host.rs（保存 / 剪贴板 / 打印）
//!    ↓
//! ExportError → 面板提示 / AppError
//! ```

pub mod commands;
mod clipboard_writer;
mod config;
mod error;
mod handler;
mod host;
mod pipeline;
mod service;
mod source;

pub use clipboard_writer::{ClipboardFailureKind, ClipboardWriteFailure};
pub use commands::{get_export_config, set_export_config, ExportCommandError};
pub use config::ExportConfig;
pub use error::ExportError;
pub use handler::{export_file_name, DownloadOutcome, ExportHandler};
pub use host::{ExportHost, TauriExportHost};
pub use service::ExportServiceState;
pub use source::{ClipboardImage, ExportRequest, ExportTarget, RasterImage};
