//! # 生成器面板模块（generator）
//!
//! ## 设计思路
//!
//! 每个面板都是一个显式的状态持有者，把各叶子模块串成一条纯函数组合链：
//!
//! ```text
//! 原始输入 ─▶ payload::format_payload ─▶ (条码) barcode 约束描述
//!                     │
//!                     ▼
//!          render::SurfaceSlot::render_with（每次修改恰好一次）
//!                     │
//!                     ▼
//!          export（按需：下载 / 复制 / 打印）─▶ notification
//! ```
//!
//! - `panel`：两个面板共享的状态与快照
//! - `qr` / `barcode`：各自的选项与类型切换规则
//! - `workspace`：Tauri 注入状态，负责锁与异步导出编排
//! - `commands`：IPC 薄封装

pub mod commands;
mod barcode;
mod panel;
mod qr;
mod workspace;

pub use barcode::BarcodeGenerator;
pub use panel::{PanelPhase, PanelSnapshot, SelectorChoice};
pub use qr::QrGenerator;
pub use workspace::{ExportReport, GeneratorState, PanelKind};

use panel::PanelCore;

/// 面板的公共部分访问器。
pub(crate) trait Panel {
    fn core(&self) -> &PanelCore;
    fn core_mut(&mut self) -> &mut PanelCore;
}
