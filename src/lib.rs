//! # 二维码 / 条码生成器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  前端 (ui/index.html)                     │
//! │                                                          │
//! │  Dashboard ── QR 面板 ── 条码面板 ── 登录 / 注册          │
//! │       │  (notification-changed / session-changed 事件)   │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC (Result<T, AppError>)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ payload ──── 原始输入 → 编码内容 (纯函数)             │
//! │  ├─ barcode ──── 条码格式约束 (提示 + 校验)               │
//! │  ├─ options ──── 面板选项与增量更新                       │
//! │  ├─ render ───── qrcode / barcoders → 位图或 SVG          │
//! │  ├─ export ───── 下载 · 复制 · 打印 (带重试的剪贴板写入)  │
//! │  ├─ notification 单槽提示 + 3 秒到期                      │
//! │  ├─ generator ── 两个面板的状态机与命令                   │
//! │  ├─ identity ─── Firebase REST 登录 / 会话                │
//! │  ├─ dashboard ── 示例统计与最近记录                       │
//! │  ├─ config ───── JSON 配置文件                            │
//! │  └─ storage ──── 导出目录解析与统计                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有 Tauri command 的返回类型 |
//! | [`payload`] | 码型枚举与各码型的内容格式化 |
//! | [`barcode`] | 条码格式的输入提示与合法性判断 |
//! | [`render`] | 把编码内容渲染为 PNG 位图或 SVG 矢量图 |
//! | [`export`] | 导出流水线：文件下载、剪贴板复制、打印 |
//! | [`generator`] | 面板状态、重新渲染时机、导出结果到提示的映射 |
//! | [`identity`] | 身份提供方抽象与进程级会话 |

pub mod barcode;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod generator;
pub mod identity;
pub mod notification;
pub mod options;
pub mod payload;
pub mod render;
pub mod storage;
