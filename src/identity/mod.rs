//! # 身份与会话模块（identity）
//!
//! - `provider`：`IdentityProvider` 能力抽象、用户模型、表单校验
//! - `firebase`：基于 Identity Toolkit REST 的实现
//! - `session`：进程级会话状态（显式 init / teardown）
//! - `error`：提供方错误码到用户文案的映射

pub mod commands;
mod error;
mod firebase;
mod provider;
mod session;

pub use error::IdentityError;
pub use firebase::FirebaseIdentity;
pub use provider::{validate_login, validate_registration, validate_reset, IdentityProvider, User};
pub use session::{SessionState, RESET_SENT_MESSAGE, SESSION_EVENT};
