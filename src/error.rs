//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，各子系统（渲染 / 导出 / 身份）保留自己的
//! 细粒度错误类型，在命令层统一上转为 `AppError`。
//!
//! 所有 `#[tauri::command]` 函数统一返回 `Result<T, AppError>`，
//! 前端通过 `Serialize` 获得结构化的错误信息。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为子系统错误提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 Tauri IPC 要求。

use serde::Serialize;

use crate::export::ExportError;
use crate::identity::IdentityError;
use crate::render::RenderError;

/// 应用级统一错误类型
///
/// 所有 Tauri command 均返回此类型，确保前端收到一致的错误格式。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 符号渲染失败（外部渲染库拒绝了载荷）
    #[error("{0}")]
    Render(#[from] RenderError),

    /// 导出流水线错误（栅格化 / 剪贴板 / 保存 / 打印）
    #[error("{0}")]
    Export(#[from] ExportError),

    /// 身份提供方错误，已映射为面向用户的文案
    #[error("{}", .0.user_message())]
    Identity(#[from] IdentityError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 导出目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 配置读写失败
    #[error("配置错误: {0}")]
    Config(String),

    /// 非法入参（未知类型、颜色格式错误等）
    #[error("参数无效: {0}")]
    InvalidInput(String),

    /// 共享状态锁中毒等内部状态错误
    #[error("状态异常: {0}")]
    State(String),
}

/// Tauri IPC 要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_errors_serialize_as_user_message() {
        let err = AppError::from(IdentityError::provider("auth/invalid-credential", "INVALID_LOGIN_CREDENTIALS"));
        let json = serde_json::to_string(&err).expect("serialize");
        assert_eq!(json, "\"Invalid email or password\"");
    }

    #[test]
    fn invalid_input_mentions_detail() {
        let err = AppError::InvalidInput("未知码制: qr".to_string());
        assert!(err.to_string().contains("未知码制"));
    }
}
