//! # 身份错误
//!
//! 身份提供方返回的错误码（`auth/...`）在这里统一映射为面向用户的文案；
//! 未映射的错误码直接透传提供方的原始消息。

/// 身份链路错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter your email address")]
    MissingEmail,

    #[error("身份服务未配置 API Key")]
    NotConfigured,

    #[error("网络错误：{0}")]
    Network(String),

    /// 提供方返回的业务错误。
    #[error("{message}")]
    Provider { code: String, message: String },

    #[error("会话状态异常：{0}")]
    Session(String),
}

impl IdentityError {
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            code: code.into(),
            message: message.into(),
        }
    }

    /// 提供方错误码（仅 `Provider` 有）。
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Provider { code, .. } => Some(code),
            _ => None,
        }
    }

    /// 展示给用户的文案。
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { code, message } => match code.as_str() {
                "auth/invalid-credential" => "Invalid email or password".to_string(),
                "auth/user-not-found" => "No account found with this email".to_string(),
                _ => message.clone(),
            },
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_codes_use_friendly_text() {
        assert_eq!(
            IdentityError::provider("auth/invalid-credential", "x").user_message(),
            "Invalid email or password"
        );
        assert_eq!(
            IdentityError::provider("auth/user-not-found", "x").user_message(),
            "No account found with this email"
        );
    }

    #[test]
    fn unmapped_codes_pass_raw_message_through() {
        let err = IdentityError::provider("auth/too-many-requests", "Firebase: Error (auth/too-many-requests).");
        assert_eq!(err.user_message(), "Firebase: Error (auth/too-many-requests).");
        assert_eq!(err.code(), Some("auth/too-many-requests"));
    }

    #[test]
    fn form_errors() {
        assert_eq!(IdentityError::MissingFields.user_message(), "Please fill in all fields");
        assert_eq!(IdentityError::MissingEmail.user_message(), "Please enter your email address");
    }
}
