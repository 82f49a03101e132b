//! # 身份提供方抽象

use std::future::Future;

use serde::Serialize;

use super::IdentityError;

/// 已登录用户。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// 访问令牌只留在后端。
    #[serde(skip)]
    pub id_token: Option<String>,
}

/// 身份提供方能力。
pub trait IdentityProvider: Send + Sync {
    fn login(&self, email: &str, password: &str) -> impl Future<Output = Result<User, IdentityError>> + Send;

    fn register_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> impl Future<Output = Result<User, IdentityError>> + Send;

    fn reset_password(&self, email: &str) -> impl Future<Output = Result<(), IdentityError>> + Send;

    /// 使用 Google ID Token 交换会话。
    fn google_sign_in(&self, id_token: &str) -> impl Future<Output = Result<User, IdentityError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), IdentityError>> + Send;
}

/// 登录表单：邮箱与密码都必填。
pub fn validate_login(email: &str, password: &str) -> Result<(), IdentityError> {
    if email.is_empty() || password.is_empty() {
        return Err(IdentityError::MissingFields);
    }
    Ok(())
}

pub fn validate_registration(email: &str, password: &str, display_name: &str) -> Result<(), IdentityError> {
    if email.is_empty() || password.is_empty() || display_name.trim().is_empty() {
        return Err(IdentityError::MissingFields);
    }
    Ok(())
}

pub fn validate_reset(email: &str) -> Result<(), IdentityError> {
    if email.is_empty() {
        return Err(IdentityError::MissingEmail);
    }
    Ok(())
}
