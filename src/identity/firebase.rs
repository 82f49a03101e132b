//! # Firebase 身份实现
//!
//! ## 实现思路
//!
//! 直接调用 Identity Toolkit v1 REST 接口：
//!
//! | 能力 | 接口 |
//! |------|------|
//! | 邮箱密码登录 | `accounts:signInWithPassword` |
//! | 注册 | `accounts:signUp` + `accounts:update`（写入昵称） |
//! | 重置密码 | `accounts:sendOobCode`（`PASSWORD_RESET`） |
//! | Google 登录 | `accounts:signInWithIdp` |
//!
//! 接口错误体 `{"error":{"message":"EMAIL_NOT_FOUND"}}` 被映射为 `auth/...` 错误码，
//! 与 Web SDK 抛出的错误码保持一致，便于统一文案映射。

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{IdentityError, IdentityProvider, User};

const DEFAULT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);

/// Firebase Authentication REST 客户端。
#[derive(Debug, Clone)]
pub struct FirebaseIdentity {
    client: reqwest::Client,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl From<AuthResponse> for User {
    fn from(resp: AuthResponse) -> Self {
        Self {
            uid: resp.local_id,
            email: resp.email,
            display_name: resp.display_name.filter(|n| !n.is_empty()),
            photo_url: resp.photo_url.filter(|p| !p.is_empty()),
            id_token: resp.id_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseIdentity {
    pub fn new(api_key: Option<String>) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| IdentityError::Network(format!("创建 HTTP 客户端失败：{}", e)))?;

        Ok(Self {
            client,
            api_key,
        })
    }

    /// 复用连接池，替换 API Key（配置变更后生效）。
    pub fn with_api_key(&self, api_key: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self, method: &str) -> Result<String, IdentityError> {
        let key = self.api_key.as_deref().ok_or(IdentityError::NotConfigured)?;
        Ok(format!("{}/accounts:{}?key={}", DEFAULT_ENDPOINT, method, key))
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, IdentityError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = self.url(method)?;
        log::debug!("🔐 调用身份接口 accounts:{}", method);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::Network(format!("读取响应失败：{}", e)))?;

        if !status.is_success() {
            let err = parse_error_body(&text);
            log::warn!("❌ 身份接口 accounts:{} 返回 {}：{:?}", method, status, err.code());
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| IdentityError::Network(format!("响应解析失败：{}", e)))
    }
}

/// 将 REST 错误体映射为 `auth/...` 错误码。
pub(crate) fn parse_error_body(body: &str) -> IdentityError {
    let raw = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => return IdentityError::provider("auth/internal-error", body.to_string()),
    };

    // 形如 "WEAK_PASSWORD : Password should be at least 6 characters"
    let key = raw.split(" : ").next().unwrap_or(&raw).trim();

    let code = match key {
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => "auth/invalid-credential",
        "INVALID_PASSWORD" => "auth/wrong-password",
        "EMAIL_NOT_FOUND" => "auth/user-not-found",
        "EMAIL_EXISTS" => "auth/email-already-in-use",
        "WEAK_PASSWORD" => "auth/weak-password",
        "INVALID_EMAIL" => "auth/invalid-email",
        "MISSING_PASSWORD" => "auth/missing-password",
        "USER_DISABLED" => "auth/user-disabled",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "auth/too-many-requests",
        "OPERATION_NOT_ALLOWED" => "auth/operation-not-allowed",
        _ => return IdentityError::provider("auth/internal-error", raw.clone()),
    };

    IdentityError::provider(code, format!("Firebase: Error ({}).", code))
}

impl IdentityProvider for FirebaseIdentity {
    async fn login(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let resp: AuthResponse = self.call("signInWithPassword", &body).await?;
        Ok(resp.into())
    }

    async fn register_account(&self, email: &str, password: &str, display_name: &str) -> Result<User, IdentityError> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let created: AuthResponse = self.call("signUp", &body).await?;
        let mut user = User::from(created);

        let token = user
            .id_token
            .clone()
            .ok_or_else(|| IdentityError::Session("注册响应缺少 idToken".to_string()))?;
        let update = json!({ "idToken": token, "displayName": display_name, "returnSecureToken": false });
        let _: serde_json::Value = self.call("update", &update).await?;

        user.display_name = Some(display_name.to_string());
        Ok(user)
    }

    async fn reset_password(&self, email: &str) -> Result<(), IdentityError> {
        let body = json!({ "requestType": "PASSWORD_RESET", "email": email });
        let _: serde_json::Value = self.call("sendOobCode", &body).await?;
        Ok(())
    }

    async fn google_sign_in(&self, id_token: &str) -> Result<User, IdentityError> {
        let body = json!({
            "postBody": format!("id_token={}&providerId=google.com", id_token),
            "requestUri": "http://localhost",
            "returnSecureToken": true,
            "returnIdpCredential": true,
        });
        let resp: AuthResponse = self.call("signInWithIdp", &body).await?;
        Ok(resp.into())
    }

    /// REST 会话是无状态的，退出只需丢弃本地令牌。
    async fn logout(&self) -> Result<(), IdentityError> {
        Ok(())
    }
}
