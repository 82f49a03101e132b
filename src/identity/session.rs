//! # 会话状态
//!
//! ## 设计思路
//!
//! 当前用户是进程级共享状态，由 `tokio::sync::watch` 承载：
//! 写入方只有本模块，订阅方包括前端事件转发任务和任意后端观察者。
//!
//! ## 生命周期
//!
//! ```text
//! setup ──▶ init(app)：启动转发任务，变化时发出 `session-changed`
//!   ...
//! exit  ──▶ teardown()：终止转发任务，清空会话
//! ```

use std::sync::Mutex;

use tauri::{AppHandle, Emitter, Wry};
use tokio::sync::watch;

use super::provider::{validate_login, validate_registration, validate_reset};
use super::{IdentityError, IdentityProvider, User};

/// 会话变化事件名。
pub const SESSION_EVENT: &str = "session-changed";

/// 重置邮件发送成功后的提示。
pub const RESET_SENT_MESSAGE: &str = "Check your email for password reset instructions";

pub struct SessionState {
    sender: watch::Sender<Option<User>>,
    forwarder: Mutex<Option<tauri::async_runtime::JoinHandle<()>>>,
}

impl SessionState {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self {
            sender,
            forwarder: Mutex::new(None),
        }
    }

    /// 启动会话变化转发；重复调用会替换旧任务。
    pub fn init(&self, app: AppHandle<Wry>) -> Result<(), IdentityError> {
        let mut receiver = self.sender.subscribe();
        let task = tauri::async_runtime::spawn(async move {
            while receiver.changed().await.is_ok() {
                let user = receiver.borrow_and_update().clone();
                log::info!(
                    "👤 会话变化：{}",
                    user.as_ref().map(|u| u.uid.as_str()).unwrap_or("<signed out>")
                );
                if let Err(err) = app.emit(SESSION_EVENT, user) {
                    log::warn!("⚠️ 发送会话事件失败: {}", err);
                }
            }
        });

        let mut slot = self
            .forwarder
            .lock()
            .map_err(|_| IdentityError::Session("转发任务锁已中毒".to_string()))?;
        if let Some(previous) = slot.replace(task) {
            previous.abort();
        }
        log::info!("👤 会话状态已初始化");
        Ok(())
    }

    /// 停止转发并清空会话。
    pub fn teardown(&self) {
        match self.forwarder.lock() {
            Ok(mut slot) => {
                if let Some(task) = slot.take() {
                    task.abort();
                }
            }
            Err(_) => log::warn!("⚠️ 会话转发任务锁已中毒，跳过终止"),
        }
        self.sender.send_replace(None);
        log::info!("👤 会话状态已清理");
    }

    pub fn current(&self) -> Option<User> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.sender.subscribe()
    }

    fn set(&self, user: Option<User>) {
        self.sender.send_replace(user);
    }

    pub async fn login<P: IdentityProvider>(
        &self,
        provider: &P,
        email: &str,
        password: &str,
    ) -> Result<User, IdentityError> {
        validate_login(email, password)?;
        let user = provider.login(email, password).await?;
        self.set(Some(user.clone()));
        Ok(user)
    }

    pub async fn register<P: IdentityProvider>(
        &self,
        provider: &P,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, IdentityError> {
        validate_registration(email, password, display_name)?;
        let user = provider.register_account(email, password, display_name).await?;
        self.set(Some(user.clone()));
        Ok(user)
    }

    /// 发送重置邮件，不改变会话。
    pub async fn reset_password<P: IdentityProvider>(&self, provider: &P, email: &str) -> Result<&'static str, IdentityError> {
        validate_reset(email)?;
        provider.reset_password(email).await?;
        Ok(RESET_SENT_MESSAGE)
    }

    pub async fn google_sign_in<P: IdentityProvider>(&self, provider: &P, id_token: &str) -> Result<User, IdentityError> {
        if id_token.is_empty() {
            return Err(IdentityError::MissingFields);
        }
        let user = provider.google_sign_in(id_token).await?;
        self.set(Some(user.clone()));
        Ok(user)
    }

    pub async fn logout<P: IdentityProvider>(&self, provider: &P) -> Result<(), IdentityError> {
        provider.logout().await?;
        self.set(None);
        Ok(())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct StubProvider {
        calls: AtomicUsize,
        reject: bool,
    }

    impl StubProvider {
        fn user(email: &str) -> User {
            User {
                uid: "uid-1".into(),
                email: Some(email.into()),
                display_name: None,
                photo_url: None,
                id_token: Some("token".into()),
            }
        }

        fn outcome(&self, email: &str) -> Result<User, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                Err(IdentityError::provider("auth/invalid-credential", "Firebase: Error (auth/invalid-credential)."))
            } else {
                Ok(Self::user(email))
            }
        }
    }

    impl IdentityProvider for StubProvider {
        async fn login(&self, email: &str, _password: &str) -> Result<User, IdentityError> {
            self.outcome(email)
        }

        async fn register_account(&self, email: &str, _password: &str, display_name: &str) -> Result<User, IdentityError> {
            let mut user = self.outcome(email)?;
            user.display_name = Some(display_name.to_string());
            Ok(user)
        }

        async fn reset_password(&self, _email: &str) -> Result<(), IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn google_sign_in(&self, _id_token: &str) -> Result<User, IdentityError> {
            self.outcome("g@example.com")
        }

        async fn logout(&self) -> Result<(), IdentityError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn login_sets_and_logout_clears_session() {
        let session = SessionState::new();
        let mut changes = session.subscribe();
        let provider = StubProvider::default();

        let user = session.login(&provider, "a@b.c", "pw").await.unwrap();
        assert_eq!(session.current(), Some(user));
        assert!(changes.has_changed().unwrap());
        changes.borrow_and_update();

        session.logout(&provider).await.unwrap();
        assert_eq!(session.current(), None);
        assert!(changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn missing_fields_short_circuit_before_provider() {
        let session = SessionState::new();
        let provider = StubProvider::default();

        let err = session.login(&provider, "", "pw").await.unwrap_err();
        assert_eq!(err, IdentityError::MissingFields);
        let err = session.reset_password(&provider, "").await.unwrap_err();
        assert_eq!(err, IdentityError::MissingEmail);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_login_keeps_session_empty() {
        let session = SessionState::new();
        let provider = StubProvider {
            reject: true,
            ..StubProvider::default()
        };

        let err = session.login(&provider, "a@b.c", "bad").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid email or password");
        assert_eq!(session.current(), None);
    }

    #[tokio::test]
    async fn register_keeps_display_name_and_reset_reports_message() {
        let session = SessionState::new();
        let provider = StubProvider::default();

        let user = session.register(&provider, "a@b.c", "pw", "Ada").await.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Ada"));
        assert_eq!(session.reset_password(&provider, "a@b.c").await.unwrap(), RESET_SENT_MESSAGE);
        assert_eq!(session.current().and_then(|u| u.display_name), Some("Ada".to_string()));
    }

    #[test]
    fn teardown_without_init_clears_user() {
        let session = SessionState::new();
        session.set(Some(StubProvider::user("a@b.c")));
        session.teardown();
        assert_eq!(session.current(), None);
    }
}
