//! 提示消息模块
//!
//! # 设计思路
//!
//! 每个面板同一时刻最多显示一条提示，固定显示 3 秒。
//! 新提示直接替换旧提示（不排队），用户也可以主动关闭。
//!
//! # 实现思路
//!
//! - `Notifier` 是纯状态：当前提示、截止时间、代次计数。
//!   `raise` 递增代次，`expire(gen)` 仅在代次仍匹配时清除，
//!   因此被替换掉的旧定时器到期也不会误删新提示。
//! - `NotificationTimer` 持有到期任务的句柄，被替换或析构时 abort，
//!   面板销毁后不会再有悬挂的定时回调。

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::export::{ExportError, ExportTarget};

/// 提示显示时长。
pub const DISPLAY_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn downloaded(target: ExportTarget) -> Self {
        Self::success(format!("{} downloaded successfully", target.noun()))
    }

    pub fn copied(target: ExportTarget) -> Self {
        Self::success(format!("{} copied to clipboard", target.noun()))
    }

    /// 导出失败时的提示文案。
    pub fn export_failed(target: ExportTarget, action: ExportAction, error: &ExportError) -> Self {
        match error {
            ExportError::EmptyPayload | ExportError::Unsupported | ExportError::NoSurface => {
                Self::error(error.to_string())
            }
            _ => Self::error(format!(
                "Failed to {} {}",
                action.verb(),
                lowercase_noun(target)
            )),
        }
    }
}

fn lowercase_noun(target: ExportTarget) -> &'static str {
    match target {
        ExportTarget::QrCode => "QR code",
        ExportTarget::Barcode => "barcode",
    }
}

/// 导出动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportAction {
    Download,
    Copy,
    Print,
}

impl ExportAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Copy => "copy",
            Self::Print => "print",
        }
    }
}

/// 单槽提示状态。
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<(Notification, Instant)>,
    generation: u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 显示新提示（替换旧提示），返回新代次。
    pub fn raise(&mut self, notification: Notification, now: Instant) -> u64 {
        self.generation += 1;
        log::debug!(
            "🔔 提示 #{} [{:?}] {}",
            self.generation,
            notification.kind,
            notification.message
        );
        self.current = Some((notification, now + DISPLAY_DURATION));
        self.generation
    }

    /// 到期清除；代次已变化说明提示已被替换，忽略。
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.current.is_none() {
            return false;
        }
        self.current = None;
        true
    }

    pub fn dismiss(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// 当前仍在显示期内的提示。
    pub fn active(&self, now: Instant) -> Option<&Notification> {
        match &self.current {
            Some((notification, deadline)) if now < *deadline => Some(notification),
            _ => None,
        }
    }
}

/// 到期任务句柄，替换或析构时 abort。
#[derive(Default)]
pub struct NotificationTimer {
    handle: Option<JoinHandle<()>>,
}

impl NotificationTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 安排新的到期任务，旧任务立即取消。
    ///
    /// 在异步上下文中（导出命令、测试）直接挂到当前运行时，
    /// 否则落到 Tauri 的全局运行时。
    pub fn schedule<F>(&mut self, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let runtime = Handle::try_current()
            .unwrap_or_else(|_| tauri::async_runtime::handle().inner().clone());
        self.handle = Some(runtime.spawn(async move {
            tokio::time::sleep(DISPLAY_DURATION).await;
            on_expire();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for NotificationTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn newer_notification_replaces_older() {
        let mut notifier = Notifier::new();
        let now = Instant::now();
        let first = notifier.raise(Notification::error("Please enter a value first"), now);
        let second = notifier.raise(Notification::success("QR code copied to clipboard"), now);

        assert_eq!(
            notifier.active(now).map(|n| n.message.as_str()),
            Some("QR code copied to clipboard")
        );
        assert!(!notifier.expire(first), "stale timer must not clear the newer message");
        assert!(notifier.active(now).is_some());
        assert!(notifier.expire(second));
        assert!(notifier.active(now).is_none());
    }

    #[test]
    fn notification_lapses_after_three_seconds() {
        let mut notifier = Notifier::new();
        let now = Instant::now();
        notifier.raise(Notification::success("ok"), now);
        assert!(notifier.active(now + Duration::from_millis(2_999)).is_some());
        assert!(notifier.active(now + DISPLAY_DURATION).is_none());
    }

    #[test]
    fn dismiss_clears_immediately() {
        let mut notifier = Notifier::new();
        notifier.raise(Notification::success("ok"), Instant::now());
        assert!(notifier.dismiss());
        assert!(!notifier.dismiss());
    }

    #[test]
    fn export_messages() {
        assert_eq!(
            Notification::downloaded(ExportTarget::QrCode).message,
            "QR code downloaded successfully"
        );
        assert_eq!(
            Notification::copied(ExportTarget::Barcode).message,
            "Barcode copied to clipboard"
        );
        assert_eq!(
            Notification::export_failed(
                ExportTarget::QrCode,
                ExportAction::Copy,
                &ExportError::Clipboard("x".into())
            )
            .message,
            "Failed to copy QR code"
        );
        assert_eq!(
            Notification::export_failed(ExportTarget::Barcode, ExportAction::Copy, &ExportError::Unsupported)
                .message,
            "Your system does not support copying images"
        );
    }

    fn counting_callback(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timer_fires_once_display_duration_elapses() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = NotificationTimer::new();
        timer.schedule(counting_callback(&fired));

        tokio::time::sleep(DISPLAY_DURATION - Duration::from_millis(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_cancels_the_earlier_timer() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut timer = NotificationTimer::new();

        timer.schedule(counting_callback(&first));
        tokio::time::sleep(Duration::from_secs(2)).await;
        timer.schedule(counting_callback(&second));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = NotificationTimer::new();
        timer.schedule(counting_callback(&fired));
        timer.cancel();

        tokio::time::sleep(DISPLAY_DURATION * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_aborts_the_pending_expiry() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = NotificationTimer::new();
        timer.schedule(counting_callback(&fired));
        drop(timer);

        tokio::time::sleep(DISPLAY_DURATION * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_callback_only_clears_its_own_generation() {
        let notifier = Arc::new(Mutex::new(Notifier::new()));
        let mut timer = NotificationTimer::new();

        let stale = notifier
            .lock()
            .unwrap()
            .raise(Notification::success("first"), Instant::now());
        let current = notifier
            .lock()
            .unwrap()
            .raise(Notification::success("second"), Instant::now());
        assert_ne!(stale, current);

        let shared = Arc::clone(&notifier);
        timer.schedule(move || {
            shared.lock().unwrap().expire(current);
        });

        tokio::time::sleep(DISPLAY_DURATION + Duration::from_millis(1)).await;
        assert!(!notifier.lock().unwrap().expire(stale));
        assert!(!notifier.lock().unwrap().dismiss());
    }
}
