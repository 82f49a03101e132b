//! # 剪贴板写入模块
//!
//! ## 设计思路
//!
//! 与操作系统剪贴板交互的逻辑独立出来，隔离平台不稳定因素。
//! 写入本身委托给 `ExportHost`，本模块只负责失败分类与有限重试。
//!
//! ## 实现思路
//!
//! - 失败分为 Busy / Transient / Fatal / Unsupported 四类，只有前两类会重试。
//! - 退避间隔 = 指数增长 + 随机抖动，并受单次上限与总预算双重约束。
//! - 调用方在阻塞线程中执行，避免阻塞 async 运行时。

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use super::source::ClipboardImage;
use super::{ExportConfig, ExportError, ExportHost};

/// 单次写入失败的分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardFailureKind {
    /// 剪贴板被其他进程占用。
    Busy,
    Transient,
    Fatal,
    /// 平台不支持图片剪贴板。
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct ClipboardWriteFailure {
    pub kind: ClipboardFailureKind,
    pub message: String,
}

impl ClipboardWriteFailure {
    pub fn busy(message: impl Into<String>) -> Self {
        Self {
            kind: ClipboardFailureKind::Busy,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: ClipboardFailureKind::Transient,
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            kind: ClipboardFailureKind::Fatal,
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self {
            kind: ClipboardFailureKind::Unsupported,
            message: message.into(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self.kind, ClipboardFailureKind::Busy | ClipboardFailureKind::Transient)
    }
}

static JITTER_STATE: AtomicU64 = AtomicU64::new(0);

fn seed_jitter_state() -> u64 {
    let time_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let state = time_seed ^ ((std::process::id() as u64) << 32) ^ 0x9E37_79B9_7F4A_7C15;
    if state == 0 { 0xA5A5_5A5A_0123_4567 } else { state }
}

/// xorshift64，无锁推进全局抖动状态。
fn next_jitter_u64() -> u64 {
    let mut current = JITTER_STATE.load(Ordering::Relaxed);

    loop {
        let mut next = if current == 0 { seed_jitter_state() } else { current };
        next ^= next << 13;
        next ^= next >> 7;
        next ^= next << 17;

        match JITTER_STATE.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => current = observed,
        }
    }
}

pub(crate) fn compute_backoff_delay_with_jitter(base_delay_ms: u64, attempt: u32, max_delay_ms: u64) -> u64 {
    let exp = base_delay_ms.saturating_mul(1_u64 << attempt.saturating_sub(1).min(8));
    let capped = exp.min(max_delay_ms.max(base_delay_ms));
    let jitter_bound = (capped / 3).max(1);
    let jitter = next_jitter_u64() % (jitter_bound + 1);
    capped.saturating_add(jitter)
}

fn would_exceed_retry_budget(elapsed_ms: u64, wait_ms: u64, budget_ms: u64) -> bool {
    elapsed_ms.saturating_add(wait_ms) > budget_ms
}

/// 写入剪贴板（含重试），在阻塞线程中调用。
pub(crate) fn write_image_with_retry(
    host: &dyn ExportHost,
    image: &ClipboardImage,
    config: &ExportConfig,
) -> Result<(), ExportError> {
    log::debug!("📋 准备复制到剪贴板 - {}x{}", image.width, image.height);

    let retry_count = config.clipboard_retries.max(1);
    let started = Instant::now();
    let mut last_failure: Option<ClipboardWriteFailure> = None;

    for attempt in 1..=retry_count {
        if attempt > 1 {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let wait_ms = compute_backoff_delay_with_jitter(
                config.clipboard_retry_delay_ms.max(1),
                attempt - 1,
                config.clipboard_retry_max_delay_ms,
            );

            if would_exceed_retry_budget(elapsed_ms, wait_ms, config.clipboard_retry_max_total_ms) {
                log::warn!(
                    "⏱️ 跳过第 {} 次重试：等待 {}ms 会超过预算 {}ms",
                    attempt,
                    wait_ms,
                    config.clipboard_retry_max_total_ms
                );
                break;
            }

            log::debug!("🔄 重试 {}/{}，等待 {}ms（指数退避+抖动）", attempt, retry_count, wait_ms);
            std::thread::sleep(Duration::from_millis(wait_ms));
        }

        match host.write_clipboard_image(image) {
            Ok(()) => {
                log::info!("✅ 复制成功 (尝试 {})", attempt);
                return Ok(());
            }
            Err(failure) => {
                let retryable = failure.is_retryable();
                log::warn!(
                    "❌ 尝试 {} 失败: {}（kind={:?}, retryable={}）",
                    attempt,
                    failure.message,
                    failure.kind,
                    retryable
                );
                last_failure = Some(failure);

                if !retryable {
                    log::warn!("🛑 非可重试错误，提前终止重试");
                    break;
                }
            }
        }
    }

    match last_failure {
        Some(f) if f.kind == ClipboardFailureKind::Unsupported => Err(ExportError::Unsupported),
        Some(f) if f.kind == ClipboardFailureKind::Busy => Err(ExportError::ClipboardBusy(f.message)),
        Some(f) => Err(ExportError::Clipboard(f.message)),
        None => Err(ExportError::Clipboard("未知错误".to_string())),
    }
}

/// 基于 `arboard` 的系统剪贴板写入。
pub(crate) fn write_with_arboard(image: &ClipboardImage) -> Result<(), ClipboardWriteFailure> {
    let mut clipboard = arboard::Clipboard::new().map_err(classify_arboard_error)?;

    let image_data = arboard::ImageData {
        width: image.width,
        height: image.height,
        bytes: Cow::Borrowed(&image.bytes),
    };

    clipboard.set_image(image_data).map_err(classify_arboard_error)
}

/// 探测当前平台是否可访问剪贴板。
pub(crate) fn arboard_available() -> bool {
    match arboard::Clipboard::new() {
        Ok(_) => true,
        Err(err) => {
            log::warn!("⚠️ 剪贴板不可用：{}", err);
            false
        }
    }
}

fn classify_arboard_error(err: arboard::Error) -> ClipboardWriteFailure {
    match err {
        arboard::Error::ClipboardNotSupported => ClipboardWriteFailure::unsupported(err.to_string()),
        arboard::Error::ClipboardOccupied => ClipboardWriteFailure::busy(err.to_string()),
        arboard::Error::ConversionFailure => ClipboardWriteFailure::fatal(err.to_string()),
        other => ClipboardWriteFailure::transient(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// 按脚本依次返回结果的宿主。
    struct ScriptedHost {
        outcomes: Mutex<Vec<Result<(), ClipboardWriteFailure>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedHost {
        fn new(mut outcomes: Vec<Result<(), ClipboardWriteFailure>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl ExportHost for ScriptedHost {
        fn save_file(&self, _file_name: &str, _bytes: &[u8]) -> Result<PathBuf, ExportError> {
            unreachable!()
        }

        fn supports_image_clipboard(&self) -> bool {
            true
        }

        fn write_clipboard_image(&self, _image: &ClipboardImage) -> Result<(), ClipboardWriteFailure> {
            *self.calls.lock().unwrap() += 1;
            self.outcomes.lock().unwrap().pop().unwrap_or(Ok(()))
        }

        fn print_document(&self, _title: &str, _html: &str) -> Result<(), ExportError> {
            unreachable!()
        }
    }

    fn image() -> ClipboardImage {
        ClipboardImage {
            width: 1,
            height: 1,
            bytes: vec![0, 0, 0, 255],
        }
    }

    fn fast_config() -> ExportConfig {
        ExportConfig {
            clipboard_retry_delay_ms: 1,
            clipboard_retry_max_delay_ms: 10,
            ..ExportConfig::default()
        }
    }

    #[test]
    fn busy_then_success_retries() {
        let host = ScriptedHost::new(vec![Err(ClipboardWriteFailure::busy("occupied")), Ok(())]);
        assert!(write_image_with_retry(&host, &image(), &fast_config()).is_ok());
        assert_eq!(host.calls(), 2);
    }

    #[test]
    fn unsupported_stops_immediately() {
        let host = ScriptedHost::new(vec![Err(ClipboardWriteFailure::unsupported("no image support"))]);
        assert_eq!(
            write_image_with_retry(&host, &image(), &fast_config()),
            Err(ExportError::Unsupported)
        );
        assert_eq!(host.calls(), 1);
    }

    #[test]
    fn persistent_busy_surfaces_busy_error() {
        let host = ScriptedHost::new(vec![
            Err(ClipboardWriteFailure::busy("a")),
            Err(ClipboardWriteFailure::busy("b")),
            Err(ClipboardWriteFailure::busy("c")),
        ]);
        assert!(matches!(
            write_image_with_retry(&host, &image(), &fast_config()),
            Err(ExportError::ClipboardBusy(_))
        ));
        assert_eq!(host.calls(), 3);
    }

    #[test]
    fn backoff_is_capped_with_bounded_jitter() {
        for attempt in 1..12 {
            let delay = compute_backoff_delay_with_jitter(100, attempt, 900);
            assert!(delay >= 100);
            assert!(delay <= 900 + 300);
        }
    }
}
