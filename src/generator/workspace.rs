//! # 面板工作区（可注入状态）
//!
//! ## 设计思路
//!
//! 两个面板各自放在一把 `Mutex` 里，所有渲染与状态修改都在锁内同步完成。
//! 导出动作是异步的：先在锁内截取 `ExportRequest` 快照，释放锁后再执行，
//! 完成后重新加锁写入提示。任何锁都不会跨越 `.await` 持有。
//!
//! ## 实现思路
//!
//! - 导出失败不向上抛错，而是转成面板提示（与页面上弹出错误提示一致）。
//! - 每条提示返回代次，命令层据此安排 3 秒到期任务；
//!   到期任务句柄存放在 `NotificationTimer` 中，新提示到来时旧任务被取消。

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{BarcodeGenerator, Panel, QrGenerator};
use crate::error::AppError;
use crate::export::{DownloadOutcome, ExportCommandError, ExportError, ExportHandler, ExportHost};
use crate::notification::{ExportAction, Notification, NotificationTimer};

/// 面板标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Qr,
    Barcode,
}

/// 一次导出动作的结果。
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub panel: PanelKind,
    pub action: ExportAction,
    pub notification: Option<Notification>,
    /// 提示代次，用于安排到期任务。
    #[serde(skip)]
    pub generation: Option<u64>,
    pub download: Option<DownloadOutcome>,
    pub error: Option<ExportCommandError>,
}

/// 面板工作区。
pub struct GeneratorState {
    qr: Mutex<QrGenerator>,
    barcode: Mutex<BarcodeGenerator>,
    qr_timer: Mutex<NotificationTimer>,
    barcode_timer: Mutex<NotificationTimer>,
}

fn poisoned(what: &str) -> AppError {
    AppError::State(format!("{} 锁已中毒", what))
}

impl GeneratorState {
    pub fn new() -> Self {
        log::info!("🧩 初始化生成器面板");
        Self {
            qr: Mutex::new(QrGenerator::new()),
            barcode: Mutex::new(BarcodeGenerator::new()),
            qr_timer: Mutex::new(NotificationTimer::new()),
            barcode_timer: Mutex::new(NotificationTimer::new()),
        }
    }

    pub fn qr(&self) -> Result<MutexGuard<'_, QrGenerator>, AppError> {
        self.qr.lock().map_err(|_| poisoned("二维码面板"))
    }

    pub fn barcode(&self) -> Result<MutexGuard<'_, BarcodeGenerator>, AppError> {
        self.barcode.lock().map_err(|_| poisoned("条码面板"))
    }

    /// 对指定面板的公共部分执行操作。
    fn with_panel<T>(&self, panel: PanelKind, f: impl FnOnce(&mut dyn Panel) -> T) -> Result<T, AppError> {
        match panel {
            PanelKind::Qr => Ok(f(&mut *self.qr()?)),
            PanelKind::Barcode => Ok(f(&mut *self.barcode()?)),
        }
    }

    fn timer(&self, panel: PanelKind) -> Result<MutexGuard<'_, NotificationTimer>, AppError> {
        let timer = match panel {
            PanelKind::Qr => &self.qr_timer,
            PanelKind::Barcode => &self.barcode_timer,
        };
        timer.lock().map_err(|_| poisoned("提示定时器"))
    }

    /// 显示提示并返回代次。
    pub fn notify(&self, panel: PanelKind, notification: Notification) -> Result<u64, AppError> {
        self.with_panel(panel, |p| p.core_mut().notify(notification, Instant::now()))
    }

    /// 到期清除；提示已被替换时返回 `false`。
    pub fn expire(&self, panel: PanelKind, generation: u64) -> Result<bool, AppError> {
        self.with_panel(panel, |p| p.core_mut().expire_notification(generation))
    }

    pub fn dismiss(&self, panel: PanelKind) -> Result<bool, AppError> {
        let dismissed = self.with_panel(panel, |p| p.core_mut().dismiss_notification())?;
        self.timer(panel)?.cancel();
        Ok(dismissed)
    }

    pub fn active_notification(&self, panel: PanelKind) -> Result<Option<Notification>, AppError> {
        self.with_panel(panel, |p| p.core().active_notification(Instant::now()).cloned())
    }

    /// 为指定代次安排到期任务（替换旧任务）。
    pub fn schedule_expiry<F>(&self, panel: PanelKind, on_expire: F) -> Result<(), AppError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.timer(panel)?.schedule(on_expire);
        Ok(())
    }

    /// 执行一次导出动作，结果转为面板提示。
    pub async fn export(
        &self,
        panel: PanelKind,
        action: ExportAction,
        handler: &ExportHandler,
        host: Arc<dyn ExportHost>,
    ) -> Result<ExportReport, AppError> {
        let request = self.with_panel(panel, |p| p.core().export_request())?;
        let target = request.target;

        log::info!("📤 导出开始 - {:?} {:?}", panel, action);

        let outcome: Result<Option<DownloadOutcome>, ExportError> = match action {
            ExportAction::Download => handler.download(host, request).await.map(Some),
            ExportAction::Copy => handler.copy(host, request).await.map(|()| None),
            ExportAction::Print => handler.print(host.as_ref(), &request).map(|()| None),
        };

        let (notification, download, error) = match outcome {
            Ok(download) => {
                let notification = match action {
                    ExportAction::Download => Some(Notification::downloaded(target)),
                    ExportAction::Copy => Some(Notification::copied(target)),
                    ExportAction::Print => None,
                };
                (notification, download, None)
            }
            Err(ExportError::Cancelled) => {
                log::info!("↩️ 用户取消了保存");
                (None, None, Some(ExportCommandError::from(&ExportError::Cancelled)))
            }
            Err(err) => {
                log::warn!("❌ 导出失败 - {:?} {:?}: {}", panel, action, err);
                (
                    Some(Notification::export_failed(target, action, &err)),
                    None,
                    Some(ExportCommandError::from(&err)),
                )
            }
        };

        let generation = match &notification {
            Some(n) => Some(self.notify(panel, n.clone())?),
            None => None,
        };

        Ok(ExportReport {
            panel,
            action,
            notification,
            generation,
            download,
            error,
        })
    }
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self::new()
    }
}
