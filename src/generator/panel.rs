//! # 面板公共状态
//!
//! 两个面板共享的部分：原始输入、当前类型、高级选项开关、绘制表面、提示槽。

use std::time::Instant;

use serde::Serialize;

use crate::barcode::BarcodeConstraints;
use crate::export::{ExportRequest, ExportTarget};
use crate::notification::{Notification, Notifier};
use crate::payload::{format_payload, render_value, CodeRequest, CodeType};
use crate::render::{SurfaceSlot, SymbolRenderer};

/// 面板的瞬态阶段。
///
/// ```text
/// Idle ──输入非空──▶ Configuring ──导出反馈──▶ Notifying
///   ▲                   │  ▲                      │
///   └────输入清空────────┘  └───────3 秒到期───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPhase {
    Idle,
    Configuring,
    Notifying,
}

/// 选择器上的一个选项，`id` 即回传给命令的值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorChoice {
    pub id: &'static str,
    pub label: &'static str,
    pub detail: Option<&'static str>,
}

/// 序列化给前端的面板视图。
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot<O: Serialize> {
    pub raw_value: String,
    pub code_type: CodeType,
    pub payload: String,
    pub input_label: &'static str,
    pub input_placeholder: &'static str,
    pub options: O,
    /// 仅条码面板有约束描述。
    pub constraints: Option<BarcodeConstraints>,
    /// 类型选择器。
    pub type_choices: Vec<SelectorChoice>,
    /// 纠错级别选择器（仅二维码面板）。
    pub level_choices: Vec<SelectorChoice>,
    pub advanced_open: bool,
    pub phase: PanelPhase,
    pub notification: Option<Notification>,
    /// 最近一次渲染失败的原因，作为非阻塞的行内提示。
    pub render_error: Option<String>,
    pub preview: Option<String>,
    pub render_count: u64,
}

#[derive(Debug)]
pub(crate) struct PanelCore {
    request: CodeRequest,
    advanced_open: bool,
    surface: SurfaceSlot,
    notifier: Notifier,
    target: ExportTarget,
}

impl PanelCore {
    pub(crate) fn new(code_type: CodeType, target: ExportTarget) -> Self {
        Self {
            request: CodeRequest::new(String::new(), code_type),
            advanced_open: false,
            surface: SurfaceSlot::new(),
            notifier: Notifier::new(),
            target,
        }
    }

    pub(crate) fn raw_value(&self) -> &str {
        &self.request.raw_value
    }

    pub(crate) fn code_type(&self) -> CodeType {
        self.request.code_type
    }

    pub(crate) fn set_raw_value(&mut self, raw: String) {
        self.request = CodeRequest::new(raw, self.request.code_type);
    }

    pub(crate) fn set_code_type(&mut self, code_type: CodeType) {
        self.request = CodeRequest::new(self.request.raw_value.clone(), code_type);
    }

    pub(crate) fn payload(&self) -> String {
        self.request.payload()
    }

    /// 格式化 → 回退占位 → 渲染，写入表面。
    pub(crate) fn render<R: SymbolRenderer>(&mut self, renderer: &R, options: &R::Options) {
        let payload = format_payload(&self.request.raw_value, self.request.code_type);
        let value = render_value(&payload, self.request.code_type);
        // 失败已在表面内记录，不中断交互
        let _ = self.surface.render_with(renderer, value, options);
    }

    pub(crate) fn toggle_advanced(&mut self) -> bool {
        self.advanced_open = !self.advanced_open;
        self.advanced_open
    }

    pub(crate) fn notify(&mut self, notification: Notification, now: Instant) -> u64 {
        self.notifier.raise(notification, now)
    }

    pub(crate) fn expire_notification(&mut self, generation: u64) -> bool {
        self.notifier.expire(generation)
    }

    pub(crate) fn dismiss_notification(&mut self) -> bool {
        self.notifier.dismiss()
    }

    pub(crate) fn active_notification(&self, now: Instant) -> Option<&Notification> {
        self.notifier.active(now)
    }

    pub(crate) fn phase(&self, now: Instant) -> PanelPhase {
        if self.notifier.active(now).is_some() {
            PanelPhase::Notifying
        } else if self.request.raw_value.is_empty() {
            PanelPhase::Idle
        } else {
            PanelPhase::Configuring
        }
    }

    pub(crate) fn surface(&self) -> &SurfaceSlot {
        &self.surface
    }

    pub(crate) fn export_request(&self) -> ExportRequest {
        ExportRequest {
            target: self.target,
            payload: self.payload(),
            surface: self.surface.surface().cloned(),
        }
    }

    pub(crate) fn snapshot<O: Serialize>(
        &self,
        options: O,
        input_placeholder: &'static str,
        constraints: Option<BarcodeConstraints>,
        now: Instant,
    ) -> PanelSnapshot<O> {
        PanelSnapshot {
            raw_value: self.request.raw_value.clone(),
            code_type: self.request.code_type,
            payload: self.payload(),
            input_label: self.request.code_type.input_label(),
            input_placeholder,
            options,
            constraints,
            type_choices: Vec::new(),
            level_choices: Vec::new(),
            advanced_open: self.advanced_open,
            phase: self.phase(now),
            notification: self.active_notification(now).cloned(),
            render_error: self.surface.last_error().map(|e| e.to_string()),
            preview: self.surface.surface().map(|s| s.preview_data_uri()),
            render_count: self.surface.render_count(),
        }
    }
}
