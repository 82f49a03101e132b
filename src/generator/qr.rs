use std::time::Instant;

use super::panel::{PanelCore, PanelSnapshot, SelectorChoice};
use super::Panel;
use crate::error::AppError;
use crate::export::ExportTarget;
use crate::options::{ErrorCorrectionLevel, QrOptionUpdate, QrOptions};
use crate::payload::CodeType;
use crate::render::QrRenderer;

/// 二维码面板。
#[derive(Debug)]
pub struct QrGenerator {
    core: PanelCore,
    options: QrOptions,
    renderer: QrRenderer,
}

impl QrGenerator {
    /// 以默认选项创建面板，并立即渲染一次占位内容。
    pub fn new() -> Self {
        let mut generator = Self {
            core: PanelCore::new(CodeType::Url, ExportTarget::QrCode),
            options: QrOptions::default(),
            renderer: QrRenderer,
        };
        generator.rerender();
        generator
    }

    fn rerender(&mut self) {
        self.core.render(&self.renderer, &self.options);
    }

    pub fn set_input(&mut self, raw: impl Into<String>) {
        self.core.set_raw_value(raw.into());
        self.rerender();
    }

    /// 切换内容类型，原始输入保持不变。
    pub fn set_code_type(&mut self, code_type: CodeType) -> Result<(), AppError> {
        if code_type.is_barcode() {
            return Err(AppError::InvalidInput(format!("二维码面板不支持类型：{}", code_type)));
        }
        self.core.set_code_type(code_type);
        self.rerender();
        Ok(())
    }

    /// 应用单字段更新；值未变化时不重渲染。
    pub fn update_option(&mut self, update: QrOptionUpdate) -> bool {
        let changed = self.options.apply(update);
        if changed {
            self.rerender();
        }
        changed
    }

    pub fn toggle_advanced(&mut self) -> bool {
        self.core.toggle_advanced()
    }

    pub fn options(&self) -> &QrOptions {
        &self.options
    }

    pub fn raw_value(&self) -> &str {
        self.core.raw_value()
    }

    pub fn code_type(&self) -> CodeType {
        self.core.code_type()
    }

    pub fn payload(&self) -> String {
        self.core.payload()
    }

    pub fn render_count(&self) -> u64 {
        self.core.surface().render_count()
    }

    pub fn snapshot(&self, now: Instant) -> PanelSnapshot<QrOptions> {
        let code_type = self.core.code_type();
        let mut snapshot = self
            .core
            .snapshot(self.options.clone(), code_type.input_placeholder(), None, now);

        snapshot.type_choices = CodeType::QR_TYPES
            .iter()
            .map(|t| SelectorChoice {
                id: t.as_str(),
                label: t.display_name(),
                detail: None,
            })
            .collect();
        snapshot.level_choices = ErrorCorrectionLevel::ALL
            .iter()
            .map(|level| SelectorChoice {
                id: level.as_str(),
                label: level.label(),
                detail: None,
            })
            .collect();
        snapshot
    }
}

impl Default for QrGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for QrGenerator {
    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::PanelPhase;

    #[test]
    fn starts_idle_with_placeholder_render() {
        let generator = QrGenerator::new();
        let snapshot = generator.snapshot(Instant::now());
        assert_eq!(snapshot.phase, PanelPhase::Idle);
        assert_eq!(snapshot.payload, "");
        assert_eq!(snapshot.render_count, 1);
        assert!(snapshot.preview.is_some());
        assert_eq!(snapshot.input_label, "Website URL");
    }

    #[test]
    fn each_mutation_renders_once() {
        let mut generator = QrGenerator::new();
        generator.set_input("example.com");
        assert_eq!(generator.render_count(), 2);
        assert!(generator.update_option(QrOptionUpdate::Level(ErrorCorrectionLevel::H)));
        assert_eq!(generator.render_count(), 3);
        assert!(!generator.update_option(QrOptionUpdate::Level(ErrorCorrectionLevel::H)));
        assert_eq!(generator.render_count(), 3);
        generator.set_code_type(CodeType::Text).expect("qr type");
        assert_eq!(generator.render_count(), 4);
    }

    #[test]
    fn type_switch_reformats_same_input() {
        let mut generator = QrGenerator::new();
        generator.set_input("example.com");
        assert_eq!(generator.payload(), "https://example.com");
        generator.set_code_type(CodeType::Email).expect("qr type");
        assert_eq!(generator.raw_value(), "example.com");
        assert_eq!(generator.payload(), "mailto:example.com");
        assert_eq!(generator.snapshot(Instant::now()).phase, PanelPhase::Configuring);
    }

    #[test]
    fn rejects_barcode_types() {
        let mut generator = QrGenerator::new();
        assert!(generator.set_code_type(CodeType::Ean13).is_err());
        assert_eq!(generator.code_type(), CodeType::Url);
    }

    #[test]
    fn advanced_toggle_is_orthogonal() {
        let mut generator = QrGenerator::new();
        assert!(generator.toggle_advanced());
        assert_eq!(generator.render_count(), 1);
        assert!(!generator.toggle_advanced());
    }

    #[test]
    fn snapshot_lists_type_and_level_choices() {
        let snapshot = QrGenerator::new().snapshot(Instant::now());
        let ids: Vec<_> = snapshot.type_choices.iter().map(|c| c.id).collect();
        assert_eq!(ids, ["url", "text", "email", "phone", "sms", "wifi", "location", "vcard"]);
        assert_eq!(snapshot.type_choices[5].label, "WiFi");

        let levels: Vec<_> = snapshot.level_choices.iter().map(|c| (c.id, c.label)).collect();
        assert_eq!(levels[0], ("L", "Low (7%)"));
        assert_eq!(levels[3], ("H", "High (30%)"));
    }
}
