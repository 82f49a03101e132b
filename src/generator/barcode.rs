use std::time::Instant;

use super::panel::{PanelCore, PanelSnapshot, SelectorChoice};
use super::Panel;
use crate::barcode::{BarcodeConstraints, BarcodeFormat};
use crate::error::AppError;
use crate::export::ExportTarget;
use crate::options::{BarcodeOptionUpdate, BarcodeOptions};
use crate::payload::CodeType;
use crate::render::BarcodeRenderer;

/// 一维条码面板。
#[derive(Debug)]
pub struct BarcodeGenerator {
    core: PanelCore,
    options: BarcodeOptions,
    renderer: BarcodeRenderer,
}

impl BarcodeGenerator {
    pub fn new() -> Self {
        let mut generator = Self {
            core: PanelCore::new(CodeType::Code128, ExportTarget::Barcode),
            options: BarcodeOptions::default(),
            renderer: BarcodeRenderer,
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

    /// 切换码制：码制选项重置为对应格式，原始输入不动。
    pub fn set_code_type(&mut self, code_type: CodeType) -> Result<(), AppError> {
        if !code_type.is_barcode() {
            return Err(AppError::InvalidInput(format!("条码面板不支持类型：{}", code_type)));
        }
        self.core.set_code_type(code_type);
        self.options.format = BarcodeFormat::for_code_type(code_type);
        self.rerender();
        Ok(())
    }

    pub fn update_option(&mut self, update: BarcodeOptionUpdate) -> bool {
        let changed = self.options.apply(update);
        if changed {
            self.rerender();
        }
        changed
    }

    pub fn toggle_advanced(&mut self) -> bool {
        self.core.toggle_advanced()
    }

    pub fn options(&self) -> &BarcodeOptions {
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

    pub fn constraints(&self) -> BarcodeConstraints {
        self.options.format.constraints(self.core.raw_value())
    }

    pub fn snapshot(&self, now: Instant) -> PanelSnapshot<BarcodeOptions> {
        let format = self.options.format;
        let mut snapshot = self
            .core
            .snapshot(self.options.clone(), format.placeholder(), Some(self.constraints()), now);

        snapshot.type_choices = CodeType::BARCODE_TYPES
            .iter()
            .map(|t| SelectorChoice {
                id: t.as_str(),
                label: t.display_name(),
                detail: Some(BarcodeFormat::for_code_type(*t).description()),
            })
            .collect();
        snapshot
    }
}

impl Default for BarcodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for BarcodeGenerator {
    fn core(&self) -> &PanelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PanelCore {
        &mut self.core
    }
}
