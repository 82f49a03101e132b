//! 渲染选项模块
//!
//! # 设计思路
//!
//! 两个面板各自持有一份可调视觉参数（尺寸、颜色、边距、纠错级别、线宽 ...）。
//! 面板创建时初始化为默认值，由用户逐字段修改，从不持久化。
//!
//! # 实现思路
//!
//! - 每个字段一个更新变体（`QrOptionUpdate` / `BarcodeOptionUpdate`），
//!   前端通过 `{"field": ..., "value": ...}` 传入，后端逐字段应用。
//! - `apply` 返回是否真正发生变化，调用方据此触发一次重渲染。
//! - 字段之间不做交叉校验（例如字号可以大于条高）。
//! - 颜色在边界处解析为 `Rgb`，非法颜色串直接拒绝。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::barcode::BarcodeFormat;
use crate::error::AppError;

/// 8 位 RGB 颜色，序列化为 `#RRGGBB`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.0, self.1, self.2, 0xFF]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = AppError;

    /// 支持 `#RRGGBB` 与 `#RGB`，`#` 可省略，大小写不敏感。
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || AppError::InvalidInput(format!("无效颜色值：{}", value));

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Rgb(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 二维码纠错级别。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrectionLevel {
    pub const ALL: [ErrorCorrectionLevel; 4] = [Self::L, Self::M, Self::Q, Self::H];

    /// 与序列化名一致。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }

    /// 选择器上的说明文案。
    pub fn label(self) -> &'static str {
        match self {
            Self::L => "Low (7%)",
            Self::M => "Medium (15%)",
            Self::Q => "Quartile (25%)",
            Self::H => "High (30%)",
        }
    }
}

/// 二维码视觉参数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrOptions {
    /// 输出边长（像素）。
    pub size: u32,
    pub level: ErrorCorrectionLevel,
    pub fg_color: Rgb,
    pub bg_color: Rgb,
    /// 是否包含 4 模块宽的静区。
    pub include_margin: bool,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: 200,
            level: ErrorCorrectionLevel::M,
            fg_color: Rgb::BLACK,
            bg_color: Rgb::WHITE,
            include_margin: true,
        }
    }
}

/// 二维码单字段更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum QrOptionUpdate {
    Size(u32),
    Level(ErrorCorrectionLevel),
    FgColor(Rgb),
    BgColor(Rgb),
    IncludeMargin(bool),
}

impl QrOptions {
    /// 应用单字段更新，返回值是否发生变化。
    pub fn apply(&mut self, update: QrOptionUpdate) -> bool {
        match update {
            QrOptionUpdate::Size(v) => replace_if_changed(&mut self.size, v),
            QrOptionUpdate::Level(v) => replace_if_changed(&mut self.level, v),
            QrOptionUpdate::FgColor(v) => replace_if_changed(&mut self.fg_color, v),
            QrOptionUpdate::BgColor(v) => replace_if_changed(&mut self.bg_color, v),
            QrOptionUpdate::IncludeMargin(v) => replace_if_changed(&mut self.include_margin, v),
        }
    }
}

/// 条码视觉参数（字段语义与 JsBarcode 一致）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeOptions {
    pub format: BarcodeFormat,
    /// 单个模块（最窄条）的像素宽度。
    pub width: u32,
    /// 条高（像素）。
    pub height: u32,
    pub margin: u32,
    pub font_size: u32,
    pub text_margin: u32,
    pub background: Rgb,
    pub line_color: Rgb,
    pub display_value: bool,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            format: BarcodeFormat::Code128,
            width: 2,
            height: 100,
            margin: 10,
            font_size: 20,
            text_margin: 2,
            background: Rgb::WHITE,
            line_color: Rgb::BLACK,
            display_value: true,
        }
    }
}

/// 条码单字段更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum BarcodeOptionUpdate {
    Format(BarcodeFormat),
    Width(u32),
    Height(u32),
    Margin(u32),
    FontSize(u32),
    TextMargin(u32),
    Background(Rgb),
    LineColor(Rgb),
    DisplayValue(bool),
}

impl BarcodeOptions {
    /// 应用单字段更新，返回值是否发生变化。
    pub fn apply(&mut self, update: BarcodeOptionUpdate) -> bool {
        match update {
            BarcodeOptionUpdate::Format(v) => replace_if_changed(&mut self.format, v),
            BarcodeOptionUpdate::Width(v) => replace_if_changed(&mut self.width, v),
            BarcodeOptionUpdate::Height(v) => replace_if_changed(&mut self.height, v),
            BarcodeOptionUpdate::Margin(v) => replace_if_changed(&mut self.margin, v),
            BarcodeOptionUpdate::FontSize(v) => replace_if_changed(&mut self.font_size, v),
            BarcodeOptionUpdate::TextMargin(v) => replace_if_changed(&mut self.text_margin, v),
            BarcodeOptionUpdate::Background(v) => replace_if_changed(&mut self.background, v),
            BarcodeOptionUpdate::LineColor(v) => replace_if_changed(&mut self.line_color, v),
            BarcodeOptionUpdate::DisplayValue(v) => replace_if_changed(&mut self.display_value, v),
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
