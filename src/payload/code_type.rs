//! # 码制类型
//!
//! `CodeType` 同时覆盖二维码内容类型（url / wifi / vcard ...）与一维条码码制
//! （code128 / ean13 ...），前端以小写 id 传递。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 用户选择的码制 / 内容类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeType {
    Url,
    Text,
    Email,
    Phone,
    Sms,
    Wifi,
    Location,
    Vcard,
    Code128,
    Ean13,
    Upc,
    Code39,
}

impl CodeType {
    /// 二维码面板可选的内容类型（按界面顺序）。
    pub const QR_TYPES: [CodeType; 8] = [
        CodeType::Url,
        CodeType::Text,
        CodeType::Email,
        CodeType::Phone,
        CodeType::Sms,
        CodeType::Wifi,
        CodeType::Location,
        CodeType::Vcard,
    ];

    /// 条码面板可选的码制。
    pub const BARCODE_TYPES: [CodeType; 4] = [
        CodeType::Code128,
        CodeType::Ean13,
        CodeType::Upc,
        CodeType::Code39,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Sms => "sms",
            Self::Wifi => "wifi",
            Self::Location => "location",
            Self::Vcard => "vcard",
            Self::Code128 => "code128",
            Self::Ean13 => "ean13",
            Self::Upc => "upc",
            Self::Code39 => "code39",
        }
    }

    pub fn is_barcode(self) -> bool {
        matches!(self, Self::Code128 | Self::Ean13 | Self::Upc | Self::Code39)
    }

    /// 类型选择器上的展示名。
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Url => "Website URL",
            Self::Text => "Text",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Sms => "SMS",
            Self::Wifi => "WiFi",
            Self::Location => "Location",
            Self::Vcard => "Contact",
            Self::Code128 => "Code 128",
            Self::Ean13 => "EAN-13",
            Self::Upc => "UPC",
            Self::Code39 => "Code 39",
        }
    }

    /// 输入框标签。
    pub fn input_label(self) -> &'static str {
        match self {
            Self::Url => "Website URL",
            Self::Text => "Text",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::Sms => "SMS Number",
            Self::Location => "Location (lat,long)",
            Self::Wifi => "WiFi Network Name",
            Self::Vcard => "Contact Name",
            Self::Code128 | Self::Ean13 | Self::Upc | Self::Code39 => "Barcode Value",
        }
    }

    /// 二维码类型的输入占位提示；条码类型的提示由 [`crate::barcode::BarcodeFormat`] 提供。
    pub fn input_placeholder(self) -> &'static str {
        match self {
            Self::Url => "Enter website URL (e.g., example.com)",
            Self::Text => "Enter your text message",
            Self::Email => "Enter email address",
            Self::Phone => "Enter phone number",
            Self::Sms => "Enter phone number for SMS",
            Self::Location => "Enter latitude,longitude",
            Self::Wifi => "Enter WiFi network name (SSID)",
            Self::Vcard => "Enter contact name",
            _ => "Enter value",
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "url" => Ok(Self::Url),
            "text" => Ok(Self::Text),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "sms" => Ok(Self::Sms),
            "wifi" => Ok(Self::Wifi),
            "location" => Ok(Self::Location),
            "vcard" => Ok(Self::Vcard),
            "code128" => Ok(Self::Code128),
            "ean13" => Ok(Self::Ean13),
            "upc" => Ok(Self::Upc),
            "code39" => Ok(Self::Code39),
            other => Err(AppError::InvalidInput(format!("未知码制类型：{}", other))),
        }
    }
}
