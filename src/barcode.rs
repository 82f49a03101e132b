//! 条码约束校验模块
//!
//! # 设计思路
//!
//! 每种一维码制都有自己的字符集与长度规则。本模块只负责“描述”这些规则：
//! 输入占位提示、输入接受模式、行内提示、是否由渲染库补校验位。
//! 它**不会**在渲染前拦截非法输入，非法值照常交给渲染库，由渲染层捕获失败。
//!
//! # 实现思路
//!
//! - 接受模式与前端 `<input pattern>` 语义一致：整串匹配。
//! - 通过 `once_cell::sync::Lazy` 在首次调用时编译正则，后续零成本复用。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::payload::CodeType;

static EAN13_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{12})$").expect("EAN13 pattern is valid"));
static UPC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{11})$").expect("UPC pattern is valid"));
static CODE39_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z0-9\-\.\/\+\$\% ]+)$").expect("CODE39 pattern is valid"));

/// 一维条码码制。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BarcodeFormat {
    #[default]
    Code128,
    Ean13,
    Upc,
    Code39,
}

/// 校验位策略：输入需要多少位数字，以及第几位由渲染库计算。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckDigitPolicy {
    pub input_digits: usize,
    pub computed_position: usize,
}

impl BarcodeFormat {
    /// 切换类型时重置到对应码制；非条码类型回落到 CODE128。
    pub fn for_code_type(code_type: CodeType) -> Self {
        match code_type {
            CodeType::Code128 => Self::Code128,
            CodeType::Ean13 => Self::Ean13,
            CodeType::Upc => Self::Upc,
            CodeType::Code39 => Self::Code39,
            _ => Self::Code128,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code128 => "CODE128",
            Self::Ean13 => "EAN13",
            Self::Upc => "UPC",
            Self::Code39 => "CODE39",
        }
    }

    /// 类型选择器上的简短说明。
    pub fn description(self) -> &'static str {
        match self {
            Self::Code128 => "Alphanumeric, variable length",
            Self::Ean13 => "12 digits + check digit",
            Self::Upc => "11 digits + check digit",
            Self::Code39 => "Alphanumeric, special chars",
        }
    }

    /// 输入框占位提示。
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Code128 => "Enter any text or numbers",
            Self::Ean13 => "Enter exactly 12 digits (13th is calculated)",
            Self::Upc => "Enter exactly 11 digits (12th is calculated)",
            Self::Code39 => "Enter alphanumeric text (A-Z, 0-9, -, ., $, /, +, %, space)",
        }
    }

    /// 前端 `<input pattern>` 使用的模式串；CODE128 无约束。
    pub fn input_pattern(self) -> Option<&'static str> {
        match self {
            Self::Code128 => None,
            Self::Ean13 => Some("[0-9]{12}"),
            Self::Upc => Some("[0-9]{11}"),
            Self::Code39 => Some(r"[A-Z0-9\-\.\/\+\$\% ]+"),
        }
    }

    /// 输入框下方的行内提示。
    pub fn inline_hint(self) -> Option<&'static str> {
        match self {
            Self::Ean13 => Some("Must be exactly 12 digits. The 13th digit is automatically calculated."),
            Self::Upc => Some("Must be exactly 11 digits. The 12th digit is automatically calculated."),
            Self::Code128 | Self::Code39 => None,
        }
    }

    pub fn check_digit(self) -> Option<CheckDigitPolicy> {
        match self {
            Self::Ean13 => Some(CheckDigitPolicy {
                input_digits: 12,
                computed_position: 13,
            }),
            Self::Upc => Some(CheckDigitPolicy {
                input_digits: 11,
                computed_position: 12,
            }),
            Self::Code128 | Self::Code39 => None,
        }
    }

    /// 值是否满足输入接受模式（整串匹配）。
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Code128 => true,
            Self::Ean13 => EAN13_PATTERN.is_match(value),
            Self::Upc => UPC_PATTERN.is_match(value),
            Self::Code39 => CODE39_PATTERN.is_match(value),
        }
    }

    /// 条码下方显示的完整文本：EAN-13 / UPC 补上计算出的校验位，CODE39 转大写。
    pub fn human_readable(self, value: &str) -> String {
        match self.check_digit() {
            Some(policy) if value.len() == policy.input_digits && self.accepts(value) => {
                let check = mod10_check_digit(value);
                format!("{}{}", value, check)
            }
            _ if self == Self::Code39 => value.to_uppercase(),
            _ => value.to_string(),
        }
    }

    /// 汇总给前端的约束描述。
    pub fn constraints(self, value: &str) -> BarcodeConstraints {
        BarcodeConstraints {
            format: self,
            placeholder: self.placeholder(),
            pattern: self.input_pattern(),
            hint: self.inline_hint(),
            accepted: value.is_empty() || self.accepts(value),
            check_digit: self.check_digit(),
        }
    }
}

/// GS1 模 10 校验位（自右向左权重 3、1 交替），调用方保证全为数字。
fn mod10_check_digit(digits: &str) -> u32 {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    (10 - sum % 10) % 10
}

/// 某码制对当前输入的约束视图。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarcodeConstraints {
    pub format: BarcodeFormat,
    pub placeholder: &'static str,
    pub pattern: Option<&'static str>,
    pub hint: Option<&'static str>,
    /// 空值视为“尚未输入”，不标红。
    pub accepted: bool,
    pub check_digit: Option<CheckDigitPolicy>,
}
