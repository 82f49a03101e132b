//! # 载荷格式化
//!
//! 将用户原始输入按类型规则转换为交给渲染库的载荷字符串。
//! 纯函数，无外部状态：同样的 `(raw, code_type)` 永远得到同样的结果。

use super::CodeType;

/// 二维码在无输入时渲染的占位内容。
pub const QR_PLACEHOLDER_VALUE: &str = "https://example.com";
/// 条码在无输入时渲染的占位内容。
pub const BARCODE_PLACEHOLDER_VALUE: &str = "Sample";

/// 一次渲染周期的请求。每次编辑输入或切换类型都会重新构造。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRequest {
    pub raw_value: String,
    pub code_type: CodeType,
}

impl CodeRequest {
    pub fn new(raw_value: impl Into<String>, code_type: CodeType) -> Self {
        Self {
            raw_value: raw_value.into(),
            code_type,
        }
    }

    pub fn payload(&self) -> String {
        format_payload(&self.raw_value, self.code_type)
    }
}

/// 按类型格式化原始输入。
///
/// 空输入永远返回空串（不加前缀），由渲染层回退到占位内容。
///
/// # 示例
/// ```rust
/// use ecode_generator::payload::{format_payload, CodeType};
///
/// assert_eq!(format_payload("example.com", CodeType::Url), "https://example.com");
/// assert_eq!(format_payload("HomeNet", CodeType::Wifi), "WIFI:S:HomeNet;T:WPA;P:;");
/// assert_eq!(format_payload("", CodeType::Email), "");
/// ```
pub fn format_payload(raw: &str, code_type: CodeType) -> String {
    if raw.is_empty() {
        return String::new();
    }

    match code_type {
        CodeType::Url => {
            if raw.starts_with("http://") || raw.starts_with("https://") {
                raw.to_string()
            } else {
                format!("https://{}", raw)
            }
        }
        CodeType::Email => ensure_prefix(raw, "mailto:"),
        CodeType::Phone => ensure_prefix(raw, "tel:"),
        CodeType::Sms => ensure_prefix(raw, "sms:"),
        // 安全类型固定 WPA、密码为空，见 DESIGN.md 的开放问题记录
        CodeType::Wifi => format!("WIFI:S:{};T:WPA;P:;", raw),
        CodeType::Text
        | CodeType::Location
        | CodeType::Vcard
        | CodeType::Code128
        | CodeType::Ean13
        | CodeType::Upc
        | CodeType::Code39 => raw.to_string(),
    }
}

/// 真正交给渲染库的值：载荷为空时使用占位内容。
pub fn render_value(payload: &str, code_type: CodeType) -> &str {
    if !payload.is_empty() {
        payload
    } else if code_type.is_barcode() {
        BARCODE_PLACEHOLDER_VALUE
    } else {
        QR_PLACEHOLDER_VALUE
    }
}

fn ensure_prefix(raw: &str, prefix: &str) -> String {
    if raw.starts_with(prefix) {
        raw.to_string()
    } else {
        format!("{}{}", prefix, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_gets_https_prefix() {
        assert_eq!(format_payload("example.com", CodeType::Url), "https://example.com");
    }

    #[test]
    fn url_with_scheme_is_unchanged() {
        assert_eq!(format_payload("http://a.b", CodeType::Url), "http://a.b");
        assert_eq!(format_payload("https://a.b/c?d", CodeType::Url), "https://a.b/c?d");
    }

    #[test]
    fn url_scheme_check_is_case_sensitive() {
        assert_eq!(format_payload("HTTPS://a.b", CodeType::Url), "https://HTTPS://a.b");
    }

    #[test]
    fn contact_schemes_are_prefixed_once() {
        assert_eq!(format_payload("a@b.c", CodeType::Email), "mailto:a@b.c");
        assert_eq!(format_payload("mailto:a@b.c", CodeType::Email), "mailto:a@b.c");
        assert_eq!(format_payload("+123", CodeType::Phone), "tel:+123");
        assert_eq!(format_payload("tel:+123", CodeType::Phone), "tel:+123");
        assert_eq!(format_payload("555", CodeType::Sms), "sms:555");
        assert_eq!(format_payload("sms:555", CodeType::Sms), "sms:555");
    }

    #[test]
    fn wifi_record_is_composed() {
        assert_eq!(format_payload("HomeNet", CodeType::Wifi), "WIFI:S:HomeNet;T:WPA;P:;");
    }

    #[test]
    fn passthrough_types_keep_value() {
        for code_type in [CodeType::Text, CodeType::Location, CodeType::Vcard, CodeType::Ean13] {
            assert_eq!(format_payload(" 52.1,4.3 ", code_type), " 52.1,4.3 ");
        }
    }

    #[test]
    fn empty_input_yields_empty_payload() {
        for code_type in CodeType::QR_TYPES.iter().chain(CodeType::BARCODE_TYPES.iter()) {
            assert_eq!(format_payload("", *code_type), "");
        }
    }

    #[test]
    fn render_value_falls_back_to_placeholder() {
        assert_eq!(render_value("", CodeType::Url), QR_PLACEHOLDER_VALUE);
        assert_eq!(render_value("", CodeType::Code39), BARCODE_PLACEHOLDER_VALUE);
        assert_eq!(render_value("tel:1", CodeType::Phone), "tel:1");
    }

    #[test]
    fn request_payload_uses_formatter() {
        let request = CodeRequest::new("example.com", CodeType::Url);
        assert_eq!(request.payload(), "https://example.com");
    }
}
