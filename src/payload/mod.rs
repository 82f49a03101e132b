//! # 载荷模块（payload）
//!
//! 用户输入 → 码制正确的载荷字符串。
//!
//! - `code_type`：码制 / 内容类型枚举及界面文案
//! - `formatter`：按类型拼接前缀、组装 WIFI 记录、占位回退

mod code_type;
mod formatter;

pub use code_type::CodeType;
pub use formatter::{
    format_payload, render_value, CodeRequest, BARCODE_PLACEHOLDER_VALUE, QR_PLACEHOLDER_VALUE,
};
