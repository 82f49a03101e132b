// Property tests for payload formatting and barcode input constraints
use ecode_generator::barcode::BarcodeFormat;
use ecode_generator::payload::{format_payload, render_value, CodeType, BARCODE_PLACEHOLDER_VALUE, QR_PLACEHOLDER_VALUE};
use proptest::prelude::*;

fn any_code_type() -> impl Strategy<Value = CodeType> {
    prop::sample::select(
        CodeType::QR_TYPES
            .iter()
            .chain(CodeType::BARCODE_TYPES.iter())
            .copied()
            .collect::<Vec<_>>(),
    )
}

proptest! {
    #[test]
    fn empty_input_is_never_prefixed(code_type in any_code_type()) {
        prop_assert_eq!(format_payload("", code_type), "");
    }

    #[test]
    fn formatting_is_deterministic(raw in ".{0,40}", code_type in any_code_type()) {
        prop_assert_eq!(format_payload(&raw, code_type), format_payload(&raw, code_type));
    }

    #[test]
    fn prefixed_types_are_idempotent(raw in "[a-z0-9@.+]{1,30}") {
        for code_type in [CodeType::Url, CodeType::Email, CodeType::Phone, CodeType::Sms] {
            let once = format_payload(&raw, code_type);
            prop_assert_eq!(format_payload(&once, code_type), once.clone());
        }
    }

    #[test]
    fn url_without_scheme_gets_https(host in "[a-z]{1,12}\\.(com|org|io)") {
        prop_assert_eq!(format_payload(&host, CodeType::Url), format!("https://{}", host));
    }

    #[test]
    fn passthrough_types_keep_raw_input(raw in ".{1,40}") {
        for code_type in [CodeType::Text, CodeType::Location, CodeType::Vcard, CodeType::Code128] {
            prop_assert_eq!(format_payload(&raw, code_type), raw.clone());
        }
    }

    #[test]
    fn wifi_payload_embeds_ssid(ssid in "[A-Za-z0-9 _-]{1,20}") {
        let payload = format_payload(&ssid, CodeType::Wifi);
        prop_assert!(payload.starts_with("WIFI:S:"));
        prop_assert!(payload.ends_with(";T:WPA;P:;"));
        prop_assert!(payload.contains(&ssid));
    }

    #[test]
    fn ean13_accepts_only_twelve_digits(digits in "[0-9]{1,20}") {
        prop_assert_eq!(BarcodeFormat::Ean13.accepts(&digits), digits.len() == 12);
    }

    #[test]
    fn upc_accepts_only_eleven_digits(digits in "[0-9]{1,20}") {
        prop_assert_eq!(BarcodeFormat::Upc.accepts(&digits), digits.len() == 11);
    }

    #[test]
    fn code39_rejects_lowercase(value in "[a-z]{1,10}") {
        prop_assert!(!BarcodeFormat::Code39.accepts(&value));
    }
}

#[test]
fn empty_payload_falls_back_to_placeholder() {
    assert_eq!(render_value("", CodeType::Url), QR_PLACEHOLDER_VALUE);
    assert_eq!(render_value("", CodeType::Ean13), BARCODE_PLACEHOLDER_VALUE);
    assert_eq!(render_value("abc", CodeType::Text), "abc");
}
