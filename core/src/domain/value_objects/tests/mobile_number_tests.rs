use crate::domain::value_objects::{AllowedTypes, HolderContext, MobileNumber, NumberType};

fn sample() -> MobileNumber {
    MobileNumber::new(
        "+447400123456".to_string(),
        "GB".to_string(),
        "7400123456".to_string(),
        44,
        NumberType::Mobile,
    )
}

#[test]
fn test_accessors_and_display() {
    let number = sample();
    assert_eq!(number.canonical(), "+447400123456");
    assert_eq!(number.region(), "GB");
    assert_eq!(number.national_number(), "7400123456");
    assert_eq!(number.country_code(), 44);
    assert_eq!(number.number_type(), NumberType::Mobile);
    assert_eq!(number.to_string(), "+447400123456");
}

#[test]
fn test_tel_uri() {
    assert_eq!(sample().tel_uri(), "tel:+447400123456");
}

#[test]
fn test_same_line() {
    let number = sample();
    assert!(number.same_line("+447400123456"));
    assert!(!number.same_line("+447400123457"));
}

#[test]
fn test_allowed_types() {
    let mobile = AllowedTypes::mobile_only();
    assert!(mobile.contains(NumberType::Mobile));
    assert!(!mobile.contains(NumberType::FixedLineOrMobile));

    let dual = AllowedTypes::dual_use();
    assert!(dual.contains(NumberType::FixedLineOrMobile));
    assert!(!dual.contains(NumberType::Other));
    assert_eq!(dual.iter().count(), 2);
}

#[test]
fn test_default_allowed_types_accept_dual_use_lines() {
    assert_eq!(AllowedTypes::default(), AllowedTypes::dual_use());
}

#[test]
fn test_serde_round_trip_keeps_number() {
    let json = serde_json::to_string(&sample()).unwrap();
    let back: MobileNumber = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn test_deserialize_rejects_garbage_canonical() {
    let json = r#"{"canonical":"not a number","region":"GB","national_number":"7400123456","country_code":44,"number_type":"mobile"}"#;
    assert!(serde_json::from_str::<MobileNumber>(json).is_err());
}

#[test]
fn test_deserialize_rejects_inconsistent_parts() {
    // Canonical is E.164 shaped but belongs to another country code
    let json = r#"{"canonical":"+12025551234","region":"GB","national_number":"7400123456","country_code":44,"number_type":"mobile"}"#;
    assert!(serde_json::from_str::<MobileNumber>(json).is_err());

    let json = r#"{"canonical":"+447400123456","region":"gb!","national_number":"7400123456","country_code":44,"number_type":"mobile"}"#;
    assert!(serde_json::from_str::<MobileNumber>(json).is_err());
}

#[test]
fn test_holder_context_serializes_as_string() {
    let holder = HolderContext::from("session-1");
    assert_eq!(serde_json::to_string(&holder).unwrap(), "\"session-1\"");
    assert_eq!(holder.as_str(), "session-1");
}

#[test]
fn test_log_id_hides_holder() {
    let holder = HolderContext::new("sess-8f3a2c91d0");
    let log_id = holder.log_id();
    assert_eq!(log_id.len(), 12);
    assert!(log_id.bytes().all(|b| b.is_ascii_hexdigit()));
    assert!(!log_id.contains("sess"));
    assert_eq!(log_id, HolderContext::new("sess-8f3a2c91d0").log_id());
    assert_ne!(log_id, HolderContext::new("sess-8f3a2c91d1").log_id());
    // sha256("abc")
    assert_eq!(HolderContext::new("abc").log_id(), "ba7816bf8f01");
}
