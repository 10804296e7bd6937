use crate::*;
use serde_json::{json, Map, Value};

fn map(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

// ========== Attribute Bag ==========

#[test]
fn test_bag_get_set() {
    let mut bag = AttributeBag::new();
    assert!(bag.get("speed").is_none());
    bag.set("speed", 70u8);
    assert_eq!(bag.get("speed"), Some(&json!(70)));
    assert_eq!(bag.get_or("speed", 50u8), 70);
}

#[test]
fn test_bag_missing_key_uses_default() {
    let bag = AttributeBag::new();
    assert_eq!(bag.get_or("duration", 7u32), 7);
    assert_eq!(bag.get_or("token", String::from("none")), "none");
}

#[test]
fn test_bag_wrong_shape_uses_default() {
    let bag = AttributeBag::from_map(map(json!({ "duration": "lots", "speed": null })));
    assert_eq!(bag.get_or("duration", 3u32), 3);
    assert_eq!(bag.get_or("speed", 50u8), 50);
}

#[test]
fn test_bag_remove() {
    let mut bag = AttributeBag::new();
    bag.set("token", "t1");
    assert!(bag.contains("token"));
    assert_eq!(bag.remove("token"), Some(json!("t1")));
    assert!(bag.is_empty());
}

// ========== Speed ==========

#[test]
fn test_speed_clamping_law() {
    assert_eq!(Speed::from_slot("-5"), Some(Speed::clamped(1)));
    assert_eq!(Speed::from_slot("500").map(Speed::percent), Some(100));
    assert_eq!(Speed::from_slot("42").map(Speed::percent), Some(42));
    assert_eq!(Speed::from_slot("0").map(Speed::percent), Some(1));
    assert_eq!(Speed::from_slot("100").map(Speed::percent), Some(100));
}

#[test]
fn test_speed_overflow_clamps() {
    assert_eq!(Speed::from_slot("99999999999999999999999"), Some(Speed::MAX));
    assert_eq!(Speed::from_slot("-99999999999999999999999"), Some(Speed::MIN));
}

#[test]
fn test_speed_decimal_truncates() {
    assert_eq!(Speed::from_slot("42.9").map(Speed::percent), Some(42));
    assert_eq!(Speed::from_slot(" 7 ").map(Speed::percent), Some(7));
}

#[test]
fn test_speed_non_numeric() {
    assert_eq!(Speed::from_slot("fast"), None);
    assert_eq!(Speed::from_slot(""), None);
    assert_eq!(Speed::from_slot("NaN"), None);
    assert_eq!(Speed::from_slot("inf"), None);
}

#[test]
fn test_speed_always_in_range() {
    for raw in [i64::MIN, -1000, -1, 0, 1, 50, 99, 100, 101, 1000, i64::MAX] {
        let s = Speed::clamped(raw).percent();
        assert!((1..=100).contains(&s), "{} -> {}", raw, s);
    }
}

#[test]
fn test_speed_default() {
    assert_eq!(Speed::default().percent(), 50);
    assert_eq!(Speed::default().to_string(), "50");
}

// ========== Session Load/Store ==========

#[test]
fn test_empty_session() {
    let s = Session::from_attributes(&Map::new());
    assert_eq!(s, Session::new());
    assert_eq!(s.phase, SessionPhase::NoSession);
    assert_eq!(s.speed_or(Speed::DEFAULT).percent(), 50);
}

#[test]
fn test_load_full_session() {
    let s = Session::from_attributes(&map(json!({
        "endpointId": "E1",
        "speed": 70,
        "token": "tok",
        "duration": 4,
        "phase": "AWAITING_GADGET"
    })));
    assert_eq!(s.endpoint_id.as_deref(), Some("E1"));
    assert_eq!(s.speed.map(Speed::percent), Some(70));
    assert_eq!(s.token.as_deref(), Some("tok"));
    assert_eq!(s.remaining_extensions, 4);
    assert_eq!(s.phase, SessionPhase::AwaitingGadget);
}

#[test]
fn test_load_clamps_stored_speed() {
    let s = Session::from_attributes(&map(json!({ "speed": 900 })));
    assert_eq!(s.speed, Some(Speed::MAX));
}

#[test]
fn test_load_ignores_bad_values() {
    let s = Session::from_attributes(&map(json!({
        "endpointId": "",
        "duration": -3,
        "phase": "DANCING",
        "token": 12
    })));
    assert_eq!(s.endpoint_id, None);
    assert_eq!(s.remaining_extensions, 0);
    assert_eq!(s.phase, SessionPhase::NoSession);
    assert_eq!(s.token, None);
}

#[test]
fn test_store_roundtrip_keeps_foreign_keys() {
    let mut s = Session::new();
    s.begin("E1");
    s.remaining_extensions = 10;
    s.issue_token("t1");
    s.speed = Some(Speed::clamped(30));
    let attrs = s.to_attributes(map(json!({ "locale": "en-US" })));
    assert_eq!(attrs["locale"], "en-US");
    assert_eq!(attrs["endpointId"], "E1");
    assert_eq!(attrs["duration"], 10);
    assert_eq!(attrs["speed"], 30);
    assert_eq!(attrs["phase"], "AWAITING_COMMAND");
    assert_eq!(Session::from_attributes(&attrs), s);
}

#[test]
fn test_store_removes_cleared_fields() {
    let mut s = Session::from_attributes(&map(json!({ "token": "t1", "endpointId": "E1" })));
    s.end();
    let attrs = s.to_attributes(map(json!({ "token": "t1", "endpointId": "E1" })));
    assert!(attrs.get("token").is_none());
    assert_eq!(attrs["phase"], "ENDED");
}

// ========== Correlation ==========

#[test]
fn test_token_matching() {
    let mut s = Session::new();
    assert!(!s.token_matches("t1"));
    s.issue_token("t1");
    assert!(s.token_matches("t1"));
    s.issue_token("t2");
    assert!(!s.token_matches("t1"));
    assert!(!s.token_matches(""));
}

#[test]
fn test_endpoint_matching() {
    let mut s = Session::new();
    assert!(!s.endpoint_matches(Some("E1")));
    s.begin("E1");
    assert!(s.endpoint_matches(Some("E1")));
    assert!(!s.endpoint_matches(Some("E2")));
    assert!(!s.endpoint_matches(None));
}

// ========== Phases ==========

#[test]
fn test_phase_transitions() {
    let mut s = Session::new();
    s.begin("E1");
    assert_eq!(s.phase, SessionPhase::AwaitingCommand);
    s.await_gadget();
    assert_eq!(s.phase, SessionPhase::AwaitingGadget);
    s.await_command();
    assert_eq!(s.phase, SessionPhase::AwaitingCommand);
    s.issue_token("t");
    s.end();
    assert!(s.is_ended());
    assert!(s.token.is_none());
}

#[test]
fn test_session_display() {
    let mut s = Session::new();
    s.begin("E1");
    s.remaining_extensions = 3;
    assert_eq!(s.to_string(), "Session(endpoint=E1, phase=awaiting_command, remaining=3)");
}

#[test]
fn test_is_live_only_between_launch_and_end() {
    let mut s = Session::new();
    assert!(!s.is_live());
    s.begin("E1");
    assert!(s.is_live());
    s.await_gadget();
    assert!(s.is_live());
    s.end();
    assert!(!s.is_live());
}
