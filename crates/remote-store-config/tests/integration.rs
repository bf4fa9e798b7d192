use chrono::{DateTime, Duration, TimeZone, Utc};
use remote_store_config::{
    ConfigError, ConfigGetters, ConfigRecord, Env, Platform, UpdateType, check_update, derive_path,
    evaluate, is_review_build, is_under_maintenance, parse, project,
};
use serde_json::{Value, json};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn stamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339())
}

fn record(value: Value) -> ConfigRecord {
    parse(&value).expect("record should validate")
}

#[test]
fn stored_document_drives_every_evaluator() {
    let raw = json!({
        "env": "prod",
        "platform": "ios",
        "system_maintenance:start_time": stamp(now() - Duration::minutes(10)),
        "system_maintenance:end_time": stamp(now() + Duration::minutes(20)),
        "system_maintenance:reason": "database failover",
        "system_maintenance:allowed_backdoor": true,
        "version:minimum": "1.2.0",
        "version:next": "1.5.0",
        "version:next_update_time": stamp(now() - Duration::days(1)),
        "review:version": "1.0.0",
    });
    let parsed = record(raw);
    assert_eq!(
        derive_path(parsed.env.as_str(), parsed.platform.as_str()),
        Ok("app_config/prod:ios".to_string())
    );

    let getters = evaluate(Some(&parsed), "1.0.0", now());
    assert_eq!(
        getters,
        ConfigGetters {
            maintenance: true,
            review_mode: true,
            update_type: UpdateType::Optional,
        }
    );

    let after_window = evaluate(Some(&parsed), "1.5.0", now() + Duration::hours(1));
    assert_eq!(after_window, ConfigGetters::default());
}

#[test]
fn absent_record_projects_defaults() {
    let change = project(None, "0.0.1", now());
    assert_eq!(change.record, None);
    assert!(!is_under_maintenance(None, now()));
    assert_eq!(check_update(None, "0.0.1", now()), UpdateType::None);
    assert!(!is_review_build(None, "0.0.1"));
}

#[test]
fn update_classification_table() {
    let past = Some(now() - Duration::hours(1));
    let future = Some(now() + Duration::hours(1));
    let cases = [
        (Some("0.9.0"), None, None, UpdateType::None),
        (Some("1.5.0"), None, None, UpdateType::Required),
        (Some("1.5.0"), Some("1.5.0"), past, UpdateType::Required),
        (None, Some("1.5.0"), past, UpdateType::Optional),
        (Some("1.2.0"), Some("1.5.0"), past, UpdateType::Optional),
        (Some("1.5.0"), Some("1.5.0"), future, UpdateType::None),
    ];
    for (minimum, next, at, expected) in cases {
        let mut record = ConfigRecord::new(Env::Stg, Platform::Android);
        record.version.minimum = minimum.map(str::to_string);
        record.version.next = next.map(str::to_string);
        record.version.next_update_time = at;
        assert_eq!(
            check_update(Some(&record), "1.0.0", now()),
            expected,
            "minimum={minimum:?} next={next:?} at={at:?}"
        );
    }
}

#[test]
fn malformed_window_keeps_maintenance_on() {
    let parsed = record(json!({
        "env": "dev",
        "platform": "web",
        "system_maintenance:start_time": stamp(now() - Duration::hours(2)),
        "system_maintenance:end_time": stamp(now() - Duration::hours(3)),
    }));
    assert!(is_under_maintenance(Some(&parsed), now()));
}

#[test]
fn review_match_is_exact() {
    let parsed = record(json!({ "env": "dev", "platform": "web", "review:version": "1.0.0" }));
    assert!(is_review_build(Some(&parsed), "1.0.0"));
    assert!(!is_review_build(Some(&parsed), "1.0.1"));
    assert!(!is_review_build(Some(&parsed), "v1.0.0"));
}

#[test]
fn serialized_records_parse_back() {
    let mut original = ConfigRecord::new(Env::Prod, Platform::Web);
    original.maintenance.start_time = Some(now());
    original.maintenance.reason = Some("upgrade".into());
    original.version.next = Some("2.0.0".into());
    original.version.next_update_time = Some(now() + Duration::days(7));
    original.review.version = Some("1.9.0".into());

    let stored = Value::Object(original.to_document());
    assert_eq!(parse(&stored), Ok(original));
}

#[test]
fn invalid_identity_never_derives_a_path() {
    assert!(matches!(
        derive_path("production", "web"),
        Err(ConfigError::InvalidIdentity { field: "env", .. })
    ));
    let violation = parse(&json!({ "env": "prod" })).expect_err("platform is required");
    assert!(violation.mentions("platform"));
}
