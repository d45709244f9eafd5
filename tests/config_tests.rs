//! Tests for the type-safe configuration builder

use fpo_contact_scrape::config::SweepConfig;
use fpo_contact_scrape::{FailurePolicy, SweepError};
use std::path::Path;
use std::time::Duration;

#[test]
fn test_builder_requires_range_and_output() {
    // Does not compile without both required fields:
    // let config = SweepConfig::builder().build();
    // let config = SweepConfig::builder().id_range(1..2).build();

    let config = SweepConfig::builder()
        .id_range(647..69122)
        .output_path("extracted_emails.csv")
        .build()
        .unwrap();

    assert_eq!(config.id_range(), 647..69122);
    assert_eq!(config.output_path(), Path::new("extracted_emails.csv"));
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let config = SweepConfig::builder()
        .id_range(1..10)
        .output_path("out.csv")
        .build()
        .unwrap();

    assert_eq!(config.base_url(), "https://bharatfpofinder.nafpo.in");
    assert_eq!(
        config.record_url(647),
        "https://bharatfpofinder.nafpo.in/main/organisationDetails/647"
    );
    assert_eq!(config.expand_label(), "View More");
    assert_eq!(config.expand_timeout(), Duration::from_secs(3));
    assert_eq!(config.expand_settle(), Duration::from_secs(1));
    assert_eq!(config.page_load_timeout(), Duration::from_secs(30));
    assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
    assert!(config.headless());
    assert_eq!(config.chrome_data_dir(), None);
    assert_eq!(config.failure_policy(), FailurePolicy::Skip);
    assert!(config.address_pattern().is_none());
    assert_eq!(config.crawl_rate_rps(), None);
}

#[test]
fn test_builder_with_all_optional_fields() {
    let config = SweepConfig::builder()
        .id_range(5..6)
        .output_path("out/emails.csv")
        .base_url("http://localhost:8080/")
        .expand_label(" Show more ")
        .expand_timeout_ms(500)
        .expand_settle_ms(0)
        .page_load_timeout_secs(10)
        .navigation_timeout_secs(12)
        .headless(false)
        .chrome_data_dir(Some("/tmp/profile".into()))
        .failure_policy(FailurePolicy::Abort)
        .address_pattern(Some(r"[a-z]+@[a-z]+\.in".to_string()))
        .crawl_rate_rps(Some(1.5))
        .build()
        .unwrap();

    assert_eq!(config.base_url(), "http://localhost:8080");
    assert_eq!(
        config.record_url(5),
        "http://localhost:8080/main/organisationDetails/5"
    );
    assert_eq!(config.expand_label(), "Show more");
    assert_eq!(config.expand_timeout(), Duration::from_millis(500));
    assert_eq!(config.expand_settle(), Duration::ZERO);
    assert_eq!(config.page_load_timeout(), Duration::from_secs(10));
    assert_eq!(config.navigation_timeout(), Duration::from_secs(12));
    assert!(!config.headless());
    assert_eq!(
        config.chrome_data_dir().map(|p| p.as_path()),
        Some(Path::new("/tmp/profile"))
    );
    assert_eq!(config.failure_policy(), FailurePolicy::Abort);
    assert_eq!(
        config.address_pattern().map(|r| r.as_str()),
        Some(r"[a-z]+@[a-z]+\.in")
    );
    assert_eq!(config.crawl_rate_rps(), Some(1.5));
}

#[test]
fn test_base_url_without_scheme_gets_https() {
    let config = SweepConfig::builder()
        .id_range(1..2)
        .output_path("out.csv")
        .base_url("bharatfpofinder.nafpo.in")
        .build()
        .unwrap();
    assert_eq!(config.base_url(), "https://bharatfpofinder.nafpo.in");
}

#[test]
fn test_empty_range_is_allowed() {
    let config = SweepConfig::builder()
        .id_range(7..7)
        .output_path("out.csv")
        .build()
        .unwrap();
    assert!(config.id_range().is_empty());
}

fn assert_config_error(result: Result<SweepConfig, SweepError>) {
    match result {
        Err(SweepError::Config(_)) => {}
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_invalid_values_are_rejected() {
    #[allow(clippy::reversed_empty_ranges)]
    let reversed = 10..5;
    assert_config_error(
        SweepConfig::builder()
            .id_range(reversed)
            .output_path("out.csv")
            .build(),
    );
    assert_config_error(SweepConfig::builder().id_range(1..2).output_path("").build());
    assert_config_error(
        SweepConfig::builder()
            .id_range(1..2)
            .output_path("out.csv")
            .base_url("https://host/main/organisationDetails")
            .build(),
    );
    assert_config_error(
        SweepConfig::builder()
            .id_range(1..2)
            .output_path("out.csv")
            .base_url("ftp://host")
            .build(),
    );
    assert_config_error(
        SweepConfig::builder()
            .id_range(1..2)
            .output_path("out.csv")
            .expand_label("   ")
            .build(),
    );
    assert_config_error(
        SweepConfig::builder()
            .id_range(1..2)
            .output_path("out.csv")
            .page_load_timeout_secs(0)
            .build(),
    );
    assert_config_error(
        SweepConfig::builder()
            .id_range(1..2)
            .output_path("out.csv")
            .address_pattern(Some("([a-z".to_string()))
            .build(),
    );
    assert_config_error(
        SweepConfig::builder()
            .id_range(1..2)
            .output_path("out.csv")
            .crawl_rate_rps(Some(0.0))
            .build(),
    );
}

#[test]
fn test_deserialized_config_keeps_custom_pattern() {
    let config = SweepConfig::builder()
        .id_range(1..2)
        .output_path("out.csv")
        .address_pattern(Some(r"[a-z]+@[a-z]+\.in".to_string()))
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let restored: SweepConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(
        restored.address_pattern().map(|r| r.as_str()),
        Some(r"[a-z]+@[a-z]+\.in")
    );
    assert_eq!(restored.id_range(), 1..2);
}

#[test]
fn test_deserialized_config_without_pattern() {
    let config = SweepConfig::builder()
        .id_range(1..2)
        .output_path("out.csv")
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let restored: SweepConfig = serde_json::from_str(&json).unwrap();
    assert!(restored.address_pattern().is_none());
}

#[test]
fn test_deserializing_bad_pattern_fails() {
    let config = SweepConfig::builder()
        .id_range(1..2)
        .output_path("out.csv")
        .build()
        .unwrap();

    let mut value = serde_json::to_value(&config).unwrap();
    value["address_pattern"] = serde_json::Value::String("([a-z".into());
    let err = serde_json::from_value::<SweepConfig>(value).unwrap_err();
    assert!(err.to_string().contains("invalid address pattern"));
}
