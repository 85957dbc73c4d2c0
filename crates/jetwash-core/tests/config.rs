use chrono::Duration;

use jetwash_core::config::{default_topics, parse_duration, Config, EnvOverrides};
use jetwash_core::error::PipelineError;

const FULL_TOML: &str = r#"
lookback = "2d"
resample = "5s"
wheel_radius_m = 0.07

[influx]
url = "http://localhost:8086"
org = "dev"
bucket = "telemetry"

[[topics]]
source = "Vehicle/2/Speed"
target = "Vehicle/2/qt/speed"
"#;

fn env_with_token() -> EnvOverrides {
    EnvOverrides {
        token: Some("test-token".to_string()),
        ..EnvOverrides::default()
    }
}

#[test]
fn defaults_apply_without_a_file() {
    let config = Config::from_sources(None, env_with_token()).expect("resolve failed");

    assert_eq!(config.influx.org, "SEA:ME");
    assert_eq!(config.influx.bucket, "jetracer");
    assert_eq!(config.influx.token, "test-token");
    assert_eq!(config.lookback, Duration::days(10));
    assert_eq!(config.resample, Duration::seconds(1));
    assert!((config.wheel_radius_m - 0.067).abs() < 1e-12);
    assert_eq!(config.topics, default_topics());
}

#[test]
fn file_values_override_defaults() {
    let config = Config::from_sources(Some(FULL_TOML), env_with_token()).expect("resolve failed");

    assert_eq!(config.influx.url, "http://localhost:8086");
    assert_eq!(config.influx.org, "dev");
    assert_eq!(config.influx.bucket, "telemetry");
    assert_eq!(config.lookback, Duration::days(2));
    assert_eq!(config.resample, Duration::seconds(5));
    assert!((config.wheel_radius_m - 0.07).abs() < 1e-12);
    assert_eq!(config.topics.len(), 1);
    assert_eq!(config.topics[0].source, "Vehicle/2/Speed");
    assert_eq!(config.topics[0].target, "Vehicle/2/qt/speed");
}

#[test]
fn environment_overrides_the_file() {
    let env = EnvOverrides {
        url: Some("http://influx.internal:8086".to_string()),
        bucket: Some("override".to_string()),
        token: Some("t".to_string()),
        ..EnvOverrides::default()
    };

    let config = Config::from_sources(Some(FULL_TOML), env).expect("resolve failed");

    assert_eq!(config.influx.url, "http://influx.internal:8086");
    assert_eq!(config.influx.bucket, "override");
    // the file still wins where the environment is silent
    assert_eq!(config.influx.org, "dev");
}

#[test]
fn missing_token_is_rejected() {
    let err = Config::from_sources(None, EnvOverrides::default()).expect_err("expected rejection");
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn token_in_the_file_is_rejected() {
    let raw = "[influx]\ntoken = \"leaked\"\n";
    let err =
        Config::from_sources(Some(raw), env_with_token()).expect_err("expected parse rejection");
    assert!(matches!(err, PipelineError::Toml(_)));
}

#[test]
fn empty_topic_table_is_rejected() {
    let err = Config::from_sources(Some("topics = []\n"), env_with_token())
        .expect_err("expected rejection");
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn blank_topic_entries_are_rejected() {
    let raw = "[[topics]]\nsource = \"\"\ntarget = \"x\"\n";
    assert!(Config::from_sources(Some(raw), env_with_token()).is_err());
}

#[test]
fn resample_coarser_than_lookback_is_rejected() {
    let raw = "lookback = \"30s\"\nresample = \"1m\"\n";
    let err =
        Config::from_sources(Some(raw), env_with_token()).expect_err("expected rejection");
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn nonpositive_wheel_radius_is_rejected() {
    assert!(Config::from_sources(Some("wheel_radius_m = 0.0\n"), env_with_token()).is_err());
    assert!(Config::from_sources(Some("wheel_radius_m = -0.1\n"), env_with_token()).is_err());
}

#[test]
fn durations_parse_per_unit() {
    assert_eq!(parse_duration("10d").expect("days"), Duration::days(10));
    assert_eq!(parse_duration("12h").expect("hours"), Duration::hours(12));
    assert_eq!(parse_duration("5m").expect("minutes"), Duration::minutes(5));
    assert_eq!(parse_duration("30s").expect("seconds"), Duration::seconds(30));
    assert_eq!(parse_duration(" 1s ").expect("trimmed"), Duration::seconds(1));
}

#[test]
fn malformed_durations_are_rejected() {
    assert!(parse_duration("").is_err());
    assert!(parse_duration("s").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("0s").is_err());
    assert!(parse_duration("-5s").is_err());
    assert!(parse_duration("1.5h").is_err());
    assert!(parse_duration("10w").is_err());
}
