// crates/jetwash-core/src/config.rs

//! Runtime configuration: TOML file, environment overrides, built-in
//! defaults. The auth token can only arrive through the environment, so a
//! committed config file stays secret-free.

use std::env;
use std::fs;
use std::path::Path;

use chrono::Duration;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::corrections::{AUTONOMY_SOURCE, CHARGE_SOURCE, SPEED_SOURCE};
use crate::error::{PipelineError, Result};
use jetwash_influx::InfluxConfig;

pub const DEFAULT_CONFIG_PATH: &str = "jetwash.toml";

const DEFAULT_URL: &str = "https://eu-central-1-1.aws.cloud2.influxdata.com";
const DEFAULT_ORG: &str = "SEA:ME";
const DEFAULT_BUCKET: &str = "jetracer";
const DEFAULT_LOOKBACK: &str = "10d";
const DEFAULT_RESAMPLE: &str = "1s";
const DEFAULT_WHEEL_RADIUS_M: f64 = 0.067;

/// One source series and the identifier its treated form is written under.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopicRoute {
    pub source: String,
    pub target: String,
}

static DEFAULT_TOPICS: Lazy<Vec<TopicRoute>> = Lazy::new(|| {
    vec![
        TopicRoute {
            source: SPEED_SOURCE.to_string(),
            target: "Vehicle/1/qt/speed".to_string(),
        },
        TopicRoute {
            source: CHARGE_SOURCE.to_string(),
            target: "Vehicle/1/qt/charge".to_string(),
        },
        TopicRoute {
            source: AUTONOMY_SOURCE.to_string(),
            target: "Vehicle/1/qt/autonomy_level".to_string(),
        },
    ]
});

pub fn default_topics() -> &'static [TopicRoute] {
    DEFAULT_TOPICS.as_slice()
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    lookback: Option<String>,
    resample: Option<String>,
    wheel_radius_m: Option<f64>,
    #[serde(default)]
    influx: FileInfluxConfig,
    topics: Option<Vec<TopicRoute>>,
}

// No token field here on purpose.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileInfluxConfig {
    url: Option<String>,
    org: Option<String>,
    bucket: Option<String>,
}

/// Environment-supplied settings, captured once at startup.
#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub url: Option<String>,
    pub org: Option<String>,
    pub bucket: Option<String>,
    pub token: Option<String>,
}

impl EnvOverrides {
    pub fn capture() -> Self {
        Self {
            url: env::var("JETWASH_INFLUX_URL").ok(),
            org: env::var("JETWASH_INFLUX_ORG").ok(),
            bucket: env::var("JETWASH_INFLUX_BUCKET").ok(),
            token: env::var("JETWASH_INFLUX_TOKEN")
                .or_else(|_| env::var("INFLUX_TOKEN"))
                .ok(),
        }
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub influx: InfluxConfig,
    pub lookback: Duration,
    pub resample: Duration,
    pub wheel_radius_m: f64,
    pub topics: Vec<TopicRoute>,
}

impl Config {
    /// Load from an optional TOML file plus the environment. Without an
    /// explicit path, `jetwash.toml` is read when present; otherwise the
    /// built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let raw = match path {
            Some(explicit) => Some(fs::read_to_string(explicit)?),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Some(fs::read_to_string(default)?)
                } else {
                    None
                }
            }
        };
        Self::from_sources(raw.as_deref(), EnvOverrides::capture())
    }

    /// Resolve a configuration from raw TOML (if any) and environment
    /// overrides. Split out from [`Config::load`] so the layering stays
    /// testable without touching the process environment.
    pub fn from_sources(raw_toml: Option<&str>, env: EnvOverrides) -> Result<Self> {
        let file: FileConfig = match raw_toml {
            Some(raw) => toml::from_str(raw)?,
            None => FileConfig::default(),
        };

        let config = Self {
            influx: InfluxConfig {
                url: pick(env.url, file.influx.url, DEFAULT_URL),
                org: pick(env.org, file.influx.org, DEFAULT_ORG),
                bucket: pick(env.bucket, file.influx.bucket, DEFAULT_BUCKET),
                token: env.token.unwrap_or_default(),
            },
            lookback: parse_duration(file.lookback.as_deref().unwrap_or(DEFAULT_LOOKBACK))?,
            resample: parse_duration(file.resample.as_deref().unwrap_or(DEFAULT_RESAMPLE))?,
            wheel_radius_m: file.wheel_radius_m.unwrap_or(DEFAULT_WHEEL_RADIUS_M),
            topics: file.topics.unwrap_or_else(|| default_topics().to_vec()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.influx.url.trim().is_empty() {
            return Err(PipelineError::Config("influx url must not be empty".into()));
        }
        if self.influx.org.trim().is_empty() {
            return Err(PipelineError::Config("influx org must not be empty".into()));
        }
        if self.influx.bucket.trim().is_empty() {
            return Err(PipelineError::Config(
                "influx bucket must not be empty".into(),
            ));
        }
        if self.influx.token.trim().is_empty() {
            return Err(PipelineError::Config(
                "JETWASH_INFLUX_TOKEN (or INFLUX_TOKEN) must be set".into(),
            ));
        }
        if self.topics.is_empty() {
            return Err(PipelineError::Config(
                "at least one topic is required".into(),
            ));
        }
        for route in &self.topics {
            if route.source.trim().is_empty() || route.target.trim().is_empty() {
                return Err(PipelineError::Config(
                    "topic source and target must not be empty".into(),
                ));
            }
        }
        if !(self.wheel_radius_m.is_finite() && self.wheel_radius_m > 0.0) {
            return Err(PipelineError::Config(
                "wheel_radius_m must be positive".into(),
            ));
        }
        if self.resample > self.lookback {
            return Err(PipelineError::Config(
                "resample interval must not exceed the lookback window".into(),
            ));
        }
        Ok(())
    }
}

fn pick(env: Option<String>, file: Option<String>, default: &str) -> String {
    env.or(file).unwrap_or_else(|| default.to_string())
}

/// Parse a duration of the form `<count><unit>` with unit `d`, `h`, `m`
/// or `s` (for example `10d` or `30s`).
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let Some(unit) = raw.chars().last() else {
        return Err(PipelineError::Config("duration must not be empty".into()));
    };

    let count: i64 = raw[..raw.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| PipelineError::Config(format!("invalid duration {:?}", raw)))?;
    if count <= 0 {
        return Err(PipelineError::Config(format!(
            "duration {:?} must be positive",
            raw
        )));
    }

    let duration = match unit {
        'd' => Duration::try_days(count),
        'h' => Duration::try_hours(count),
        'm' => Duration::try_minutes(count),
        's' => Duration::try_seconds(count),
        other => {
            return Err(PipelineError::Config(format!(
                "unsupported duration unit {:?} in {:?}",
                other, raw
            )))
        }
    };
    duration.ok_or_else(|| PipelineError::Config(format!("duration {:?} is out of range", raw)))
}
