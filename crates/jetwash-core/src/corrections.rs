// crates/jetwash-core/src/corrections.rs

//! Per-series numeric corrections keyed by source identifier.

use std::f64::consts::PI;

pub const SPEED_SOURCE: &str = "Vehicle/1/Speed";
pub const CHARGE_SOURCE: &str = "Vehicle/1/Powertrain/TractionBattery/StateOfCharge";
pub const AUTONOMY_SOURCE: &str = "Vehicle/1/ADAS/ActiveAutonomyLevel";

/// A pure value-level correction applied between extraction and resampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    /// Angular speed in rpm to linear speed in m/s for a wheel of the
    /// given radius.
    RpmToMetersPerSecond { wheel_radius_m: f64 },
    /// Clamp into an inclusive range.
    Clamp { min: f64, max: f64 },
    /// Pass the value through unchanged.
    Identity,
}

impl Correction {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Correction::RpmToMetersPerSecond { wheel_radius_m } => {
                value * wheel_radius_m * 2.0 * PI / 60.0
            }
            Correction::Clamp { min, max } => value.clamp(*min, *max),
            Correction::Identity => value,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Correction::RpmToMetersPerSecond { wheel_radius_m } => {
                format!("rpm to m/s (wheel radius {} m)", wheel_radius_m)
            }
            Correction::Clamp { min, max } => format!("clamp to [{}, {}]", min, max),
            Correction::Identity => "none".to_string(),
        }
    }
}

/// Lookup table from source identifier to correction, built once per run.
/// Sources without an entry get [`Correction::Identity`].
#[derive(Debug, Clone)]
pub struct CorrectionTable {
    entries: Vec<(String, Correction)>,
}

impl CorrectionTable {
    pub fn new(wheel_radius_m: f64) -> Self {
        Self {
            entries: vec![
                (
                    SPEED_SOURCE.to_string(),
                    Correction::RpmToMetersPerSecond { wheel_radius_m },
                ),
                (
                    CHARGE_SOURCE.to_string(),
                    Correction::Clamp {
                        min: 0.0,
                        max: 100.0,
                    },
                ),
                (AUTONOMY_SOURCE.to_string(), Correction::Identity),
            ],
        }
    }

    pub fn for_source(&self, source: &str) -> Correction {
        self.entries
            .iter()
            .find(|(id, _)| id == source)
            .map(|(_, correction)| *correction)
            .unwrap_or(Correction::Identity)
    }
}
