//! Severity classification of readings.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::reading::Reading;

/// Urgency tier of a reading. Ordered `Normal < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Normal,
    Warning,
    Critical,
}

impl SeverityTier {
    /// All tiers, lowest first.
    pub const ALL: [SeverityTier; 3] = [
        SeverityTier::Normal,
        SeverityTier::Warning,
        SeverityTier::Critical,
    ];

    /// Returns the label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "NORMAL",
            SeverityTier::Warning => "WARNING",
            SeverityTier::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Limits that push a reading into a tier.
///
/// A reading reaches the tier if any one limit is crossed (strictly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    pub heart_rate_above: i32,
    pub blood_pressure_above: i32,
    pub spo2_below: i32,
}

impl TierLimits {
    fn crossed_by(&self, reading: &Reading) -> bool {
        reading.heart_rate() > self.heart_rate_above
            || reading.blood_pressure() > self.blood_pressure_above
            || reading.spo2() < self.spo2_below
    }
}

/// Thresholds for severity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageThresholds {
    pub critical: TierLimits,
    pub warning: TierLimits,
}

impl Default for TriageThresholds {
    fn default() -> Self {
        Self {
            critical: TierLimits {
                heart_rate_above: 120,
                blood_pressure_above: 160,
                spo2_below: 90,
            },
            warning: TierLimits {
                heart_rate_above: 100,
                blood_pressure_above: 140,
                spo2_below: 95,
            },
        }
    }
}

impl TriageThresholds {
    /// Classify a reading. Critical limits are checked first.
    pub fn classify(&self, reading: &Reading) -> SeverityTier {
        if self.critical.crossed_by(reading) {
            SeverityTier::Critical
        } else if self.warning.crossed_by(reading) {
            SeverityTier::Warning
        } else {
            SeverityTier::Normal
        }
    }
}

/// Classify a reading with the default thresholds.
pub fn classify(reading: &Reading) -> SeverityTier {
    TriageThresholds::default().classify(reading)
}
