//! Continuous risk score and its three-zone bucketing.

use upkeep_core::config::RiskConfig;
use upkeep_core::{Feature, Result, RiskAssessment, SensorReading, Zone};

/// Highest score still considered SAFE.
pub const SAFE_MAX: f64 = 0.66;
/// Highest score still considered WARNING.
pub const WARNING_MAX: f64 = 0.78;

/// Map a score to its zone. Boundary values fall into the lower-severity zone.
pub fn classify(score: f64) -> Zone {
    if score <= SAFE_MAX {
        Zone::Safe
    } else if score <= WARNING_MAX {
        Zone::Warning
    } else {
        Zone::Danger
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    /// Fails with `InvalidConfig` unless every reference is finite and positive.
    pub fn new(config: RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn reference(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Temperature => self.config.temp_reference,
            Feature::Vibration => self.config.vibration_reference,
            Feature::Pressure => self.config.pressure_reference,
        }
    }

    /// `raw / reference`, clamped to [0, 1].
    pub fn subscore(&self, reading: &SensorReading, feature: Feature) -> f64 {
        (reading.get(feature) / self.reference(feature)).clamp(0.0, 1.0)
    }

    /// Mean of the three sub-scores.
    pub fn score(&self, reading: &SensorReading) -> f64 {
        let sum: f64 = Feature::ALL.iter().map(|f| self.subscore(reading, *f)).sum();
        sum / Feature::ALL.len() as f64
    }

    pub fn assess(&self, reading: &SensorReading) -> RiskAssessment {
        let score = self.score(reading);
        RiskAssessment {
            score,
            zone: classify(score),
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self {
            config: RiskConfig::default(),
        }
    }
}
