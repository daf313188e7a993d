//! Hard threshold rules. Independent of the classifier.

use upkeep_core::config::RuleConfig;
use upkeep_core::{Feature, SensorReading};

/// Flags extreme conditions: any single feature at or above its threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleEvaluator {
    config: RuleConfig,
}

impl RuleEvaluator {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn threshold(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Temperature => self.config.temp_threshold,
            Feature::Vibration => self.config.vibration_threshold,
            Feature::Pressure => self.config.pressure_threshold,
        }
    }

    /// Features whose value reached the threshold, in canonical order.
    pub fn breached(&self, reading: &SensorReading) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| reading.get(*f) >= self.threshold(*f))
            .collect()
    }

    /// True iff at least one rule fires.
    pub fn evaluate(&self, reading: &SensorReading) -> bool {
        Feature::ALL
            .iter()
            .any(|f| reading.get(*f) >= self.threshold(*f))
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}
