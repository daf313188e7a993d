use serde::{Deserialize, Serialize};

use crate::error::{Result, UpkeepError};

/// The three monitored sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Temperature,
    Vibration,
    Pressure,
}

impl Feature {
    /// All features in canonical (model column) order.
    pub const ALL: [Feature; 3] = [Feature::Temperature, Feature::Vibration, Feature::Pressure];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Temperature => "temperature",
            Feature::Vibration => "vibration",
            Feature::Pressure => "pressure",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One snapshot of machine sensors. Values are caller-supplied and unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temperature: f64,
    pub vibration: f64,
    pub pressure: f64,
}

impl SensorReading {
    pub fn new(temperature: f64, vibration: f64, pressure: f64) -> Self {
        Self {
            temperature,
            vibration,
            pressure,
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Temperature => self.temperature,
            Feature::Vibration => self.vibration,
            Feature::Pressure => self.pressure,
        }
    }

    /// Feature vector in [`Feature::ALL`] order.
    pub fn features(&self) -> [f64; 3] {
        [self.temperature, self.vibration, self.pressure]
    }

    /// Reject NaN and infinite values. Every scorer downstream assumes finite input.
    pub fn validate(&self) -> Result<()> {
        for feature in Feature::ALL {
            let value = self.get(feature);
            if !value.is_finite() {
                return Err(UpkeepError::InvalidReading {
                    field: feature.name(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A past reading with its ground-truth maintenance label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub reading: SensorReading,
    pub maintenance_needed: bool,
}

impl HistoricalRecord {
    pub const fn new(temperature: f64, vibration: f64, pressure: f64, maintenance_needed: bool) -> Self {
        Self {
            reading: SensorReading {
                temperature,
                vibration,
                pressure,
            },
            maintenance_needed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_reading_is_valid() {
        assert!(SensorReading::new(87.0, 0.7, 39.0).validate().is_ok());
        assert!(SensorReading::new(-40.0, 0.0, -1.0).validate().is_ok());
    }

    #[test]
    fn nan_is_rejected_with_field_name() {
        let err = SensorReading::new(80.0, f64::NAN, 30.0).validate().unwrap_err();
        match err {
            UpkeepError::InvalidReading { field, value } => {
                assert_eq!(field, "vibration");
                assert!(value.is_nan());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn infinity_is_rejected() {
        let err = SensorReading::new(80.0, 0.5, f64::INFINITY).validate().unwrap_err();
        assert_eq!(
            err,
            UpkeepError::InvalidReading {
                field: "pressure",
                value: f64::INFINITY
            }
        );
    }

    #[test]
    fn display_matches_name() {
        for feature in Feature::ALL {
            assert_eq!(feature.to_string(), feature.name());
        }
        assert_eq!(Feature::Vibration.to_string(), "vibration");
    }

    #[test]
    fn features_follow_canonical_order() {
        let r = SensorReading::new(1.0, 2.0, 3.0);
        let by_name: Vec<f64> = Feature::ALL.iter().map(|f| r.get(*f)).collect();
        assert_eq!(by_name, r.features().to_vec());
    }
}
