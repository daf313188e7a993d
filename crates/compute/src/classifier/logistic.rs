//! Binary logistic regression over the three sensor features.
//!
//! Fitting runs full-batch gradient descent on standardized features with an
//! L2 penalty on the weights. The result is folded back into raw-feature
//! coefficients so inference needs no scaling state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use upkeep_core::config::TrainingConfig;
use upkeep_core::{HistoricalRecord, Result, SensorReading, UpkeepError};

use super::scaling::FeatureScaling;
use super::Classifier;

/// Gradient norm below which fitting stops early.
const GRADIENT_TOLERANCE: f64 = 1e-8;

/// Bound on each term of the linear predictor. The sigmoid is saturated long
/// before this, and bounding terms keeps huge finite readings from summing to NaN.
const TERM_LIMIT: f64 = 1e6;

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Fitted parameters. Immutable once built; there is no retraining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    /// Raw-feature coefficients in temperature, vibration, pressure order.
    pub coefficients: [f64; 3],
    pub intercept: f64,
    /// Gradient-descent iterations actually run.
    pub iterations: usize,
}

impl TrainedModel {
    /// Fit on `train`. Fails on an empty partition or one holding a single class.
    pub fn fit(train: &[HistoricalRecord], config: &TrainingConfig) -> Result<Self> {
        let first = train.first().ok_or(UpkeepError::EmptyDataset)?;
        if train
            .iter()
            .all(|r| r.maintenance_needed == first.maintenance_needed)
        {
            return Err(UpkeepError::DegenerateTrainingData {
                class: first.maintenance_needed,
            });
        }

        let rows: Vec<[f64; 3]> = train.iter().map(|r| r.reading.features()).collect();
        let targets: Vec<f64> = train
            .iter()
            .map(|r| if r.maintenance_needed { 1.0 } else { 0.0 })
            .collect();

        let scaling = FeatureScaling::fit(&rows);
        let z_rows: Vec<[f64; 3]> = rows.iter().map(|r| scaling.transform(r)).collect();
        let m = z_rows.len() as f64;

        let mut weights = [0.0f64; 3];
        let mut bias = 0.0f64;
        let mut iterations = 0;

        for _ in 0..config.max_iterations {
            iterations += 1;

            let mut grad_w = [0.0f64; 3];
            let mut grad_b = 0.0f64;
            for (z, y) in z_rows.iter().zip(&targets) {
                let logit = bias + weights[0] * z[0] + weights[1] * z[1] + weights[2] * z[2];
                let err = sigmoid(logit) - y;
                for j in 0..3 {
                    grad_w[j] += err * z[j];
                }
                grad_b += err;
            }

            for j in 0..3 {
                grad_w[j] = grad_w[j] / m + config.l2_penalty * weights[j] / m;
            }
            grad_b /= m;

            let norm = (grad_w.iter().map(|g| g * g).sum::<f64>() + grad_b * grad_b).sqrt();
            if norm < GRADIENT_TOLERANCE {
                break;
            }

            for j in 0..3 {
                weights[j] -= config.learning_rate * grad_w[j];
            }
            bias -= config.learning_rate * grad_b;
        }

        let (coefficients, intercept) = scaling.unscale(&weights, bias);
        debug!(?coefficients, intercept, iterations, "Logistic regression fitted");

        Ok(Self {
            coefficients,
            intercept,
            iterations,
        })
    }

    /// Linear predictor for a reading, with each term bounded by [`TERM_LIMIT`].
    pub fn logit(&self, reading: &SensorReading) -> f64 {
        let x = reading.features();
        let mut z = self.intercept;
        for j in 0..3 {
            z += (self.coefficients[j] * x[j]).clamp(-TERM_LIMIT, TERM_LIMIT);
        }
        z
    }

    /// Probability that maintenance is needed. Total for finite readings.
    pub fn probability(&self, reading: &SensorReading) -> f64 {
        sigmoid(self.logit(reading))
    }
}

impl Classifier for TrainedModel {
    fn predict_probability(&self, reading: &SensorReading) -> Result<f64> {
        Ok(self.probability(reading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::HistoricalDataset;

    fn all_builtin() -> TrainedModel {
        TrainedModel::fit(HistoricalDataset::builtin().records(), &TrainingConfig::default())
            .unwrap()
    }

    #[test]
    fn sigmoid_is_symmetric_and_bounded() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
    }

    #[test]
    fn separates_builtin_history() {
        let model = all_builtin();
        for record in HistoricalDataset::builtin().records() {
            let p = model.probability(&record.reading);
            assert_eq!(p >= 0.5, record.maintenance_needed, "record {record:?} got p={p}");
        }
    }

    #[test]
    fn all_coefficients_point_towards_failure() {
        let model = all_builtin();
        assert!(model.coefficients.iter().all(|c| *c > 0.0), "{:?}", model.coefficients);
    }

    #[test]
    fn midpoint_of_symmetric_data_is_even_odds() {
        let records = vec![
            HistoricalRecord::new(60.0, 0.5, 30.0, false),
            HistoricalRecord::new(100.0, 0.5, 30.0, true),
        ];
        let model = TrainedModel::fit(&records, &TrainingConfig::default()).unwrap();
        let p = model.probability(&SensorReading::new(80.0, 0.5, 30.0));
        assert!((p - 0.5).abs() < 1e-6, "p={p}");
        // Constant features carry no weight.
        assert!(model.coefficients[1].abs() < 1e-12);
        assert!(model.coefficients[2].abs() < 1e-12);
    }

    #[test]
    fn single_class_fails_fast() {
        let records = vec![
            HistoricalRecord::new(60.0, 0.5, 30.0, false),
            HistoricalRecord::new(61.0, 0.4, 31.0, false),
        ];
        let err = TrainedModel::fit(&records, &TrainingConfig::default()).unwrap_err();
        assert_eq!(err, UpkeepError::DegenerateTrainingData { class: false });
    }

    #[test]
    fn empty_partition_fails() {
        let err = TrainedModel::fit(&[], &TrainingConfig::default()).unwrap_err();
        assert_eq!(err, UpkeepError::EmptyDataset);
    }

    #[test]
    fn extreme_finite_readings_stay_defined() {
        let model = all_builtin();
        for reading in [
            SensorReading::new(f64::MAX, f64::MIN, f64::MAX),
            SensorReading::new(f64::MIN, f64::MIN, f64::MIN),
            SensorReading::new(1e300, -1e300, 0.0),
        ] {
            let p = model.probability(&reading);
            assert!((0.0..=1.0).contains(&p), "p={p} for {reading:?}");
        }
    }

    #[test]
    fn fitting_is_deterministic() {
        assert_eq!(all_builtin(), all_builtin());
    }
}
