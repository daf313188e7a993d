use serde::Serialize;

use crate::dataset::TrainTestSplit;

use super::logistic::TrainedModel;
use super::DECISION_THRESHOLD;

/// Summary of a fit, including accuracy on the held-out partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub train_size: usize,
    pub test_size: usize,
    /// Share of test rows classified correctly at the 0.5 threshold. None when nothing was held out.
    pub test_accuracy: Option<f64>,
    pub coefficients: [f64; 3],
    pub intercept: f64,
    pub iterations: usize,
}

impl ModelReport {
    pub fn build(model: &TrainedModel, split: &TrainTestSplit) -> Self {
        let test_accuracy = if split.test.is_empty() {
            None
        } else {
            let correct = split
                .test
                .iter()
                .filter(|r| (model.probability(&r.reading) >= DECISION_THRESHOLD) == r.maintenance_needed)
                .count();
            Some(correct as f64 / split.test.len() as f64)
        };

        Self {
            train_size: split.train.len(),
            test_size: split.test.len(),
            test_accuracy,
            coefficients: model.coefficients,
            intercept: model.intercept,
            iterations: model.iterations,
        }
    }
}
