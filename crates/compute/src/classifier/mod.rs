//! Probabilistic maintenance classifier.
//!
//! Sub-modules:
//! - [`logistic`]: logistic regression fit and inference
//! - [`scaling`]: feature standardization used during fitting
//! - [`report`]: held-out accuracy and fit summary

pub mod logistic;
pub mod report;
pub mod scaling;

use std::sync::OnceLock;

use tracing::info;

use upkeep_core::config::TrainingConfig;
use upkeep_core::{HistoricalRecord, Result, SensorReading, UpkeepError};

pub use logistic::{sigmoid, TrainedModel};
pub use report::ModelReport;

/// Probability threshold at which the classifier alone calls for maintenance.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Anything that can estimate the probability that a reading needs maintenance.
///
/// Implemented by [`TrainedModel`], [`ModelSlot`] and test doubles. Decouples
/// decision fusion from the concrete model.
pub trait Classifier {
    /// Probability in [0, 1]. Must be a pure function of the reading.
    fn predict_probability(&self, reading: &SensorReading) -> Result<f64>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict_probability(&self, reading: &SensorReading) -> Result<f64> {
        (**self).predict_probability(reading)
    }
}

/// Train-once holder for the process-wide model.
///
/// Queries before [`initialize`](Self::initialize) fail with `ModelNotFitted`.
/// Once set, the model is never replaced.
#[derive(Debug, Default)]
pub struct ModelSlot {
    model: OnceLock<TrainedModel>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already fitted model.
    pub fn with_model(model: TrainedModel) -> Self {
        let slot = Self::new();
        let _ = slot.model.set(model);
        slot
    }

    /// Fit on `train` unless a model is already present. Concurrent callers may
    /// both fit; only the first stored model is kept and returned to everyone.
    pub fn initialize(
        &self,
        train: &[HistoricalRecord],
        config: &TrainingConfig,
    ) -> Result<&TrainedModel> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        let start = std::time::Instant::now();
        let fitted = TrainedModel::fit(train, config)?;
        info!(
            records = train.len(),
            iterations = fitted.iterations,
            "Classifier trained in {:.1}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        let _ = self.model.set(fitted);
        self.get()
    }

    pub fn get(&self) -> Result<&TrainedModel> {
        self.model.get().ok_or(UpkeepError::ModelNotFitted)
    }

    pub fn is_fitted(&self) -> bool {
        self.model.get().is_some()
    }
}

impl Classifier for ModelSlot {
    fn predict_probability(&self, reading: &SensorReading) -> Result<f64> {
        Ok(self.get()?.probability(reading))
    }
}
