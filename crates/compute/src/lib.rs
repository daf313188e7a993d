//! Maintenance decision engine.
//!
//! This crate provides:
//! - The historical dataset fixture and its seeded train/test split
//! - A logistic-regression classifier trained once at startup
//! - Threshold rules and a normalized risk score with SAFE/WARNING/DANGER zones
//! - Decision fusion (rule OR model) and chart data for front ends

pub mod chart;
pub mod classifier;
pub mod dataset;
pub mod engine;
pub mod risk;
pub mod rules;

pub use chart::{Charts, RiskBar, ScatterChart};
pub use classifier::{Classifier, ModelReport, ModelSlot, TrainedModel};
pub use dataset::{HistoricalDataset, TrainTestSplit};
pub use engine::{DecisionEngine, Evaluation};
pub use risk::RiskScorer;
pub use rules::RuleEvaluator;
