use serde::{Deserialize, Serialize};

/// Outcome of fusing the threshold rules with the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    /// Classifier probability that maintenance is needed, in [0, 1].
    pub probability: f64,
    pub rule_triggered: bool,
    pub final_decision: bool,
}

/// Severity bucket for the continuous risk score. Ordered SAFE < WARNING < DANGER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Safe,
    Warning,
    Danger,
}

impl Zone {
    /// Fixed display color used by the presentation layer.
    pub fn color(&self) -> &'static str {
        match self {
            Zone::Safe => "green",
            Zone::Warning => "orange",
            Zone::Danger => "red",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Safe => write!(f, "SAFE"),
            Zone::Warning => write!(f, "WARNING"),
            Zone::Danger => write!(f, "DANGER"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Normalized risk in [0, 1].
    pub score: f64,
    pub zone: Zone,
}
