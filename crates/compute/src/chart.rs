//! Chart data for the presentation layer. Nothing here draws; it only shapes
//! values so any front end can plot them.

use serde::Serialize;

use upkeep_core::{RiskAssessment, SensorReading, Zone};

use crate::dataset::HistoricalDataset;
use crate::engine::Evaluation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    /// Historical row labelled as not needing maintenance.
    Healthy,
    /// Historical row labelled as needing maintenance.
    Maintenance,
    /// The reading under evaluation.
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub temperature: f64,
    pub vibration: f64,
    pub series: Series,
}

/// Temperature vs vibration, history plus the current reading (always last).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ScatterPoint>,
}

impl ScatterChart {
    pub fn build(dataset: &HistoricalDataset, current: &SensorReading) -> Self {
        let mut points: Vec<ScatterPoint> = dataset
            .records()
            .iter()
            .map(|r| ScatterPoint {
                temperature: r.reading.temperature,
                vibration: r.reading.vibration,
                series: if r.maintenance_needed {
                    Series::Maintenance
                } else {
                    Series::Healthy
                },
            })
            .collect();

        points.push(ScatterPoint {
            temperature: current.temperature,
            vibration: current.vibration,
            series: Series::Current,
        });

        Self {
            x_label: "Temperature",
            y_label: "Vibration",
            points,
        }
    }
}

/// Horizontal bar showing the risk score, colored by zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskBar {
    pub score: f64,
    pub zone: Zone,
    pub color: &'static str,
}

impl From<&RiskAssessment> for RiskBar {
    fn from(risk: &RiskAssessment) -> Self {
        Self {
            score: risk.score,
            zone: risk.zone,
            color: risk.zone.color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub scatter: ScatterChart,
    pub risk_bar: RiskBar,
}

impl Charts {
    pub fn build(dataset: &HistoricalDataset, evaluation: &Evaluation) -> Self {
        Self {
            scatter: ScatterChart::build(dataset, &evaluation.reading),
            risk_bar: RiskBar::from(&evaluation.risk),
        }
    }
}
