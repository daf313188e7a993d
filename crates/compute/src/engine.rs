use serde::Serialize;
use tracing::{debug, info, warn};

use upkeep_core::{
    Config, DecisionResult, Feature, Result, RiskAssessment, SensorReading,
};

use crate::classifier::{Classifier, ModelReport, ModelSlot, DECISION_THRESHOLD};
use crate::dataset::HistoricalDataset;
use crate::risk::RiskScorer;
use crate::rules::RuleEvaluator;

/// Everything the presentation layer needs for one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub reading: SensorReading,
    pub decision: DecisionResult,
    pub risk: RiskAssessment,
    pub breached_rules: Vec<Feature>,
}

/// Fuses the threshold rules with the classifier into one maintenance decision.
///
/// Either signal alone is enough: a fired rule forces maintenance regardless of
/// model confidence, and a probability of at least 0.5 does the same without any rule.
#[derive(Debug)]
pub struct DecisionEngine<C = ModelSlot> {
    rules: RuleEvaluator,
    risk: RiskScorer,
    classifier: C,
}

impl DecisionEngine<ModelSlot> {
    /// Split `dataset`, fit the model on the train partition and build an engine around it.
    pub fn train(config: &Config, dataset: &HistoricalDataset) -> Result<(Self, ModelReport)> {
        config.validate()?;
        let start = std::time::Instant::now();

        let training = &config.training;
        let split = dataset.split(training.test_fraction, training.seed);
        info!(
            train = split.train.len(),
            test = split.test.len(),
            seed = training.seed,
            "Dataset split"
        );

        let slot = ModelSlot::new();
        let model = slot.initialize(&split.train, training)?;
        let report = ModelReport::build(model, &split);

        match report.test_accuracy {
            Some(acc) => info!(
                "Engine ready in {:.1}ms, held-out accuracy {:.2}",
                start.elapsed().as_secs_f64() * 1000.0,
                acc
            ),
            None => info!(
                "Engine ready in {:.1}ms, no held-out rows",
                start.elapsed().as_secs_f64() * 1000.0
            ),
        }

        let engine = Self::new(config, slot)?;
        Ok((engine, report))
    }
}

impl<C: Classifier> DecisionEngine<C> {
    pub fn new(config: &Config, classifier: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rules: RuleEvaluator::new(config.rules),
            risk: RiskScorer::new(config.risk)?,
            classifier,
        })
    }

    pub fn rules(&self) -> &RuleEvaluator {
        &self.rules
    }

    pub fn risk_scorer(&self) -> &RiskScorer {
        &self.risk
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Rule flag OR (probability >= 0.5). Classifier errors propagate unchanged.
    pub fn decide(&self, reading: &SensorReading) -> Result<DecisionResult> {
        check(reading)?;
        self.fuse(reading)
    }

    pub fn assess(&self, reading: &SensorReading) -> Result<RiskAssessment> {
        check(reading)?;
        Ok(self.risk.assess(reading))
    }

    /// Validate once, then run decision fusion and risk assessment.
    pub fn evaluate(&self, reading: &SensorReading) -> Result<Evaluation> {
        check(reading)?;
        let decision = self.fuse(reading)?;
        let risk = self.risk.assess(reading);
        let breached_rules = self.rules.breached(reading);

        debug!(
            probability = decision.probability,
            rule_triggered = decision.rule_triggered,
            final_decision = decision.final_decision,
            score = risk.score,
            zone = %risk.zone,
            "Reading evaluated"
        );

        Ok(Evaluation {
            reading: *reading,
            decision,
            risk,
            breached_rules,
        })
    }

    fn fuse(&self, reading: &SensorReading) -> Result<DecisionResult> {
        let rule_triggered = self.rules.evaluate(reading);
        let probability = self.classifier.predict_probability(reading)?;
        let model_triggered = probability >= DECISION_THRESHOLD;

        Ok(DecisionResult {
            probability,
            rule_triggered,
            final_decision: rule_triggered || model_triggered,
        })
    }
}

fn check(reading: &SensorReading) -> Result<()> {
    reading.validate().map_err(|e| {
        warn!(error = %e, "Rejected reading");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use upkeep_core::{UpkeepError, Zone};

    /// Classifier double returning a fixed probability.
    struct Fixed(f64);

    impl Classifier for Fixed {
        fn predict_probability(&self, _reading: &SensorReading) -> Result<f64> {
            Ok(self.0)
        }
    }

    /// Classifier double that always fails.
    struct Unfitted;

    impl Classifier for Unfitted {
        fn predict_probability(&self, _reading: &SensorReading) -> Result<f64> {
            Err(UpkeepError::ModelNotFitted)
        }
    }

    fn engine(p: f64) -> DecisionEngine<Fixed> {
        DecisionEngine::new(&Config::default(), Fixed(p)).unwrap()
    }

    #[test]
    fn rule_overrides_confident_model() {
        let result = engine(0.0).decide(&SensorReading::new(95.0, 0.3, 25.0)).unwrap();
        assert!(result.rule_triggered);
        assert!(result.final_decision);
        assert_eq!(result.probability, 0.0);
    }

    #[test]
    fn model_alone_can_trigger() {
        let result = engine(0.93).decide(&SensorReading::new(70.0, 0.4, 28.0)).unwrap();
        assert!(!result.rule_triggered);
        assert!(result.final_decision);
    }

    #[test]
    fn even_odds_triggers() {
        assert!(engine(0.5).decide(&SensorReading::new(70.0, 0.4, 28.0)).unwrap().final_decision);
        assert!(!engine(0.4999).decide(&SensorReading::new(70.0, 0.4, 28.0)).unwrap().final_decision);
    }

    #[test]
    fn rule_fires_for_every_probability() {
        let reading = SensorReading::new(60.0, 0.2, 44.0);
        for i in 0..=20 {
            let result = engine(i as f64 / 20.0).decide(&reading).unwrap();
            assert!(result.final_decision);
        }
    }

    #[test]
    fn non_finite_reading_rejected_before_classifier() {
        let engine = DecisionEngine::new(&Config::default(), Unfitted).unwrap();
        let err = engine.decide(&SensorReading::new(f64::NAN, 0.1, 1.0)).unwrap_err();
        assert!(matches!(err, UpkeepError::InvalidReading { field: "temperature", .. }));
        assert!(engine.assess(&SensorReading::new(1.0, f64::NEG_INFINITY, 1.0)).is_err());
    }

    #[test]
    fn classifier_error_propagates_unchanged() {
        let engine = DecisionEngine::new(&Config::default(), Unfitted).unwrap();
        assert_eq!(
            engine.decide(&SensorReading::new(95.0, 0.3, 25.0)),
            Err(UpkeepError::ModelNotFitted)
        );
        assert_eq!(
            engine.evaluate(&SensorReading::new(70.0, 0.4, 28.0)),
            Err(UpkeepError::ModelNotFitted)
        );
    }

    #[test]
    fn unfitted_slot_yields_model_not_fitted() {
        let engine = DecisionEngine::new(&Config::default(), ModelSlot::new()).unwrap();
        assert_eq!(
            engine.decide(&SensorReading::new(70.0, 0.4, 28.0)),
            Err(UpkeepError::ModelNotFitted)
        );
    }

    #[test]
    fn evaluate_bundles_everything() {
        let eval = engine(0.2).evaluate(&SensorReading::new(87.0, 0.95, 39.0)).unwrap();
        assert_eq!(eval.breached_rules, vec![Feature::Vibration]);
        assert!(eval.decision.final_decision);
        // 0.87 + 0.95 + 0.78 = 2.6 / 3
        assert_eq!(eval.risk.zone, Zone::Danger);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = Config::default();
        config.risk.temp_reference = -1.0;
        assert!(DecisionEngine::new(&config, Fixed(0.1)).is_err());
    }
}
