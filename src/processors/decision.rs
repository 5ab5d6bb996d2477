//! Confidence gating of classifier output.

use super::topk::Topk;
use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::domain::{BananaVariety, Decision, PredictionResult, ProbabilityVector};
use tracing::debug;

/// Turns a probability vector into an accept/reject [`Decision`].
///
/// A prediction is accepted only when the arg-max probability is strictly
/// greater than the threshold. The first maximum in label order wins ties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f32,
}

impl ConfidenceGate {
    /// Creates a gate with a validated threshold in `[0, 1)`.
    pub fn new(threshold: f32) -> Result<Self, ConfigError> {
        let gate = Self { threshold };
        gate.validate()?;
        Ok(gate)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Decides whether the probabilities name a variety.
    pub fn decide(&self, probabilities: ProbabilityVector) -> Decision {
        // A validated vector always has NUM_CLASSES entries, so argmax is defined.
        let Some((index, confidence)) = Topk::argmax(probabilities.as_slice()) else {
            return Decision::Rejected;
        };

        let label = match BananaVariety::from_index(index) {
            Some(label) if confidence > self.threshold => label,
            _ => {
                debug!(confidence, threshold = self.threshold, "prediction below threshold");
                return Decision::Rejected;
            }
        };

        Decision::Accepted(PredictionResult {
            label,
            index,
            confidence,
            probabilities,
        })
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl ConfigValidator for ConfidenceGate {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_confidence_threshold(self.threshold)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probs(values: [f32; 5]) -> ProbabilityVector {
        ProbabilityVector::try_from_slice(&values).unwrap()
    }

    #[test]
    fn test_accepts_above_threshold() {
        let gate = ConfidenceGate::default();
        let decision = gate.decide(probs([0.05, 0.03, 0.02, 0.85001, 0.04999]));

        let result = decision.prediction().unwrap();
        assert_eq!(result.label, BananaVariety::Kepok);
        assert_eq!(result.index, 3);
        assert_eq!(format!("{:.2}", result.confidence_percent()), "85.00");
    }

    #[test]
    fn test_exact_threshold_rejects() {
        let gate = ConfidenceGate::default();
        let decision = gate.decide(probs([0.85, 0.05, 0.05, 0.03, 0.02]));
        assert_eq!(decision, Decision::Rejected);
    }

    #[test]
    fn test_flat_distribution_rejects() {
        let gate = ConfidenceGate::default();
        let decision = gate.decide(probs([0.21, 0.20, 0.19, 0.20, 0.20]));
        assert_eq!(decision, Decision::Rejected);
        assert!(decision.prediction().is_none());
    }

    #[test]
    fn test_tie_uses_first_label() {
        let gate = ConfidenceGate::new(0.3).unwrap();
        let decision = gate.decide(probs([0.0, 0.45, 0.45, 0.1, 0.0]));
        assert_eq!(decision.prediction().unwrap().label, BananaVariety::Cavendish);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(ConfidenceGate::new(1.0).is_err());
        assert!(ConfidenceGate::new(f32::NAN).is_err());
        assert_eq!(ConfidenceGate::new(0.5).unwrap().threshold(), 0.5);
    }
}
