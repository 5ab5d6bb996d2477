//! Prediction types produced by the banana classifier.

use super::labels::BananaVariety;
use crate::core::constants::{NUM_CLASSES, PROBABILITY_SUM_TOLERANCE};
use crate::core::errors::{BanaError, BanaResult};
use serde::Serialize;

/// The model's softmax output for one image, index-aligned with
/// [`BananaVariety::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProbabilityVector([f32; NUM_CLASSES]);

impl ProbabilityVector {
    /// Builds a probability vector from one row of model output.
    ///
    /// # Errors
    ///
    /// Returns [`BanaError::InvalidOutput`] if the row does not have exactly
    /// [`NUM_CLASSES`] entries, if any entry is not a finite value in `[0, 1]`,
    /// or if the entries do not sum to one within [`PROBABILITY_SUM_TOLERANCE`].
    pub fn try_from_slice(values: &[f32]) -> BanaResult<Self> {
        let probs: [f32; NUM_CLASSES] = values.try_into().map_err(|_| {
            BanaError::invalid_output(format!(
                "expected {NUM_CLASSES} probabilities, got {}",
                values.len()
            ))
        })?;

        if let Some((idx, value)) = probs
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || !(0.0..=1.0).contains(*v))
        {
            return Err(BanaError::invalid_output(format!(
                "probability at index {idx} is out of range: {value}"
            )));
        }

        let sum: f32 = probs.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(BanaError::invalid_output(format!(
                "probabilities sum to {sum}, expected 1.0"
            )));
        }

        Ok(Self(probs))
    }

    /// Returns the raw values in label order.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Returns the probability of one variety.
    pub fn get(&self, variety: BananaVariety) -> f32 {
        self.0[variety.index()]
    }

    /// Iterates over `(variety, probability)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (BananaVariety, f32)> + '_ {
        BananaVariety::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

/// An accepted classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// The predicted variety.
    pub label: BananaVariety,
    /// Arg-max index into the probability vector.
    pub index: usize,
    /// The winning probability.
    pub confidence: f32,
    /// The full vector, kept for the probability chart.
    pub probabilities: ProbabilityVector,
}

impl PredictionResult {
    /// Confidence expressed as a percentage.
    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

/// Terminal outcome of classifying one image.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The model is confident enough to name a variety.
    Accepted(PredictionResult),
    /// The image is probably not a banana. The probabilities are discarded.
    Rejected,
}

impl Decision {
    /// Returns true for an accepted prediction.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted(_))
    }

    /// Returns the accepted prediction, if any.
    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            Decision::Accepted(result) => Some(result),
            Decision::Rejected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_vector() {
        let v = ProbabilityVector::try_from_slice(&[0.05, 0.03, 0.02, 0.85001, 0.04999]).unwrap();
        assert_eq!(v.as_slice().len(), NUM_CLASSES);
        assert_eq!(v.get(BananaVariety::Kepok), 0.85001);
        let labels: Vec<_> = v.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, BananaVariety::ALL.to_vec());
    }

    #[test]
    fn test_wrong_length_is_invalid_output() {
        let err = ProbabilityVector::try_from_slice(&[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, BanaError::InvalidOutput { .. }));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(ProbabilityVector::try_from_slice(&[1.2, -0.2, 0.0, 0.0, 0.0]).is_err());
        assert!(ProbabilityVector::try_from_slice(&[f32::NAN, 0.25, 0.25, 0.25, 0.25]).is_err());
    }

    #[test]
    fn test_sum_must_be_close_to_one() {
        assert!(ProbabilityVector::try_from_slice(&[0.1, 0.1, 0.1, 0.1, 0.1]).is_err());
        assert!(ProbabilityVector::try_from_slice(&[0.2, 0.2, 0.2, 0.2, 0.2005]).is_ok());
    }

    #[test]
    fn test_decision_accessors() {
        let probabilities =
            ProbabilityVector::try_from_slice(&[0.9, 0.025, 0.025, 0.025, 0.025]).unwrap();
        let accepted = Decision::Accepted(PredictionResult {
            label: BananaVariety::Ambon,
            index: 0,
            confidence: 0.9,
            probabilities,
        });
        assert!(accepted.is_accepted());
        assert_eq!(accepted.prediction().map(|p| p.label), Some(BananaVariety::Ambon));

        let rejected = Decision::Rejected;
        assert!(!rejected.is_accepted());
        assert!(rejected.prediction().is_none());
    }

    #[test]
    fn test_vector_serializes_as_array() {
        let v = ProbabilityVector::try_from_slice(&[1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,0.0,0.0,0.0,0.0]");
    }
}
