//! Top-k classification result processing.

use crate::core::BanaError;

/// Result structure for top-k classification processing.
///
/// Contains the top-k class indexes and their corresponding confidence scores
/// for each prediction in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TopkResult {
    /// The top-k class indexes of each prediction, best first.
    pub indexes: Vec<Vec<usize>>,
    /// The scores matching `indexes`.
    pub scores: Vec<Vec<f32>>,
    /// Class names matching `indexes`, when a name table was provided.
    pub class_names: Option<Vec<Vec<String>>>,
}

/// A processor for extracting top-k results from classification outputs.
///
/// Ranking is stable: classes with equal scores keep their label order, so the
/// first maximum wins a tie.
#[derive(Debug, Clone, Default)]
pub struct Topk {
    /// Class names where index = class ID.
    class_names: Option<Vec<String>>,
}

impl Topk {
    /// Creates a new Topk processor without class name mapping.
    pub fn without_class_names() -> Self {
        Self { class_names: None }
    }

    /// Creates a new Topk processor with class names from a vector.
    ///
    /// The vector index corresponds to the class ID.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use banaclass::processors::Topk;
    ///
    /// let topk = Topk::from_class_names(vec!["ambon".to_string(), "kepok".to_string()]);
    /// let result = topk.process_single(&[0.3, 0.7], 1).unwrap();
    /// assert_eq!(result.class_names.unwrap()[0], vec!["kepok"]);
    /// ```
    pub fn from_class_names(class_names: Vec<String>) -> Self {
        Self {
            class_names: Some(class_names),
        }
    }

    /// Returns the index and value of the largest score.
    ///
    /// The first maximum in index order wins ties. Returns `None` for an empty
    /// slice.
    pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
        scores
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (idx, score)| match best {
                Some((_, best_score)) if score <= best_score => best,
                _ => Some((idx, score)),
            })
    }

    /// Processes classification outputs to extract top-k results.
    ///
    /// # Arguments
    ///
    /// * `predictions` - One score vector per image.
    /// * `k` - Number of top predictions to extract (must be > 0).
    pub fn process(&self, predictions: &[Vec<f32>], k: usize) -> Result<TopkResult, BanaError> {
        if k == 0 {
            return Err(BanaError::invalid_input("k must be greater than 0"));
        }

        let mut all_indexes = Vec::with_capacity(predictions.len());
        let mut all_scores = Vec::with_capacity(predictions.len());

        for prediction in predictions {
            if prediction.is_empty() {
                return Err(BanaError::invalid_output("Empty prediction vector"));
            }

            let (top_indexes, top_scores) =
                Self::extract_topk_from_prediction(prediction, k.min(prediction.len()));
            all_indexes.push(top_indexes);
            all_scores.push(top_scores);
        }

        let class_names = self.class_names.as_ref().map(|names| {
            all_indexes
                .iter()
                .map(|ids| {
                    ids.iter()
                        .map(|&idx| {
                            names
                                .get(idx)
                                .cloned()
                                .unwrap_or_else(|| format!("Unknown({idx})"))
                        })
                        .collect()
                })
                .collect()
        });

        Ok(TopkResult {
            indexes: all_indexes,
            scores: all_scores,
            class_names,
        })
    }

    /// Processes a single prediction vector.
    pub fn process_single(&self, prediction: &[f32], k: usize) -> Result<TopkResult, BanaError> {
        self.process(&[prediction.to_vec()], k)
    }

    fn extract_topk_from_prediction(prediction: &[f32], k: usize) -> (Vec<usize>, Vec<f32>) {
        let mut indexed_scores: Vec<(usize, f32)> =
            prediction.iter().copied().enumerate().collect();

        // sort_by is stable, which keeps label order among equal scores
        indexed_scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        indexed_scores.into_iter().take(k).unzip()
    }
}
