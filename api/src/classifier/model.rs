use std::path::Path;

use serde::Deserialize;

use super::{ClassifierError, LoadError};

fn default_sequence_length() -> usize {
    100
}

/// Embedding + global average pooling + dense sigmoid head.
///
/// Row 0 of the embedding table is the padding row; padded positions still
/// take part in the average, matching how the network was trained.
#[derive(Debug, Clone, Deserialize)]
pub struct SequenceModel {
    #[serde(default = "default_sequence_length")]
    sequence_length: usize,
    embedding: Vec<Vec<f32>>,
    dense_weights: Vec<f32>,
    dense_bias: f32,
}

impl SequenceModel {
    #[cfg(test)]
    pub(crate) fn new(
        sequence_length: usize,
        embedding: Vec<Vec<f32>>,
        dense_weights: Vec<f32>,
        dense_bias: f32,
    ) -> Result<Self, LoadError> {
        let model = Self {
            sequence_length,
            embedding,
            dense_weights,
            dense_bias,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&raw)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.sequence_length == 0 {
            return Err(LoadError::Shape("sequence_length must be positive".into()));
        }
        if self.embedding.is_empty() {
            return Err(LoadError::Shape("embedding table is empty".into()));
        }
        let dim = self.dense_weights.len();
        if let Some(row) = self.embedding.iter().position(|r| r.len() != dim) {
            return Err(LoadError::Shape(format!(
                "embedding row {} has {} columns, dense layer expects {}",
                row,
                self.embedding[row].len(),
                dim
            )));
        }
        Ok(())
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Scores one padded sequence.
    pub fn predict(&self, sequence: &[u32]) -> Result<f32, ClassifierError> {
        if sequence.len() != self.sequence_length {
            return Err(ClassifierError::Inference(format!(
                "expected {} tokens, got {}",
                self.sequence_length,
                sequence.len()
            )));
        }

        let dim = self.dense_weights.len();
        let mut pooled = vec![0.0f32; dim];
        for &index in sequence {
            let row = self.embedding.get(index as usize).ok_or_else(|| {
                ClassifierError::Inference(format!(
                    "token index {} outside embedding table of {} rows",
                    index,
                    self.embedding.len()
                ))
            })?;
            for (acc, v) in pooled.iter_mut().zip(row) {
                *acc += v;
            }
        }

        let n = sequence.len() as f32;
        let logit = pooled
            .iter()
            .zip(&self.dense_weights)
            .map(|(p, w)| (p / n) * w)
            .sum::<f32>()
            + self.dense_bias;

        let score = 1.0 / (1.0 + (-logit).exp());
        if !score.is_finite() {
            return Err(ClassifierError::Inference("model produced a non-finite score".into()));
        }
        Ok(score)
    }
}
