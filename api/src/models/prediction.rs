use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub message: String,
    pub prediction: f32,
    pub is_spam: bool,
    pub classification: String,
}

impl Prediction {
    /// Scores above 0.5 are spam.
    pub fn from_score(message: impl Into<String>, score: f32) -> Self {
        let is_spam = score > 0.5;
        Self {
            message: message.into(),
            prediction: score,
            is_spam,
            classification: if is_spam { "Spam" } else { "Ham" }.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictions {
    pub results: Vec<Prediction>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub tokenizer_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strictly_greater_than_half() {
        let p = Prediction::from_score("hi", 0.5);
        assert!(!p.is_spam);
        assert_eq!(p.classification, "Ham");

        let p = Prediction::from_score("win", 0.5001);
        assert!(p.is_spam);
        assert_eq!(p.classification, "Spam");
    }

    #[test]
    fn message_is_echoed_unchanged() {
        let p = Prediction::from_score("Call 0800 NOW!", 0.9);
        assert_eq!(p.message, "Call 0800 NOW!");
        assert_eq!(p.prediction, 0.9);
    }
}
