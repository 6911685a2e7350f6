use async_trait::async_trait;
use thiserror::Error;

use crate::models::SentimentLabel;

/// Label and confidence returned by a classifier for one text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    pub confidence: f64, // 0.0 to 1.0
}

impl Classification {
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn polarity(&self) -> f64 {
        self.label.polarity(self.confidence)
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("model is loading, retry in {0:.0}s")]
    Loading(f64),
}

/// A pretrained sentiment classifier treated as a black box
#[async_trait]
pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> Result<Classification, ModelError>;

    /// Classifies several texts; results are in input order.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>, ModelError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.classify(text).await?);
        }
        Ok(out)
    }
}
