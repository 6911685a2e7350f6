use serde::{Deserialize, Serialize};

use crate::models::SimilarHeadline;

/// Raw label produced by a sentiment classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Signed polarity for a classifier confidence.
    pub fn polarity(self, confidence: f64) -> f64 {
        let confidence = confidence.clamp(0.0, 1.0);
        match self {
            SentimentLabel::Positive => confidence,
            SentimentLabel::Negative => -confidence,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Neutral => write!(f, "NEUTRAL"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
        }
    }
}

/// Five-tier market impact classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactCategory {
    StrongPositive,
    Positive,
    Neutral,
    Negative,
    StrongNegative,
}

impl ImpactCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactCategory::StrongPositive => "STRONG_POSITIVE",
            ImpactCategory::Positive => "POSITIVE",
            ImpactCategory::Neutral => "NEUTRAL",
            ImpactCategory::Negative => "NEGATIVE",
            ImpactCategory::StrongNegative => "STRONG_NEGATIVE",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ImpactCategory::StrongPositive => "Significant positive impact expected",
            ImpactCategory::Positive => "Moderate positive impact likely",
            ImpactCategory::Neutral => "No significant market impact expected",
            ImpactCategory::Negative => "Moderate negative impact likely",
            ImpactCategory::StrongNegative => "Significant negative impact expected",
        }
    }

    /// -1, 0 or +1
    pub fn direction(&self) -> i8 {
        match self {
            ImpactCategory::StrongPositive | ImpactCategory::Positive => 1,
            ImpactCategory::Neutral => 0,
            ImpactCategory::Negative | ImpactCategory::StrongNegative => -1,
        }
    }
}

impl std::fmt::Display for ImpactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the lexical relevance heuristic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelevanceAssessment {
    pub is_relevant: bool,
    pub score: f64, // 0.0 to 1.0
    pub reason: String,
}

/// Full result of analysing one headline against one ticker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub ticker: String,
    pub headline: String,
    pub category: ImpactCategory,
    pub polarity: f64,   // -1.0 to +1.0
    pub confidence: f64, // 0.0 to 1.0
    pub relevance_score: f64,
    pub is_relevant: bool,
    pub reason: String,
    pub raw_sentiment: SentimentLabel,
    /// Name of the model that produced the raw label
    pub model: String,
    pub impact: String,
    pub matched_headlines: Vec<SimilarHeadline>,
}
