use serde::{Deserialize, Serialize};

use crate::models::{AnalysisResult, ImpactCategory};

/// One row of a user's analysis history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: String, // %Y-%m-%d %H:%M:%S
    pub ticker: String,
    pub headline: String,
    pub category: ImpactCategory,
    pub polarity: f64,
    pub impact: String,
    pub confidence: f64,
    pub relevance_score: f64,
    pub is_relevant: bool,
}

impl HistoryEntry {
    pub fn from_analysis(result: &AnalysisResult, timestamp: String) -> Self {
        Self {
            timestamp,
            ticker: result.ticker.clone(),
            headline: result.headline.clone(),
            category: result.category,
            polarity: result.polarity,
            impact: result.impact.clone(),
            confidence: result.confidence,
            relevance_score: result.relevance_score,
            is_relevant: result.is_relevant,
        }
    }
}
