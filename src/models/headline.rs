use serde::{Deserialize, Serialize};

/// A historical headline loaded from the news CSV
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadlineRecord {
    pub date: String,
    pub headline: String,
    /// Precomputed polarity, -1.0 to +1.0
    pub sentiment: f64,
}

/// A historical headline matched against a query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarHeadline {
    pub date: String,
    pub headline: String,
    pub sentiment: f64,
    pub similarity: f64, // 0.0 to 1.0
}

impl SimilarHeadline {
    pub fn from_record(record: &HeadlineRecord, similarity: f64) -> Self {
        Self {
            date: record.date.clone(),
            headline: record.headline.clone(),
            sentiment: record.sentiment,
            similarity,
        }
    }
}

/// Query parameters for the similar-headlines lookup
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarHeadlinesQuery {
    pub headline: String,
    pub top_n: Option<usize>,
}
