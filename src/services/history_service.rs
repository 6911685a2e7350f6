use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Local;
use dashmap::DashMap;

use crate::models::{AnalysisResult, HistoryEntry};

/// Per-user analysis log, newest first and bounded in length.
#[derive(Clone)]
pub struct HistoryStore {
    entries: Arc<DashMap<String, VecDeque<HistoryEntry>>>,
    limit: usize,
}

impl HistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            limit: limit.max(1),
        }
    }

    /// Records an analysis for `user`, dropping the oldest entry past the limit.
    pub fn record(&self, user: &str, result: &AnalysisResult) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.push(user, HistoryEntry::from_analysis(result, timestamp));
    }

    pub fn push(&self, user: &str, entry: HistoryEntry) {
        let mut log = self.entries.entry(user.to_string()).or_default();
        log.push_front(entry);
        log.truncate(self.limit);
    }

    /// Entries for `user`, newest first.
    pub fn list(&self, user: &str) -> Vec<HistoryEntry> {
        self.entries
            .get(user)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self, user: &str) {
        self.entries.remove(user);
    }
}

/// History rows as CSV, in the order given.
pub fn history_to_csv(entries: &[HistoryEntry]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "timestamp",
        "ticker",
        "headline",
        "category",
        "polarity",
        "impact",
        "confidence",
        "relevance_score",
        "is_relevant",
    ])?;
    for e in entries {
        wtr.write_record([
            e.timestamp.clone(),
            e.ticker.clone(),
            e.headline.clone(),
            e.category.to_string(),
            format!("{:.4}", e.polarity),
            e.impact.clone(),
            format!("{:.4}", e.confidence),
            format!("{:.1}", e.relevance_score),
            e.is_relevant.to_string(),
        ])?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImpactCategory;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            timestamp: format!("2024-01-01 00:00:{:02}", n % 60),
            ticker: "TSLA".to_string(),
            headline: format!("Headline {}", n),
            category: ImpactCategory::Positive,
            polarity: 0.75,
            impact: ImpactCategory::Positive.description().to_string(),
            confidence: 0.75,
            relevance_score: 0.7,
            is_relevant: true,
        }
    }

    #[test]
    fn test_newest_first_and_bounded() {
        let store = HistoryStore::new(50);
        for n in 0..60 {
            store.push("admin", entry(n));
        }
        let log = store.list("admin");
        assert_eq!(log.len(), 50);
        assert_eq!(log[0].headline, "Headline 59");
        assert_eq!(log[49].headline, "Headline 10");
    }

    #[test]
    fn test_users_are_isolated_and_clearable() {
        let store = HistoryStore::new(5);
        store.push("admin", entry(1));
        store.push("guest", entry(2));

        store.clear("admin");
        assert!(store.list("admin").is_empty());
        assert_eq!(store.list("guest").len(), 1);
    }

    #[test]
    fn test_csv_export() {
        let mut e = entry(7);
        e.headline = "Tesla, Inc. beats".to_string();
        let csv = String::from_utf8(history_to_csv(&[e]).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "timestamp,ticker,headline,category,polarity,impact,confidence,relevance_score,is_relevant"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-01-01 00:00:07,TSLA,\"Tesla, Inc. beats\",POSITIVE,0.7500,Moderate positive impact likely,0.7500,0.7,true"
        );
    }
}
