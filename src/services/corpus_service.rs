use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use csv::{ReaderBuilder, StringRecord};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::external::sentiment_model::SentimentModel;
use crate::models::{HeadlineRecord, SentimentLabel};

const HEADLINE_COLUMNS: &[&str] = &[
    "Headline", "headline", "HEADLINE", "Title", "title", "TITLE", "News", "news", "NEWS", "Text",
    "text", "TEXT", "Description", "description", "DESCRIPTION", "Article", "article",
];

const DATE_COLUMNS: &[&str] = &[
    "Date", "date", "DATE", "Time", "time", "Timestamp", "timestamp", "Published", "published",
];

const SENTIMENT_COLUMN: &str = "sentiment";

pub const SCORING_BATCH_SIZE: usize = 32;
const CONCURRENT_BATCHES: usize = 4;

/// Stand-in text for blank headlines so every row gets a score
const BLANK_HEADLINE: &str = "neutral news";

/// Rows read from the corpus file before any scoring
#[derive(Debug, Clone, PartialEq)]
pub struct RawCorpus {
    pub dates: Vec<String>,
    pub headlines: Vec<String>,
    /// Present when the file already carries a sentiment column
    pub sentiments: Option<Vec<f64>>,
}

/// Loads the historical headline CSV and makes sure every row has a polarity.
pub async fn load_corpus(path: &Path, model: &dyn SentimentModel) -> Result<Vec<HeadlineRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open headline corpus {}", path.display()))?;
    let raw = read_corpus(file)
        .with_context(|| format!("Failed to read headline corpus {}", path.display()))?;

    let sentiments = match raw.sentiments {
        Some(existing) => {
            info!("Using precomputed sentiment column for {} headlines", existing.len());
            existing
        }
        None => {
            info!(
                "Scoring {} headlines with {} in batches of {}",
                raw.headlines.len(),
                model.name(),
                SCORING_BATCH_SIZE
            );
            score_headlines(model, &raw.headlines).await
        }
    };

    let records: Vec<HeadlineRecord> = raw
        .dates
        .into_iter()
        .zip(raw.headlines)
        .zip(sentiments)
        .map(|((date, headline), sentiment)| HeadlineRecord {
            date,
            headline,
            sentiment,
        })
        .collect();

    info!("Loaded {} historical headlines from {}", records.len(), path.display());
    Ok(records)
}

/// Parses corpus CSV content, detecting the headline, date and sentiment columns.
pub fn read_corpus<R: Read>(reader: R) -> Result<RawCorpus> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("Missing CSV header row")?.clone();
    let rows: Vec<StringRecord> = rdr
        .records()
        .collect::<std::result::Result<_, _>>()
        .context("Malformed CSV row")?;

    let headline_idx = match find_column(&headers, HEADLINE_COLUMNS) {
        Some(idx) => {
            info!("Using column '{}' as headline", &headers[idx]);
            idx
        }
        None => match first_text_column(&headers, &rows) {
            Some(idx) => {
                warn!("No standard headline column found, using '{}'", &headers[idx]);
                idx
            }
            None => bail!(
                "Could not find a headline column. Available columns: {:?}",
                headers.iter().collect::<Vec<_>>()
            ),
        },
    };

    let date_idx = find_column(&headers, DATE_COLUMNS);
    let today = Utc::now().format("%Y-%m-%d").to_string();
    if date_idx.is_none() {
        warn!("No date column found, using {} as placeholder date", today);
    }

    let sentiment_idx = headers.iter().position(|h| h == SENTIMENT_COLUMN);

    let field = |row: &StringRecord, idx: usize| row.get(idx).unwrap_or("").trim().to_string();

    let headlines = rows.iter().map(|r| field(r, headline_idx)).collect();
    let dates = rows
        .iter()
        .map(|r| match date_idx {
            Some(idx) => field(r, idx),
            None => today.clone(),
        })
        .collect();
    let sentiments = sentiment_idx.map(|idx| {
        rows.iter()
            .map(|r| field(r, idx).parse::<f64>().unwrap_or(0.0).clamp(-1.0, 1.0))
            .collect()
    });

    Ok(RawCorpus {
        dates,
        headlines,
        sentiments,
    })
}

fn find_column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
}

/// First column holding at least one non-numeric value.
fn first_text_column(headers: &StringRecord, rows: &[StringRecord]) -> Option<usize> {
    (0..headers.len()).find(|&idx| {
        rows.iter().any(|r| {
            let value = r.get(idx).unwrap_or("").trim();
            !value.is_empty() && value.parse::<f64>().is_err()
        })
    })
}

/// Signed polarity for each headline, in input order.
///
/// Batches are scored concurrently; a batch whose classification fails
/// contributes 0.0 for each of its headlines.
pub async fn score_headlines(model: &dyn SentimentModel, headlines: &[String]) -> Vec<f64> {
    let inputs: Vec<String> = headlines
        .iter()
        .map(|h| {
            if h.trim().is_empty() {
                BLANK_HEADLINE.to_string()
            } else {
                h.clone()
            }
        })
        .collect();

    let batches: Vec<Vec<f64>> = stream::iter(inputs.chunks(SCORING_BATCH_SIZE).enumerate())
        .map(|(n, batch)| async move {
            match model.classify_batch(batch).await {
                Ok(results) if results.len() == batch.len() => results
                    .into_iter()
                    .map(|c| match c.label {
                        SentimentLabel::Positive => c.confidence,
                        _ => -c.confidence,
                    })
                    .collect(),
                Ok(results) => {
                    warn!(
                        "Batch {} returned {} scores for {} headlines, using 0.0",
                        n,
                        results.len(),
                        batch.len()
                    );
                    vec![0.0; batch.len()]
                }
                Err(e) => {
                    warn!("Error scoring batch {}: {}", n, e);
                    vec![0.0; batch.len()]
                }
            }
        })
        .buffered(CONCURRENT_BATCHES)
        .collect()
        .await;

    batches.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::lexicon::LexiconModel;
    use crate::external::sentiment_model::{Classification, ModelError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_detects_standard_columns() {
        let csv = "Date,Title,Source\n2024-01-02,Apple beats estimates,Wire\n2024-01-03,Oil slides,Desk\n";
        let raw = read_corpus(csv.as_bytes()).unwrap();
        assert_eq!(raw.headlines, vec!["Apple beats estimates", "Oil slides"]);
        assert_eq!(raw.dates, vec!["2024-01-02", "2024-01-03"]);
        assert!(raw.sentiments.is_none());
    }

    #[test]
    fn test_headline_name_beats_earlier_candidates() {
        let csv = "text,headline\nbody one,Headline one\n";
        let raw = read_corpus(csv.as_bytes()).unwrap();
        assert_eq!(raw.headlines, vec!["Headline one"]);
    }

    #[test]
    fn test_falls_back_to_first_text_column() {
        let csv = "id,body\n1,Markets rally\n2,Bonds slip\n";
        let raw = read_corpus(csv.as_bytes()).unwrap();
        assert_eq!(raw.headlines, vec!["Markets rally", "Bonds slip"]);
        let today = Utc::now().format("%Y-%m-%d").to_string();
        assert!(raw.dates.iter().all(|d| *d == today));
    }

    #[test]
    fn test_numeric_only_file_is_rejected() {
        let csv = "a,b\n1,2\n3,4\n";
        assert!(read_corpus(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_existing_sentiment_column_is_reused() {
        let csv = "Date,Headline,sentiment\n2024-01-02,Apple beats,0.8\n2024-01-03,Oil slides,oops\n";
        let raw = read_corpus(csv.as_bytes()).unwrap();
        assert_eq!(raw.sentiments, Some(vec![0.8, 0.0]));
    }

    struct CountingModel {
        calls: AtomicUsize,
        fail_batch: usize,
    }

    #[async_trait]
    impl SentimentModel for CountingModel {
        fn name(&self) -> &str {
            "counting"
        }

        async fn classify(&self, _text: &str) -> Result<Classification, ModelError> {
            Ok(Classification::new(SentimentLabel::Negative, 0.75))
        }

        async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>, ModelError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n == self.fail_batch {
                return Err(ModelError::Network("timeout".to_string()));
            }
            Ok(texts
                .iter()
                .map(|_| Classification::new(SentimentLabel::Negative, 0.75))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_scores_in_batches_and_zeroes_failed_batch() {
        let model = CountingModel {
            calls: AtomicUsize::new(0),
            fail_batch: 1,
        };
        let headlines: Vec<String> = (0..70).map(|i| format!("headline {}", i)).collect();
        let scores = score_headlines(&model, &headlines).await;

        assert_eq!(scores.len(), 70);
        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
        let zeroes = scores.iter().filter(|s| **s == 0.0).count();
        let negatives = scores.iter().filter(|s| **s == -0.75).count();
        // One of the two full batches failed
        assert!(zeroes == 32 && negatives == 38 || zeroes == 6 && negatives == 64);
    }

    #[tokio::test]
    async fn test_blank_headline_gets_a_score() {
        let model = LexiconModel::binary();
        let scores = score_headlines(&model, &["".to_string(), "Shares surge".to_string()]).await;
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], 0.5);
        assert!(scores[1] > 0.5);
    }

    #[tokio::test]
    async fn test_load_corpus_missing_file() {
        let model = LexiconModel::binary();
        let err = load_corpus(Path::new("/nonexistent/news.csv"), &model).await.unwrap_err();
        assert!(err.to_string().contains("Failed to open headline corpus"));
    }
}
