use tracing::debug;

use crate::models::{HeadlineRecord, SimilarHeadline};
use crate::services::tfidf::{cosine, TfidfVectorizer};

/// Finds the `top_n` corpus headlines closest to `query` by TF-IDF cosine similarity.
///
/// The vectorizer is fitted over the corpus plus the query. Results are sorted
/// by similarity descending; equal scores keep their corpus order. An empty
/// corpus or a vocabulary that ends up empty yields no matches.
pub fn find_similar(corpus: &[HeadlineRecord], query: &str, top_n: usize) -> Vec<SimilarHeadline> {
    if corpus.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let mut docs: Vec<&str> = corpus.iter().map(|r| r.headline.as_str()).collect();
    docs.push(query);

    let matrix = TfidfVectorizer::default().fit_transform(&docs);
    if matrix.is_empty() {
        debug!("No shared vocabulary for similarity lookup");
        return Vec::new();
    }

    let (query_row, corpus_rows) = match matrix.rows.split_last() {
        Some(split) => split,
        None => return Vec::new(),
    };

    let mut scored: Vec<(usize, f64)> = corpus_rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i, cosine(query_row, row)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    debug!(
        "Similarity lookup over {} headlines, vocabulary {}",
        corpus.len(),
        matrix.vocabulary.len()
    );

    scored
        .into_iter()
        .take(top_n)
        .map(|(i, similarity)| SimilarHeadline::from_record(&corpus[i], similarity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, headline: &str, sentiment: f64) -> HeadlineRecord {
        HeadlineRecord {
            date: date.to_string(),
            headline: headline.to_string(),
            sentiment,
        }
    }

    fn corpus() -> Vec<HeadlineRecord> {
        vec![
            record("2024-01-02", "Bank raises interest outlook for lenders", 0.2),
            record("2024-01-03", "Tesla battery breakthrough cuts costs", 0.9),
            record("2024-01-04", "Oil prices slide on supply glut", -0.6),
            record("2024-01-05", "Tesla recalls vehicles over battery fault", -0.8),
            record("2024-01-06", "Retail sales steady in December", 0.1),
        ]
    }

    #[test]
    fn test_most_similar_headline_ranks_first() {
        let results = find_similar(&corpus(), "Tesla battery breakthrough promises lower costs", 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].headline, "Tesla battery breakthrough cuts costs");
        assert_eq!(results[0].date, "2024-01-03");
        assert_eq!(results[0].sentiment, 0.9);
        assert_eq!(results[1].headline, "Tesla recalls vehicles over battery fault");
    }

    #[test]
    fn test_results_bounded_sorted_and_in_range() {
        let corpus = corpus();
        for top_n in [1, 3, 5, 10] {
            let results = find_similar(&corpus, "Tesla battery news", top_n);
            assert_eq!(results.len(), top_n.min(corpus.len()));
            assert!(results.windows(2).all(|w| w[0].similarity >= w[1].similarity));
            assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.similarity)));
        }
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let results = find_similar(&corpus(), "Tesla", 5);
        // Both Tesla headlines have a positive score; the rest tie at zero
        let zero: Vec<&str> = results
            .iter()
            .filter(|r| r.similarity == 0.0)
            .map(|r| r.date.as_str())
            .collect();
        assert_eq!(zero, vec!["2024-01-02", "2024-01-04", "2024-01-06"]);
    }

    #[test]
    fn test_empty_corpus_returns_nothing() {
        assert!(find_similar(&[], "Tesla battery", 5).is_empty());
    }

    #[test]
    fn test_no_shared_vocabulary_returns_nothing() {
        let corpus = vec![record("2024-01-02", "Alpha beta", 0.0)];
        assert!(find_similar(&corpus, "Gamma delta", 5).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let corpus = corpus();
        let a = find_similar(&corpus, "Tesla recalls", 5);
        let b = find_similar(&corpus, "Tesla recalls", 5);
        assert_eq!(a, b);
    }
}
