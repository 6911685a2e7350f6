//! Bag-of-words TF-IDF vectorizer for short headlines.
//!
//! Tokens are runs of two or more word characters, lowercased, with English
//! stop words removed before unigrams and bigrams are formed. Rows are
//! L2-normalised so the dot product of two rows is their cosine similarity.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;

use crate::services::stopwords::is_stop_word;

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Sparse row: (term index, weight), sorted by term index
pub type SparseRow = Vec<(usize, f64)>;

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    token_re: Regex,
    min_df: usize,
    max_features: usize,
}

/// Vocabulary and document rows produced by [`TfidfVectorizer::fit_transform`].
#[derive(Debug, Clone, Default)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<SparseRow>,
}

impl TfidfMatrix {
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(2, 5000)
    }
}

impl TfidfVectorizer {
    pub fn new(min_df: usize, max_features: usize) -> Self {
        Self {
            token_re: Regex::new(TOKEN_PATTERN).expect("token pattern is valid"),
            min_df: min_df.max(1),
            max_features,
        }
    }

    /// Unigrams and bigrams of one document, in order of appearance.
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let lowered = doc.to_lowercase();
        let tokens: Vec<&str> = self
            .token_re
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !is_stop_word(t))
            .collect();

        let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        terms.extend(tokens.windows(2).map(|w| format!("{} {}", w[0], w[1])));
        terms
    }

    /// Learns the vocabulary and idf weights from `docs` and returns their rows.
    pub fn fit_transform(&self, docs: &[&str]) -> TfidfMatrix {
        let analyzed: Vec<Vec<String>> = docs.iter().map(|d| self.analyze(d)).collect();

        // term -> (document frequency, total count)
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for terms in &analyzed {
            let mut seen = HashSet::new();
            for term in terms {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.1 += 1;
                if seen.insert(term.as_str()) {
                    entry.0 += 1;
                }
            }
        }

        let mut kept: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .filter(|(_, (df, _))| *df >= self.min_df)
            .map(|(term, (df, total))| (term, df, total))
            .collect();

        if kept.len() > self.max_features {
            // Stable sort keeps alphabetical order among equal counts
            kept.sort_by(|a, b| b.2.cmp(&a.2));
            kept.truncate(self.max_features);
            kept.sort_by(|a, b| a.0.cmp(b.0));
        }

        if kept.is_empty() {
            return TfidfMatrix {
                vocabulary: Vec::new(),
                rows: vec![Vec::new(); docs.len()],
            };
        }

        let n_docs = docs.len() as f64;
        let index: HashMap<&str, usize> =
            kept.iter().enumerate().map(|(i, (term, _, _))| (*term, i)).collect();
        let idf: Vec<f64> = kept
            .iter()
            .map(|(_, df, _)| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let rows = analyzed
            .iter()
            .map(|terms| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for term in terms {
                    if let Some(&i) = index.get(term.as_str()) {
                        *counts.entry(i).or_insert(0.0) += 1.0;
                    }
                }
                let mut row: SparseRow = counts.into_iter().map(|(i, c)| (i, c * idf[i])).collect();
                l2_normalize(&mut row);
                row
            })
            .collect();

        TfidfMatrix {
            vocabulary: kept.into_iter().map(|(term, _, _)| term.to_string()).collect(),
            rows,
        }
    }
}

fn l2_normalize(row: &mut SparseRow) {
    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in row.iter_mut() {
            *w /= norm;
        }
    }
}

/// Dot product of two L2-normalised rows, clamped to [0, 1].
pub fn cosine(a: &SparseRow, b: &SparseRow) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}
