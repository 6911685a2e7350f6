//! Offline lexicon classifier.
//!
//! Counts finance-flavoured positive and negative terms, flipping a term's
//! sign when a negator appears within the three preceding tokens. Used for
//! both the primary and fallback models when no inference token is configured.

use async_trait::async_trait;

use crate::external::sentiment_model::{Classification, ModelError, SentimentModel};
use crate::models::SentimentLabel;

const POSITIVE_TERMS: &[&str] = &[
    "approval", "approved", "beat", "beats", "boost", "boosts", "breakthrough", "bullish",
    "climbs", "exceed", "exceeds", "expands", "expansion", "gain", "gains", "grow", "grows",
    "growth", "higher", "improve", "improved", "improves", "innovative", "jump", "jumps",
    "optimistic", "outperform", "outperforms", "profit", "profitable", "promising", "rally",
    "rallies", "rebound", "record", "rise", "rises", "robust", "soar", "soars", "strong",
    "stronger", "success", "successful", "surge", "surges", "tops", "upgrade", "upgraded",
    "win", "wins",
];

const NEGATIVE_TERMS: &[&str] = &[
    "bankruptcy", "bearish", "collapse", "concern", "concerns", "crash", "crashes", "decline",
    "declines", "default", "deficit", "delay", "delayed", "disappointing", "downgrade",
    "downgraded", "drop", "drops", "fall", "falls", "fraud", "halt", "halted", "investigation",
    "lawsuit", "layoffs", "loss", "losses", "lower", "miss", "misses", "plunge", "plunges",
    "probe", "recall", "recalls", "scandal", "sink", "sinks", "slump", "slumps", "struggles",
    "tumble", "tumbles", "warning", "warns", "weak", "weaker",
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "without", "cannot", "isn't", "wasn't", "aren't", "won't", "can't",
    "didn't", "doesn't",
];

const NEUTRAL_CONFIDENCE: f64 = 0.75;

#[derive(Debug, Clone)]
pub struct LexiconModel {
    name: String,
    /// Two-class models never answer neutral
    allow_neutral: bool,
}

impl LexiconModel {
    /// Three-class variant (positive / negative / neutral).
    pub fn ternary() -> Self {
        Self {
            name: "lexicon-ternary".to_string(),
            allow_neutral: true,
        }
    }

    /// Two-class variant (positive / negative).
    pub fn binary() -> Self {
        Self {
            name: "lexicon-binary".to_string(),
            allow_neutral: false,
        }
    }

    /// Net signed score and number of sentiment-bearing hits.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score = 0;
        let mut hits = 0;

        for (i, token) in tokens.iter().enumerate() {
            let base = if POSITIVE_TERMS.contains(&token.as_str()) {
                1
            } else if NEGATIVE_TERMS.contains(&token.as_str()) {
                -1
            } else {
                continue;
            };

            let negated = (1..=3).any(|k| i >= k && NEGATORS.contains(&tokens[i - k].as_str()));
            score += if negated { -base } else { base };
            hits += 1;
        }

        (score, hits)
    }

    fn classify_text(&self, text: &str) -> Classification {
        let (score, hits) = self.score_text(text);

        if score == 0 {
            return if self.allow_neutral {
                let confidence = if hits == 0 { NEUTRAL_CONFIDENCE } else { 0.5 };
                Classification::new(SentimentLabel::Neutral, confidence)
            } else {
                Classification::new(SentimentLabel::Positive, 0.5)
            };
        }

        let net = score.unsigned_abs() as f64;
        let dominance = net / hits.max(1) as f64;
        let strength = 1.0 - 0.5_f64.powf(net);
        let confidence = 0.5 + 0.45 * dominance * strength;

        let label = if score > 0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        };
        Classification::new(label, confidence)
    }
}

fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[async_trait]
impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, text: &str) -> Result<Classification, ModelError> {
        Ok(self.classify_text(text))
    }
}
