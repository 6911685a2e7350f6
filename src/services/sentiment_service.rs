use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ScoringStrategy;
use crate::errors::AppError;
use crate::external::sentiment_model::{Classification, SentimentModel};
use crate::models::{AnalysisResult, HeadlineRecord, ImpactCategory, RelevanceAssessment, SentimentLabel};
use crate::services::relevance_service::check_relevance;
use crate::services::similarity_service::find_similar;

/// Below this classifier confidence a headline carries no signal
const MIN_CONFIDENCE: f64 = 0.6;
const STRONG_CONFIDENCE: f64 = 0.85;
const STRONG_RELEVANCE: f64 = 0.7;

/// Loaded classifiers and the pre-scored corpus, built once at startup.
pub struct AnalysisContext {
    /// Three-class financial model
    pub primary: Arc<dyn SentimentModel>,
    /// Two-class model, also used to pre-score the corpus
    pub fallback: Arc<dyn SentimentModel>,
    pub corpus: Arc<Vec<HeadlineRecord>>,
    pub strategy: ScoringStrategy,
    pub similar_limit: usize,
}

/// Upper-cased, trimmed ticker symbol.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Scores `headline` against `ticker` and attaches the closest historical headlines.
pub async fn analyze(
    ctx: &AnalysisContext,
    headline: &str,
    ticker: &str,
) -> Result<AnalysisResult, AppError> {
    let headline = headline.trim();
    if headline.is_empty() {
        return Err(AppError::Validation(
            "Please enter a headline to simulate.".to_string(),
        ));
    }

    let ticker = normalize_ticker(ticker);
    if ticker.is_empty() {
        return Err(AppError::Validation("Please enter a ticker symbol.".to_string()));
    }

    let relevance = check_relevance(headline, &ticker);
    let (classification, model) = classify(ctx, headline).await?;
    let (category, polarity, reason) = categorize(&classification, &relevance, &ticker);

    debug!(
        "{} / {}: {} via {} (relevance {:.1})",
        ticker, headline, category, model, relevance.score
    );

    let matched_headlines = find_similar(&ctx.corpus, headline, ctx.similar_limit);

    Ok(AnalysisResult {
        ticker,
        headline: headline.to_string(),
        category,
        polarity,
        confidence: classification.confidence,
        relevance_score: relevance.score,
        is_relevant: relevance.is_relevant,
        reason,
        raw_sentiment: classification.label,
        model,
        impact: category.description().to_string(),
        matched_headlines,
    })
}

/// Runs the configured classifier chain; returns the label and the model that produced it.
async fn classify(
    ctx: &AnalysisContext,
    headline: &str,
) -> Result<(Classification, String), AppError> {
    if ctx.strategy == ScoringStrategy::Enhanced {
        match ctx.primary.classify(headline).await {
            Ok(c) => return Ok((c, ctx.primary.name().to_string())),
            Err(e) => warn!(
                "Primary model {} failed, falling back to {}: {}",
                ctx.primary.name(),
                ctx.fallback.name(),
                e
            ),
        }
    }

    let c = ctx.fallback.classify(headline).await?;
    Ok((as_binary(c), ctx.fallback.name().to_string()))
}

/// Two-class reading of a label: anything that is not positive is negative.
fn as_binary(c: Classification) -> Classification {
    match c.label {
        SentimentLabel::Positive => c,
        _ => Classification::new(SentimentLabel::Negative, c.confidence),
    }
}

/// Maps a classifier output and relevance assessment to an impact category,
/// a polarity and a human-readable reason.
pub fn categorize(
    c: &Classification,
    relevance: &RelevanceAssessment,
    ticker: &str,
) -> (ImpactCategory, f64, String) {
    if !relevance.is_relevant {
        return (
            ImpactCategory::Neutral,
            0.0,
            format!("News not relevant to {}. {}", ticker, relevance.reason),
        );
    }

    if c.confidence < MIN_CONFIDENCE {
        return (
            ImpactCategory::Neutral,
            0.0,
            format!(
                "Low confidence ({:.2}). Insufficient signal for prediction.",
                c.confidence
            ),
        );
    }

    let strong = c.confidence >= STRONG_CONFIDENCE && relevance.score >= STRONG_RELEVANCE;

    match c.label {
        SentimentLabel::Positive => (
            if strong {
                ImpactCategory::StrongPositive
            } else {
                ImpactCategory::Positive
            },
            c.polarity(),
            format!("Positive sentiment detected with {:.2} confidence", c.confidence),
        ),
        SentimentLabel::Negative => (
            if strong {
                ImpactCategory::StrongNegative
            } else {
                ImpactCategory::Negative
            },
            c.polarity(),
            format!("Negative sentiment detected with {:.2} confidence", c.confidence),
        ),
        SentimentLabel::Neutral => (
            ImpactCategory::Neutral,
            0.0,
            "Neutral sentiment detected".to_string(),
        ),
    }
}
