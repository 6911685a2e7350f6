use crate::models::{AnalysisResult, ImpactCategory, Recommendation, RecommendationAction, TechnicalSummary};

const HIGH_CONFIDENCE: f64 = 0.85;
const MOMENTUM_THRESHOLD_PCT: f64 = 5.0;
const MAX_SCORE: i32 = 6;

pub const DISCLAIMER: &str =
    "This is automated analysis and not financial advice. Always conduct your own research.";

/// Combines the headline's impact with recent price action into a trading call.
///
/// Only relevant, non-neutral headlines get a recommendation.
pub fn recommend(analysis: &AnalysisResult, technical: &TechnicalSummary) -> Option<Recommendation> {
    if !analysis.is_relevant {
        return None;
    }

    let (mut score, factor) = match analysis.category {
        ImpactCategory::StrongPositive => (3, "Strong positive sentiment detected"),
        ImpactCategory::Positive => (2, "Positive sentiment detected"),
        ImpactCategory::Negative => (-2, "Negative sentiment detected"),
        ImpactCategory::StrongNegative => (-3, "Strong negative sentiment detected"),
        ImpactCategory::Neutral => return None,
    };
    let mut factors = vec![factor.to_string()];

    if analysis.confidence > HIGH_CONFIDENCE {
        score += if analysis.polarity > 0.0 { 1 } else { -1 };
        factors.push(format!("High confidence ({:.2})", analysis.confidence));
    }

    if technical.momentum_20d_pct > MOMENTUM_THRESHOLD_PCT {
        score += 1;
        factors.push("Strong positive momentum".to_string());
    } else if technical.momentum_20d_pct < -MOMENTUM_THRESHOLD_PCT {
        score -= 1;
        factors.push("Negative momentum".to_string());
    }

    if technical.current_price > technical.upper_band {
        score -= 1;
        factors.push("Price above upper Bollinger Band (potentially overbought)".to_string());
    } else if technical.current_price < technical.lower_band {
        score += 1;
        factors.push("Price below lower Bollinger Band (potentially oversold)".to_string());
    }

    Some(Recommendation {
        action: RecommendationAction::from_score(score),
        score,
        confidence_score: format!("{}/{}", score.abs(), MAX_SCORE),
        factors,
        disclaimer: DISCLAIMER.to_string(),
    })
}
