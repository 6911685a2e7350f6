use tracing::info;

use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{AnalysisRequest, ImpactReport};
use crate::services::failure_cache::FailureCache;
use crate::services::price_service::fetch_series;
use crate::services::recommendation_service::recommend;
use crate::services::sentiment_service::{analyze, normalize_ticker, AnalysisContext};
use crate::services::technical_service::{compare, summarize};

/// Runs one full simulation: scoring, price history, indicators,
/// recommendation and the optional benchmark comparison.
pub async fn build_report(
    ctx: &AnalysisContext,
    provider: &dyn PriceProvider,
    failure_cache: &FailureCache,
    request: &AnalysisRequest,
) -> Result<ImpactReport, AppError> {
    let analysis = analyze(ctx, &request.headline, &request.ticker).await?;

    let prices = fetch_series(provider, failure_cache, &analysis.ticker, request.period).await;
    let technical = summarize(&prices.points);
    let recommendation = technical.as_ref().and_then(|t| recommend(&analysis, t));

    let comparison_ticker = request
        .comparison_ticker
        .as_deref()
        .map(normalize_ticker)
        .filter(|t| !t.is_empty() && *t != analysis.ticker);

    let comparison = match comparison_ticker {
        Some(other) if prices.available => {
            let other_prices = fetch_series(provider, failure_cache, &other, request.period).await;
            compare(&analysis.ticker, &prices.points, &other, &other_prices.points)
        }
        _ => None,
    };

    info!(
        "Report for {}: {} ({} prices, recommendation {:?})",
        analysis.ticker,
        analysis.category,
        prices.points.len(),
        recommendation.as_ref().map(|r| r.action)
    );

    Ok(ImpactReport {
        analysis,
        prices,
        technical,
        recommendation,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringStrategy;
    use crate::external::lexicon::LexiconModel;
    use crate::external::price_provider::PriceProviderError;
    use crate::models::{HistoryPeriod, PricePoint, RecommendationAction};
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use std::sync::Arc;

    /// Rising series for TSLA and SPY, nothing for anything else
    struct StubProvider;

    #[async_trait]
    impl PriceProvider for StubProvider {
        async fn fetch_history(
            &self,
            ticker: &str,
            _period: HistoryPeriod,
        ) -> Result<Vec<PricePoint>, PriceProviderError> {
            let step = match ticker {
                "TSLA" => 1.0,
                "SPY" => 0.5,
                _ => return Err(PriceProviderError::NotFound),
            };
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok((0..40)
                .map(|i| {
                    let close = 100.0 + step * i as f64;
                    PricePoint {
                        date: start + Duration::days(i),
                        open: close,
                        high: close,
                        low: close,
                        close,
                        volume: 10,
                    }
                })
                .collect())
        }
    }

    fn context() -> AnalysisContext {
        AnalysisContext {
            primary: Arc::new(LexiconModel::ternary()),
            fallback: Arc::new(LexiconModel::binary()),
            corpus: Arc::new(Vec::new()),
            strategy: ScoringStrategy::Enhanced,
            similar_limit: 10,
        }
    }

    fn request(headline: &str, ticker: &str, comparison: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            headline: headline.to_string(),
            ticker: ticker.to_string(),
            period: HistoryPeriod::OneYear,
            comparison_ticker: comparison.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_full_report() {
        let report = build_report(
            &context(),
            &StubProvider,
            &FailureCache::new(),
            &request(
                "Tesla announces breakthrough in battery technology, promising 50% cost reduction",
                "tsla",
                Some("spy"),
            ),
        )
        .await
        .unwrap();

        assert!(report.prices.available);
        assert_eq!(report.prices.points.len(), 40);
        assert!(report.technical.is_some());

        // Positive (+2), momentum above 5% (+1)
        let rec = report.recommendation.unwrap();
        assert_eq!(rec.score, 3);
        assert_eq!(rec.action, RecommendationAction::Buy);

        let comparison = report.comparison.unwrap();
        assert_eq!(comparison.comparison_ticker, "SPY");
        assert!(comparison.outperformance_pct > 0.0);
    }

    #[tokio::test]
    async fn test_unknown_ticker_still_reports() {
        let report = build_report(
            &context(),
            &StubProvider,
            &FailureCache::new(),
            &request("Acme shares surge on record profit", "ACME", None),
        )
        .await
        .unwrap();

        assert!(!report.prices.available);
        assert!(report.technical.is_none());
        assert!(report.recommendation.is_none());
        assert!(report.comparison.is_none());
    }

    #[tokio::test]
    async fn test_irrelevant_headline_has_no_recommendation() {
        let report = build_report(
            &context(),
            &StubProvider,
            &FailureCache::new(),
            &request("Local bakery wins pastry award", "TSLA", None),
        )
        .await
        .unwrap();

        assert!(report.technical.is_some());
        assert!(report.recommendation.is_none());
    }
}
