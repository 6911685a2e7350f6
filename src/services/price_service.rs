use tracing::{info, warn};

use crate::external::price_provider::PriceProvider;
use crate::models::{HistoryPeriod, PricePoint, PriceSeries};
use crate::services::failure_cache::{FailureCache, FailureType};

/// Fetches a price series for `ticker`, mapping any failure to an unavailable series.
///
/// Unknown and rate-limited tickers are skipped until their failure expires.
/// Any other failure only affects the current request.
pub async fn fetch_series(
    provider: &dyn PriceProvider,
    failure_cache: &FailureCache,
    ticker: &str,
    period: HistoryPeriod,
) -> PriceSeries {
    if let Some(failure) = failure_cache.is_failed(ticker) {
        info!(
            "Skipping price fetch for {} - ticker is in failure cache ({:?}). Will retry after {}",
            ticker,
            failure.error_type,
            failure.retry_after()
        );
        return PriceSeries::unavailable(ticker, period);
    }

    match provider.fetch_history(ticker, period).await {
        Ok(points) if !points.is_empty() => {
            failure_cache.clear(ticker);
            info!("Fetched {} price points for {} ({})", points.len(), ticker, period);
            PriceSeries {
                ticker: ticker.to_string(),
                period,
                available: true,
                message: None,
                points,
            }
        }
        Ok(_) => {
            warn!("Price source returned no data for {} ({})", ticker, period);
            PriceSeries::unavailable(ticker, period)
        }
        Err(e) => {
            warn!("Failed to fetch prices for {}: {}", ticker, e);
            if let Some(error_type) = FailureType::from_error(&e) {
                failure_cache.record_failure(ticker, error_type);
            }
            PriceSeries::unavailable(ticker, period)
        }
    }
}

/// OHLCV rows as CSV with a `Date,Open,High,Low,Close,Volume` header.
pub fn series_to_csv(points: &[PricePoint]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Date", "Open", "High", "Low", "Close", "Volume"])?;
    for p in points {
        wtr.write_record([
            p.date.format("%Y-%m-%d").to_string(),
            p.open.to_string(),
            p.high.to_string(),
            p.low.to_string(),
            p.close.to_string(),
            p.volume.to_string(),
        ])?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

/// `{TICKER}_{period}_{YYYYMMDD}.csv`
pub fn export_file_name(ticker: &str, period: HistoryPeriod, day: chrono::NaiveDate) -> String {
    format!("{}_{}_{}.csv", ticker, period, day.format("%Y%m%d"))
}
