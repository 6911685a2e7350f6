use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{HistoryPeriod, PricePoint};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart API provider.
///
/// No API key required. Handles US listings as well as exchange-suffixed
/// symbols such as `RELIANCE.NS` or `RY.TO`.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; NewsImpact/0.1)")
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for YahooFinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("interval", "1d"),
                ("range", period.as_str()),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        parse_chart(body)
    }
}

fn parse_chart(body: YahooChartResponse) -> Result<Vec<PricePoint>, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if error.description.contains("No data found") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or(PriceProviderError::NotFound)?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| PriceProviderError::BadResponse("No quote data in response".into()))?;

    if result.timestamp.len() != quote.close.len() {
        return Err(PriceProviderError::Parse(
            "Timestamp and close price arrays have different lengths".into(),
        ));
    }

    let field = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            // Holidays and halted sessions come back as null closes
            let close = field(&quote.close, i)?;
            let date = chrono::DateTime::from_timestamp(*ts, 0)?.date_naive();

            Some(PricePoint {
                date,
                open: field(&quote.open, i).unwrap_or(close),
                high: field(&quote.high, i).unwrap_or(close),
                low: field(&quote.low, i).unwrap_or(close),
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));

    if points.is_empty() {
        return Err(PriceProviderError::NotFound);
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<PricePoint>, PriceProviderError> {
        parse_chart(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parse_chart_skips_null_closes_and_sorts() {
        let points = parse(
            r#"{"chart":{"result":[{"timestamp":[1704153600,1704067200,1704240000],
            "indicators":{"quote":[{"open":[11.0,10.0,null],"high":[12.0,10.5,null],
            "low":[10.5,9.5,null],"close":[11.5,10.2,null],"volume":[2000,1000,null]}]}}],
            "error":null}}"#,
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        assert!(points[0].date < points[1].date);
        assert_eq!(points[0].close, 10.2);
        assert_eq!(points[0].volume, 1000);
        assert_eq!(points[1].high, 12.0);
    }

    #[test]
    fn test_parse_chart_maps_no_data_error_to_not_found() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PriceProviderError::NotFound));
    }

    #[test]
    fn test_parse_chart_rejects_mismatched_arrays() {
        let err = parse(
            r#"{"chart":{"result":[{"timestamp":[1704067200,1704153600],
            "indicators":{"quote":[{"close":[10.0]}]}}],"error":null}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PriceProviderError::Parse(_)));
    }
}
