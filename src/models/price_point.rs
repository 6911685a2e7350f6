use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One daily OHLCV bar for a ticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn closes(points: &[PricePoint]) -> Vec<f64> {
        points.iter().map(|p| p.close).collect()
    }
}

/// How far back to pull price history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HistoryPeriod {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl HistoryPeriod {
    /// Range token understood by the chart API, also used in export file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::OneMonth => "1mo",
            HistoryPeriod::ThreeMonths => "3mo",
            HistoryPeriod::SixMonths => "6mo",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::TwoYears => "2y",
            HistoryPeriod::FiveYears => "5y",
            HistoryPeriod::Max => "max",
        }
    }
}

impl std::fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Ok(HistoryPeriod::OneMonth),
            "3mo" => Ok(HistoryPeriod::ThreeMonths),
            "6mo" => Ok(HistoryPeriod::SixMonths),
            "1y" => Ok(HistoryPeriod::OneYear),
            "2y" => Ok(HistoryPeriod::TwoYears),
            "5y" => Ok(HistoryPeriod::FiveYears),
            "max" => Ok(HistoryPeriod::Max),
            other => Err(format!(
                "Invalid period '{}'. Must be one of 1mo, 3mo, 6mo, 1y, 2y, 5y, max",
                other
            )),
        }
    }
}

/// Price history as returned to clients; an empty series means no data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    pub period: HistoryPeriod,
    pub available: bool,
    pub message: Option<String>,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn unavailable(ticker: &str, period: HistoryPeriod) -> Self {
        Self {
            ticker: ticker.to_string(),
            period,
            available: false,
            message: Some(format!(
                "Could not fetch stock data for ticker: {}. Please verify the symbol.",
                ticker
            )),
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceQueryParams {
    #[serde(default)]
    pub period: HistoryPeriod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_round_trips_through_str() {
        for period in [
            HistoryPeriod::OneMonth,
            HistoryPeriod::ThreeMonths,
            HistoryPeriod::SixMonths,
            HistoryPeriod::OneYear,
            HistoryPeriod::TwoYears,
            HistoryPeriod::FiveYears,
            HistoryPeriod::Max,
        ] {
            assert_eq!(period.as_str().parse::<HistoryPeriod>(), Ok(period));
        }
    }

    #[test]
    fn test_period_serde_uses_range_tokens() {
        let json = serde_json::to_string(&HistoryPeriod::SixMonths).unwrap();
        assert_eq!(json, "\"6mo\"");
        let parsed: HistoryPeriod = serde_json::from_str("\"5y\"").unwrap();
        assert_eq!(parsed, HistoryPeriod::FiveYears);
        assert_eq!(HistoryPeriod::default(), HistoryPeriod::OneYear);
    }

    #[test]
    fn test_invalid_period_rejected() {
        assert!("10y".parse::<HistoryPeriod>().is_err());
    }
}
