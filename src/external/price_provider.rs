use async_trait::async_trait;
use thiserror::Error;

use crate::models::{HistoryPeriod, PricePoint};

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("ticker not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily OHLCV bars for `ticker`, oldest first.
    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<PricePoint>, PriceProviderError>;
}
