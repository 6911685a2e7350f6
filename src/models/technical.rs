use serde::{Deserialize, Serialize};

/// Indicator snapshot for the latest bar of a price series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechnicalSummary {
    pub current_price: f64,
    pub period_return_pct: f64,
    pub rsi_14: Option<f64>,
    pub ma_20: f64,
    pub ma_50: f64,
    pub upper_band: f64,
    pub lower_band: f64,
    pub momentum_20d_pct: f64,
    pub daily_volatility: f64,
    pub annual_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub cumulative_return_pct: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecommendationAction {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl RecommendationAction {
    pub fn from_score(score: i32) -> Self {
        if score >= 4 {
            RecommendationAction::StrongBuy
        } else if score >= 2 {
            RecommendationAction::Buy
        } else if score <= -4 {
            RecommendationAction::StrongSell
        } else if score <= -2 {
            RecommendationAction::Sell
        } else {
            RecommendationAction::Hold
        }
    }
}

/// Heuristic trading recommendation combining sentiment and price action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub action: RecommendationAction,
    pub score: i32,
    /// "|score|/6"
    pub confidence_score: String,
    pub factors: Vec<String>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

/// Side-by-side performance of the analysed ticker and a benchmark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub ticker: String,
    pub comparison_ticker: String,
    pub ticker_return_pct: f64,
    pub comparison_return_pct: f64,
    pub outperformance_pct: f64,
    pub correlation: Option<f64>,
    pub correlation_strength: Option<CorrelationStrength>,
    /// Base-100 normalised closes, truncated to the common length
    pub ticker_normalized: Vec<f64>,
    pub comparison_normalized: Vec<f64>,
}
