use serde::{Deserialize, Serialize};

use crate::models::{AnalysisResult, Comparison, HistoryPeriod, PriceSeries, Recommendation, TechnicalSummary};

/// Body of POST /api/analysis
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub headline: String,
    pub ticker: String,
    #[serde(default)]
    pub period: HistoryPeriod,
    pub comparison_ticker: Option<String>,
}

/// Everything the dashboard renders for one simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactReport {
    pub analysis: AnalysisResult,
    pub prices: PriceSeries,
    pub technical: Option<TechnicalSummary>,
    pub recommendation: Option<Recommendation>,
    pub comparison: Option<Comparison>,
}
