mod analysis;
mod auth;
mod headline;
mod history;
mod price_point;
mod report;
mod technical;

pub use analysis::{AnalysisResult, ImpactCategory, RelevanceAssessment, SentimentLabel};
pub use auth::{LoginRequest, LoginResponse, SessionClaims};
pub use headline::{HeadlineRecord, SimilarHeadline, SimilarHeadlinesQuery};
pub use history::HistoryEntry;
pub use price_point::{HistoryPeriod, PricePoint, PriceQueryParams, PriceSeries};
pub use report::{AnalysisRequest, ImpactReport};
pub use technical::{
    Comparison, CorrelationStrength, Recommendation, RecommendationAction, TechnicalSummary,
};
