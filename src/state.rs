use std::sync::Arc;

use crate::external::price_provider::PriceProvider;
use crate::services::auth_service::AuthService;
use crate::services::failure_cache::FailureCache;
use crate::services::history_service::HistoryStore;
use crate::services::sentiment_service::AnalysisContext;

#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisContext>,
    pub price_provider: Arc<dyn PriceProvider>,
    pub failure_cache: FailureCache,
    pub auth: AuthService,
    pub history: HistoryStore,
}
