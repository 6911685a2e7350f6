use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{AnalysisRequest, ImpactReport};
use crate::services::auth_service::AuthUser;
use crate::services::report_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(run_analysis))
}

pub async fn run_analysis(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<ImpactReport>, AppError> {
    info!(
        "POST /api/analysis - {} simulating headline for {}",
        user, request.ticker
    );

    let report = report_service::build_report(
        &state.analysis,
        state.price_provider.as_ref(),
        &state.failure_cache,
        &request,
    )
    .await
    .map_err(|e| {
        error!("Analysis failed for {}: {}", request.ticker, e);
        e
    })?;

    state.history.record(&user, &report.analysis);
    Ok(Json(report))
}
