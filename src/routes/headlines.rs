use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{SimilarHeadline, SimilarHeadlinesQuery};
use crate::services::auth_service::AuthUser;
use crate::services::similarity_service::find_similar;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/similar", get(get_similar))
}

pub async fn get_similar(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(query): Query<SimilarHeadlinesQuery>,
) -> Result<Json<Vec<SimilarHeadline>>, AppError> {
    let headline = query.headline.trim();
    if headline.is_empty() {
        return Err(AppError::Validation(
            "Please enter a headline to simulate.".to_string(),
        ));
    }

    let top_n = query.top_n.unwrap_or(state.analysis.similar_limit);
    info!("GET /api/headlines/similar - top {} for '{}'", top_n, headline);

    Ok(Json(find_similar(&state.analysis.corpus, headline, top_n)))
}
