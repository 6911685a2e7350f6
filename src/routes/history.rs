use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::HistoryEntry;
use crate::routes::csv_attachment;
use crate::services::auth_service::AuthUser;
use crate::services::history_service::history_to_csv;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_history))
        .route("/export", get(export_history))
}

pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<Vec<HistoryEntry>> {
    info!("GET /api/history - Listing history for {}", user);
    Json(state.history.list(&user))
}

pub async fn export_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    info!("GET /api/history/export - Exporting history for {}", user);

    let entries = state.history.list(&user);
    if entries.is_empty() {
        return Err(AppError::NotFound("No analysis history to export".to_string()));
    }

    let body = history_to_csv(&entries).map_err(|e| {
        error!("Failed to export history for {}: {}", user, e);
        AppError::from(e)
    })?;
    let file_name = format!("analysis_history_{}.csv", Local::now().format("%Y%m%d"));
    Ok(csv_attachment(&file_name, body))
}
