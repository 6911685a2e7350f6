use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse};
use crate::services::auth_service::AuthUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("POST /api/auth/login - Login attempt for {}", body.username);
    let response = state
        .auth
        .login(&body.username, &body.password)
        .map_err(|e| {
            warn!("Login failed for {}: {}", body.username, e);
            AppError::from(e)
        })?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> StatusCode {
    info!("POST /api/auth/logout - Clearing session history for {}", user);
    state.history.clear(&user);
    StatusCode::NO_CONTENT
}
