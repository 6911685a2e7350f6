use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{PriceQueryParams, PriceSeries};
use crate::routes::csv_attachment;
use crate::services::auth_service::AuthUser;
use crate::services::price_service;
use crate::services::sentiment_service::normalize_ticker;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:ticker", get(get_prices))
        .route("/:ticker/export", get(export_prices))
}

pub async fn get_prices(
    Path(ticker): Path<String>,
    Query(params): Query<PriceQueryParams>,
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<PriceSeries>, AppError> {
    let ticker = normalize_ticker(&ticker);
    info!("GET /api/prices/{} - Getting {} price history", ticker, params.period);
    let series = price_service::fetch_series(
        state.price_provider.as_ref(),
        &state.failure_cache,
        &ticker,
        params.period,
    )
    .await;
    Ok(Json(series))
}

pub async fn export_prices(
    Path(ticker): Path<String>,
    Query(params): Query<PriceQueryParams>,
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Response, AppError> {
    let ticker = normalize_ticker(&ticker);
    info!("GET /api/prices/{}/export - Exporting {} price history", ticker, params.period);

    let series = price_service::fetch_series(
        state.price_provider.as_ref(),
        &state.failure_cache,
        &ticker,
        params.period,
    )
    .await;

    if !series.available {
        return Err(AppError::NotFound(series.message.unwrap_or_else(|| {
            format!("No price data for {}", ticker)
        })));
    }

    let body = price_service::series_to_csv(&series.points).map_err(|e| {
        error!("Failed to export prices for {}: {}", ticker, e);
        AppError::from(e)
    })?;
    let file_name = price_service::export_file_name(&ticker, params.period, Local::now().date_naive());
    Ok(csv_attachment(&file_name, body))
}
