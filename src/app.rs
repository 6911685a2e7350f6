use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::routes::{analysis, auth, headlines, health, history, prices};
use crate::state::AppState;

pub fn create_app(state: AppState, cors_allow_origin: Option<&str>) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/analysis", analysis::router())
        .nest("/api/headlines", headlines::router())
        .nest("/api/prices", prices::router())
        .nest("/api/history", history::router())
        .with_state(state)
        .layer(cors_layer(cors_allow_origin))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => layer.allow_origin(value),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS_ALLOW_ORIGIN: {}", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
