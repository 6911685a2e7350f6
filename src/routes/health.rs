use axum::extract::State;
use axum::{routing::get, Router};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

async fn health(State(state): State<AppState>) -> &'static str {
    info!(
        "GET /health - Health check ({} historical headlines loaded)",
        state.analysis.corpus.len()
    );
    "OK"
}
