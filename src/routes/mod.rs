use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

pub(crate) mod analysis;
pub(crate) mod auth;
pub(crate) mod headlines;
pub(crate) mod health;
pub(crate) mod history;
pub(crate) mod prices;

/// CSV body served as a file download.
pub(crate) fn csv_attachment(file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, "text/csv".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}
