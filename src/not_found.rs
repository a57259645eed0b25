//! Defines the 404 Not Found page and route handler.

use axum::{http::StatusCode, response::Response};

use crate::html::{error_view, render};

/// The fallback route handler for requests that do not match any route.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    render(
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Sorry, we could not find that page.",
            "Check the URL for typos or head back to the transactions page.",
        ),
    )
}
