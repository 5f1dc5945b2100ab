//! Server error reporting middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::errors::ErrorReport;
use crate::services::notifications::FailedRequest;

/// Report every 5xx response to the configured notification channel.
///
/// The report is dispatched in the background and never alters the
/// response.
pub async fn error_reporting_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.to_string());

    let response = next.run(request).await;

    let status = response.status();
    if status.is_server_error() {
        let (code, detail) = match response.extensions().get::<ErrorReport>() {
            Some(report) => (report.code.to_string(), report.detail.clone()),
            None => (
                "INTERNAL_ERROR".to_string(),
                status.canonical_reason().unwrap_or("Server error").to_string(),
            ),
        };

        state.reporter.report(FailedRequest {
            method,
            path,
            status: status.as_u16(),
            code,
            detail,
        });
    }

    response
}
