use axum::{
    body::{to_bytes, Bytes, HttpBody},
    extract::{Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base::helpers::format_error_chain;
use tracing::{info, warn};

use crate::{
    backend_service::TimestampService,
    models::{error_response, is_plain_text, success_response, ApiError},
};

/// Logging middleware that logs incoming requests and their responses
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let uri = request.uri().path().to_string();
    let start = std::time::Instant::now();

    let response = next.run(request).await;
    let duration = start.elapsed();
    let status_code = response.status().as_u16();

    info!(
        method,
        uri,
        status_code,
        duration_ms = duration.as_millis(),
        "http_request"
    );

    response
}

fn log_rejection(err: &ApiError, operation: &str) {
    warn!(
        operation = %operation,
        reason = err.reason(),
        error = %format_error_chain(err),
        "request rejected"
    );
}

/// PUT /update
///
/// Replaces the stored timestamp with the one in the request body.
/// The body must be a non-negative decimal number of seconds since the UNIX epoch,
/// sent with `Content-Type: text/plain`.
///
/// Responses:
///
/// 200 OK: empty body
///
/// 400 Bad Request, one of:
///   only text/plain content-type is allowed
///   request body missing
///   invalid request body
///   invalid timestamp in request body
pub async fn update_handler(
    State(service): State<TimestampService>,
    request: Request,
) -> Response {
    let result = read_plain_text_body(request, service.max_body_bytes)
        .await
        .and_then(|body| service.update(&body));

    match result {
        Ok(timestamp) => {
            info!(
                timestamp = %timestamp,
                date = ?timestamp.to_datetime(),
                "timestamp updated"
            );
            StatusCode::OK.into_response()
        }
        Err(err) => {
            log_rejection(&err, "update_timestamp");
            service.record_rejection(&err);
            err.into_response()
        }
    }
}

/// GET /retrieve
///
/// 200 OK, `Content-Type: text/plain`, body is the stored timestamp, e.g. `1000`.
pub async fn retrieve_handler(State(service): State<TimestampService>) -> Response {
    success_response(service.retrieve().to_string())
}

/// Any method `/update` does not serve. Counted as a rejected update.
pub async fn update_method_not_allowed_handler(
    State(service): State<TimestampService>,
    request: Request,
) -> Response {
    service.record_rejection(&ApiError::MethodNotAllowed);
    method_not_allowed_handler(request).await
}

/// Any method the endpoint does not serve.
pub async fn method_not_allowed_handler(request: Request) -> Response {
    warn!(
        method = %request.method(),
        uri = request.uri().path(),
        "method not allowed"
    );
    ApiError::MethodNotAllowed.into_response()
}

pub async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "404 page not found")
}

/// Validates the declared content type and reads at most `limit` bytes of the body.
async fn read_plain_text_body(request: Request, limit: usize) -> Result<Bytes, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !is_plain_text(content_type) {
        return Err(ApiError::UnsupportedContentType);
    }

    let body = request.into_body();
    if body.size_hint().exact() == Some(0) {
        return Err(ApiError::MissingBody);
    }

    to_bytes(body, limit).await.map_err(ApiError::InvalidBody)
}
