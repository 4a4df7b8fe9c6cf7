use axum::{
    http::{
        header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use base::types::timestamp::TimestampParseError;
use strum::IntoStaticStr;
use thiserror::Error;

pub const TEXT_PLAIN: &str = "text/plain";
const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Reasons a request is rejected at the HTTP boundary.
///
/// The `Display` text is exactly what the client receives (plus a trailing newline).
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ApiError {
    /// Wrong HTTP method for the endpoint (405)
    #[error("method not allowed")]
    MethodNotAllowed,
    /// Content-Type other than text/plain (400)
    #[error("only text/plain content-type is allowed")]
    UnsupportedContentType,
    /// Request declared no body at all (400)
    #[error("request body missing")]
    MissingBody,
    /// Body could not be read or exceeded the size limit (400)
    #[error("invalid request body")]
    InvalidBody(#[source] axum::Error),
    /// Body is not a non-negative decimal timestamp (400)
    #[error("invalid timestamp in request body")]
    InvalidTimestamp(#[from] TimestampParseError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnsupportedContentType
            | ApiError::MissingBody
            | ApiError::InvalidBody(_)
            | ApiError::InvalidTimestamp(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Metric label for this rejection.
    pub fn reason(&self) -> &'static str {
        self.into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), &self.to_string())
    }
}

/// Plain-text error reply, newline terminated.
pub fn error_response(code: StatusCode, message: &str) -> Response {
    (
        code,
        [(CONTENT_TYPE, TEXT_PLAIN_UTF8), (X_CONTENT_TYPE_OPTIONS, "nosniff")],
        format!("{message}\n"),
    )
        .into_response()
}

/// Plain-text 200 reply carrying `body` as is.
pub fn success_response(body: String) -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

/// Checks the media type of a Content-Type header value, ignoring parameters such as charset.
pub fn is_plain_text(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case(TEXT_PLAIN))
}
