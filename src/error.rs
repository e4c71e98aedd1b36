//! Typed handler errors and their translation to HTTP responses.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// Error returned by request handlers.
///
/// Carries the status to answer with, the internal detail for the log, an
/// optional context label prefixed to the logged text, and an optional
/// public message shown to clients instead of the internal detail.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    internal: String,
    context: Option<String>,
    public: Option<String>,
}

impl HttpError {
    pub fn new(status: StatusCode, internal: impl fmt::Display) -> Self {
        Self {
            status,
            internal: internal.to_string(),
            context: None,
            public: None,
        }
    }

    /// Attach a context label, prefixed to the logged text.
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Override the message shown to clients for non-5xx statuses.
    #[must_use]
    pub fn public_message(mut self, message: impl Into<String>) -> Self {
        self.public = Some(message.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-visible message: the public override if set, else the rendered
    /// error text. Never consulted for 5xx responses.
    fn public_error(&self) -> String {
        match &self.public {
            Some(message) => message.clone(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(
                f,
                "HTTP {}: {}: {}",
                self.status.as_u16(),
                context,
                self.internal
            ),
            None => write!(f, "HTTP {}: {}", self.status.as_u16(), self.internal),
        }
    }
}

impl std::error::Error for HttpError {}

/// Translate a handler error into the HTTP response.
///
/// The full error text is always logged. Clients only see message text for
/// non-5xx statuses; server errors answer with an empty body.
impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        error!("{}", self);

        let message = if self.status.as_u16() < 500 {
            self.public_error()
        } else {
            String::new()
        };

        (self.status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_status_and_internal_detail() {
        let err = HttpError::new(StatusCode::BAD_REQUEST, "error parsing form");
        assert_eq!(err.to_string(), "HTTP 400: error parsing form");
    }

    #[test]
    fn renders_context_between_status_and_detail() {
        let err = HttpError::new(StatusCode::NOT_FOUND, "no such file").context("listing");
        assert_eq!(err.to_string(), "HTTP 404: listing: no such file");
    }

    #[tokio::test]
    async fn client_error_body_falls_back_to_rendered_text() {
        let response = HttpError::new(StatusCode::BAD_REQUEST, "boom").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"HTTP 400: boom");
    }

    #[tokio::test]
    async fn client_error_body_prefers_public_message() {
        let response = HttpError::new(StatusCode::BAD_REQUEST, "field 'image' missing")
            .public_message("upload failed")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"upload failed");
    }

    #[tokio::test]
    async fn server_error_body_is_empty() {
        let response = HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "disk failure")
            .public_message("should never be shown")
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }
}
