//! Web-layer errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use relinfo_common::ExperimentId;
use relinfo_store::StoreError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("You do not have permission to access experiment {0}")]
    Forbidden(ExperimentId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Unauthenticated => StatusCode::UNAUTHORIZED,
            WebError::Forbidden(_) => StatusCode::FORBIDDEN,
            WebError::Store(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            WebError::Store(_) | WebError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller.
    fn public_message(&self) -> String {
        match self.status() {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.log(status);
        let body = format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{code} — Related Information</title>
</head>
<body>
<main class="main-content">
    <h1 class="page-title">{code} {reason}</h1>
    <p class="text-muted">{message}</p>
</main>
</body>
</html>"#,
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or_default(),
            message = escape_html(&self.public_message()),
        );
        (status, Html(body)).into_response()
    }
}

/// Same errors, rendered as `{"success": false, "error": ...}` for the
/// JSON endpoints.
#[derive(Debug)]
pub struct JsonError(pub WebError);

impl From<WebError> for JsonError {
    fn from(err: WebError) -> Self {
        JsonError(err)
    }
}

impl From<StoreError> for JsonError {
    fn from(err: StoreError) -> Self {
        JsonError(WebError::Store(err))
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        self.0.log(status);
        let body = serde_json::json!({ "success": false, "error": self.0.public_message() });
        (status, axum::Json(body)).into_response()
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
