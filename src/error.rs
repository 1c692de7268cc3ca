use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Upstream error bodies are cut to this many characters.
pub const MAX_UPSTREAM_BODY_CHARS: usize = 300;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned {status}: {body}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unparseable {service} response: {message}")]
    UnparseableResponse {
        service: &'static str,
        message: String,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse classification surfaced to API callers and the page's error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Validation,
    Network,
    UpstreamStatus,
    UnparseableResponse,
    Internal,
}

impl ErrorKind {
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "Service is not configured",
            ErrorKind::Validation => "Invalid request",
            ErrorKind::Network => "Could not reach a data provider",
            ErrorKind::UpstreamStatus => "A data provider rejected the request",
            ErrorKind::UnparseableResponse => "Could not understand the provider's reply",
            ErrorKind::Internal => "Something went wrong",
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::Configuration,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Transport { .. } => ErrorKind::Network,
            AppError::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            AppError::UnparseableResponse { .. } => ErrorKind::UnparseableResponse,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Transport { .. }
            | AppError::UpstreamStatus { .. }
            | AppError::UnparseableResponse { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub(crate) fn transport(service: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::Transport {
            service,
            message: err.to_string(),
        }
    }

    /// Builds an `UpstreamStatus` with `secret` masked out of the provider's
    /// body and the body cut to `MAX_UPSTREAM_BODY_CHARS`.
    pub(crate) fn upstream_status(
        service: &'static str,
        status: u16,
        body: &str,
        secret: &str,
    ) -> Self {
        let redacted = if secret.is_empty() {
            body.to_string()
        } else {
            body.replace(secret, "[REDACTED]")
        };

        let mut body: String = redacted.chars().take(MAX_UPSTREAM_BODY_CHARS).collect();
        if redacted.chars().count() > MAX_UPSTREAM_BODY_CHARS {
            body.push_str("...");
        }

        AppError::UpstreamStatus {
            service,
            status,
            body,
        }
    }

    pub(crate) fn unparseable(service: &'static str, message: impl Into<String>) -> Self {
        AppError::UnparseableResponse {
            service,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();

        match &self {
            AppError::Internal(err) => tracing::error!("Internal error: {}", err),
            AppError::Config(msg) => tracing::error!("Configuration error: {}", msg),
            AppError::Validation(_) => {}
            other => tracing::warn!("External API error: {}", other),
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": kind,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
