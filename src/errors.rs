//! # Error Handling
//!
//! Two layers of errors live here:
//!
//! - [`SearchError`] is what the normaliser, the option resolver and the
//!   condition applier return. It describes *what* went wrong with a search
//!   config or a client payload.
//! - [`ApiError`] is the sanitised HTTP-facing error. Handlers can use `?` on a
//!   [`SearchError`] and get a 400 for bad client payloads or a 500 for broken
//!   search configs. Internal details are logged, never sent to the client.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crudsearch::{ApiError, SearchParams};
//!
//! async fn list(Query(params): Query<SearchParams>) -> Result<Json<Vec<Article>>, ApiError> {
//!     let select = CONFIG.apply(Article::find(), params.query.as_deref())?;
//!     // ...
//! }
//! ```
//!
//! ## Logging
//!
//! Internal errors are logged using the `tracing` crate. To see them, install a
//! subscriber in your application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_target(false)
//!     .compact()
//!     .init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure while normalising a search config or applying a filter expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The client payload is not JSON, or not a list of `[index, operator, input]` triples
    #[error("Bad query: {reason}")]
    BadQuery { reason: String },

    /// A condition references a field position the config does not have
    #[error("Field index {index} is out of range for {len} searchable fields")]
    IndexOutOfRange { index: i128, len: usize },

    /// The search config itself is invalid (raised while normalising)
    #[error("Search config error: {0}")]
    Config(String),

    /// The query builder cannot express the comparison operator
    #[error("Unsupported comparison operator '{0}'")]
    UnsupportedOperator(String),
}

impl SearchError {
    pub(crate) fn bad_query(reason: impl Into<String>) -> Self {
        Self::BadQuery {
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the client rather than the application
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - Invalid input from user
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 500 Internal Server Error - details logged, not exposed
    Internal {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 500 Internal Server Error with optional details
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::BadRequest { message } | Self::Internal { message, .. } => message,
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.user_message(),
        });
        (status, body).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Convert a [`SearchError`] into an [`ApiError`]
///
/// - Client payload problems become 400 with the error text as message.
/// - Config problems become 500; the details are logged, not exposed.
impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        if err.is_client_error() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal("Search is misconfigured", Some(err.to_string()))
        }
    }
}
