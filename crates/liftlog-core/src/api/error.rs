//! API error handling
//!
//! Every failed call surfaces through one channel: a non-2xx response
//! becomes `ApiError::Http` with the status and a body excerpt, and a
//! transport failure (no response at all) becomes `ApiError::Network`.
//! No call is ever retried.

use serde::Deserialize;
use thiserror::Error;

/// Maximum number of characters of response body kept in an error
pub(crate) const BODY_EXCERPT_LEN: usize = 512;

/// Errors returned by the API client
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("{}", display_http(.status, .body))]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw body excerpt (may be empty)
        body: String,
    },

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Body shape the registration endpoint uses for validation failures
#[derive(Deserialize)]
struct ErrorBody {
    errors: Vec<String>,
}

impl ApiError {
    /// Status code of an HTTP failure, if the server responded
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(_) => None,
        }
    }

    /// Whether the server rejected the session (401)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Human-readable messages for this failure
    ///
    /// Parses a structured `{"errors": [...]}` body when present (the
    /// registration endpoint uses it); otherwise falls back to the
    /// error's display form.
    pub fn messages(&self) -> Vec<String> {
        if let ApiError::Http { body, .. } = self {
            if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
                if !parsed.errors.is_empty() {
                    return parsed.errors;
                }
            }
        }
        vec![self.to_string()]
    }
}

fn display_http(status: &u16, body: &str) -> String {
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
