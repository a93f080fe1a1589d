//! API errors.

use thiserror::Error;

/// Network error codes worth a retry.
pub const TRANSIENT_NETWORK_CODES: &[&str] = &[
    "ECONNRESET",
    "ECONNREFUSED",
    "ETIMEDOUT",
    "EAI_AGAIN",
    "EPIPE",
];

/// API error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404.
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// 422, usually "already exists" or "already gone".
    #[error("Unprocessable request on {resource}: {message}")]
    Unprocessable { resource: String, message: String },

    /// 403.
    #[error("Forbidden access to {resource}")]
    Forbidden { resource: String },

    /// 5xx, rate limits and network errors.
    #[error("Transient error on {resource}: {message}")]
    Transient { resource: String, message: String },

    #[error(transparent)]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ApiError {
    /// Map a platform status code.
    pub fn from_status(status: u16, resource: &str, message: &str) -> Self {
        match status {
            403 => Self::Forbidden {
                resource: resource.into(),
            },
            404 => Self::NotFound {
                resource: resource.into(),
            },
            422 => Self::Unprocessable {
                resource: resource.into(),
                message: message.into(),
            },
            429 | 500..=599 => Self::Transient {
                resource: resource.into(),
                message: format!("HTTP {status}: {message}"),
            },
            _ => Self::ImplementationError {
                source: format!("HTTP {status} on {resource}: {message}").into(),
            },
        }
    }

    /// Map a network error code.
    pub fn from_network_code(code: &str, resource: &str) -> Self {
        if TRANSIENT_NETWORK_CODES.contains(&code) {
            Self::Transient {
                resource: resource.into(),
                message: code.into(),
            }
        } else {
            Self::ImplementationError {
                source: format!("Network error {code} on {resource}").into(),
            }
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// The desired end state already holds (404 on deletes, 422 on creates).
    pub fn is_already_resolved(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Unprocessable { .. })
    }
}

/// Result alias for `ApiError`.
pub type Result<T, E = ApiError> = core::result::Result<T, E>;
