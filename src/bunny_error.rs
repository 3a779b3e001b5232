//! Error type shared by the transport and the hostname reconciler.
//!
//! Every failure is returned to the caller as-is. Nothing in this crate
//! retries on top of the transport, and nothing rolls back a step that
//! already reached the remote API.

use thiserror::Error;

/// Error type for bunny.net pull zone operations.
#[derive(Debug, Error)]
pub enum BunnyError {
    /// Missing required environment variable.
    #[error("missing required env var: {0}")]
    MissingEnv(&'static str),

    /// Invalid environment variable value.
    #[error("invalid env var {key}: {reason}")]
    InvalidEnv {
        /// The environment variable key.
        key: &'static str,
        /// The reason for invalidity.
        reason: &'static str,
    },

    /// The hostname carries no owning pull zone id.
    #[error("pull zone is required")]
    PullzoneRequired,

    /// The remote API refuses to strip the certificate of a system hostname.
    #[error("removing a certificate from an internal hostname is not supported")]
    SystemCertificateRemoval,

    /// A remote call answered with an unexpected status.
    #[error("{operation} failed with {status_text}")]
    Api {
        /// Remote operation name (e.g. `addHostname`).
        operation: &'static str,
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// Status line as sent by the server (e.g. `404 Not Found`).
        status_text: String,
        /// Response body.
        body: String,
    },

    /// The re-read pull zone has no matching hostname.
    #[error("hostname not found")]
    HostnameNotFound,

    /// HTTP client error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BunnyError {
    /// HTTP status of a failed remote call, if this error came from one.
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
