//! Error types for the Reelsmith domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The top-level `Error`
//! mirrors the failure taxonomy callers must tell apart: missing setup,
//! unreadable resources or media, and backend failures.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Reelsmith operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Backend errors ---
    #[error("Backend error: {0}")]
    Provider(#[from] ProviderError),

    // --- Setup errors ---
    /// No credential configured. Surfaced as a setup prompt, never retried.
    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    /// A required local resource (the system prompt) could not be loaded.
    #[error("Failed to load resource {path}: {reason}")]
    ResourceLoad { path: PathBuf, reason: String },

    // --- Media errors ---
    /// An anchor image could not be read for encoding.
    #[error("Failed to read media {source_name}: {reason}")]
    MediaRead { source_name: String, reason: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by a backend transport.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
