// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error taxonomy shared by every network-backed operation.

/// Failure of a request against the photo API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Empty response body")]
    EmptyResponse,

    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        /// Raw payload, kept for diagnostics.
        body: String,
    },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not authenticated")]
    MissingToken,

    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// HTTP status code, if the server answered with a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server rejected the access token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True for duplicate or otherwise rejected-before-sending requests.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ApiError::InvalidRequest(_))
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
