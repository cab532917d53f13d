// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! OAuth credentials are required; everything else has a default that
//! points at the public photo API.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client ID (access key)
    pub access_key: String,
    /// OAuth client secret
    pub secret_key: String,
    /// Redirect URI registered for the application
    pub redirect_uri: String,
    /// Space-separated OAuth scopes
    pub access_scope: String,
    /// Base URL of the photo/profile API
    pub api_base_url: String,
    /// Base URL of the OAuth authorize/token host
    pub auth_base_url: String,
    /// Photos requested per feed page
    pub page_size: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Where the access token is kept between launches (None = memory only)
    pub token_path: Option<PathBuf>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            access_key: "test_access_key".to_string(),
            secret_key: "test_secret_key".to_string(),
            redirect_uri: "urn:ietf:wg:oauth:2.0:oob".to_string(),
            access_scope: "public read_user write_likes".to_string(),
            api_base_url: "http://localhost:8080".to_string(),
            auth_base_url: "http://localhost:8080".to_string(),
            page_size: 10,
            request_timeout: Duration::from_secs(5),
            token_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            access_key: env::var("UNSPLASH_ACCESS_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("UNSPLASH_ACCESS_KEY"))?,
            secret_key: env::var("UNSPLASH_SECRET_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("UNSPLASH_SECRET_KEY"))?,
            redirect_uri: env::var("UNSPLASH_REDIRECT_URI")
                .unwrap_or_else(|_| "urn:ietf:wg:oauth:2.0:oob".to_string()),
            access_scope: env::var("UNSPLASH_ACCESS_SCOPE")
                .unwrap_or_else(|_| "public read_user write_likes".to_string()),
            api_base_url: env::var("UNSPLASH_API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://api.unsplash.com".to_string()),
            auth_base_url: env::var("UNSPLASH_AUTH_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://unsplash.com".to_string()),
            page_size: parse_var("FEED_PAGE_SIZE", 10)?,
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30)?),
            token_path: env::var("TOKEN_PATH").ok().map(PathBuf::from),
        })
    }

    /// URL of the web login page the user is sent to.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/oauth/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}",
            self.auth_base_url,
            urlencoding::encode(&self.access_key),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.access_scope),
        )
    }

    /// Token exchange endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.auth_base_url)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
