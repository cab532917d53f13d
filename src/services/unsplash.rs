// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo API client.
//!
//! Handles:
//! - Authorization code exchange
//! - Paginated feed fetching
//! - Like / unlike
//! - Profile and public user lookups
//!
//! Every call decodes into a typed result or one of the [`ApiError`]
//! failure kinds.

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    AccessToken, LikeResponse, OAuthTokenResponse, PhotoResult, ProfileResult, UserResult,
};
use serde::de::DeserializeOwned;

/// Photo API client.
#[derive(Clone)]
pub struct UnsplashClient {
    http: reqwest::Client,
    api_base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl UnsplashClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.clone(),
            token_url: config.token_url(),
            client_id: config.access_key.clone(),
            client_secret: config.secret_key.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokenResponse> {
        tracing::debug!("Requesting OAuth token");

        let request = self.http.post(&self.token_url).form(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ]);

        self.send_json(request).await
    }

    /// List one page of the photo feed.
    pub async fn list_photos(
        &self,
        access_token: &AccessToken,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PhotoResult>> {
        let url = format!("{}/photos", self.api_base_url);
        tracing::debug!(page, per_page, "Requesting feed page");

        let request = self
            .http
            .get(&url)
            .bearer_auth(access_token.as_str())
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())]);

        self.send_json(request).await
    }

    /// Like (POST) or unlike (DELETE) a photo.
    pub async fn set_like(
        &self,
        access_token: &AccessToken,
        photo_id: &str,
        is_like: bool,
    ) -> Result<LikeResponse> {
        let url = format!(
            "{}/photos/{}/like",
            self.api_base_url,
            urlencoding::encode(photo_id)
        );
        tracing::debug!(photo_id, is_like, "Sending like change");

        let request = if is_like {
            self.http.post(&url)
        } else {
            self.http.delete(&url)
        };

        self.send_json(request.bearer_auth(access_token.as_str())).await
    }

    /// Get the authenticated user's profile.
    pub async fn get_me(&self, access_token: &AccessToken) -> Result<ProfileResult> {
        let url = format!("{}/me", self.api_base_url);
        self.get_json(&url, access_token).await
    }

    /// Get a public user record by username.
    pub async fn get_user(
        &self,
        access_token: &AccessToken,
        username: &str,
    ) -> Result<UserResult> {
        let url = format!(
            "{}/users/{}",
            self.api_base_url,
            urlencoding::encode(username)
        );
        self.get_json(&url, access_token).await
    }

    /// Generic authenticated GET with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        access_token: &AccessToken,
    ) -> Result<T> {
        let request = self.http.get(url).bearer_auth(access_token.as_str());
        self.send_json(request).await
    }

    /// Send a request and decode the JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request failed");
            ApiError::Transport(e)
        })?;

        check_response_json(response).await
    }
}

/// Check response status and decode the JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Photo API returned error status");
        return Err(ApiError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    decode_body(&bytes)
}

/// Decode a successful response payload.
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.is_empty() {
        tracing::warn!("Photo API returned an empty body");
        return Err(ApiError::EmptyResponse);
    }

    // The payload may hold a token; it stays in the error, never the log.
    serde_json::from_slice(bytes).map_err(|source| {
        tracing::warn!(error = %source, len = bytes.len(), "Failed to decode response");
        ApiError::Decode {
            source,
            body: String::from_utf8_lossy(bytes).into_owned(),
        }
    })
}
