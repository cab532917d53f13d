// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Image Feed: client-side data layer for a photo-sharing API.
//!
//! This crate provides the OAuth code exchange, the paginated photo feed
//! with like toggling, and profile/avatar retrieval. Presentation code
//! drives it through [`AppState`] and listens for change events.

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use error::Result;
use services::{
    FeedService, OAuth2Service, ProfileImageService, ProfileService, SessionService, TokenStore,
    UnsplashClient,
};
use std::sync::Arc;

/// Shared application state: one instance of each service.
pub struct AppState {
    pub config: Config,
    pub tokens: Arc<TokenStore>,
    pub oauth: Arc<OAuth2Service>,
    pub profile: Arc<ProfileService>,
    pub avatar: Arc<ProfileImageService>,
    pub feed: Arc<FeedService>,
    pub session: SessionService,
}

impl AppState {
    /// Build every service from configuration, restoring a saved token
    /// when `config.token_path` is set.
    pub fn new(config: Config) -> Result<Self> {
        let tokens = Arc::new(match &config.token_path {
            Some(path) => TokenStore::load(path),
            None => TokenStore::new(),
        });
        Self::with_token_store(config, tokens)
    }

    /// Build every service around an existing token store.
    pub fn with_token_store(config: Config, tokens: Arc<TokenStore>) -> Result<Self> {
        let client = UnsplashClient::new(&config)?;

        let oauth = Arc::new(OAuth2Service::new(client.clone(), Arc::clone(&tokens)));
        let profile = Arc::new(ProfileService::new(client.clone(), Arc::clone(&tokens)));
        let avatar = Arc::new(ProfileImageService::new(client.clone(), Arc::clone(&tokens)));
        let feed = Arc::new(FeedService::new(client, Arc::clone(&tokens), config.page_size));

        let session = SessionService::new(
            Arc::clone(&tokens),
            Arc::clone(&oauth),
            Arc::clone(&profile),
            Arc::clone(&avatar),
            Arc::clone(&feed),
        );

        Ok(Self {
            config,
            tokens,
            oauth,
            profile,
            avatar,
            feed,
            session,
        })
    }
}
