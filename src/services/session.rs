// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session flow: login → token → profile → avatar → feed.

use crate::error::{ApiError, Result};
use crate::events::{EventBus, SessionEvent, Unsubscribe};
use crate::models::Profile;
use crate::services::{
    FeedService, LogoutService, OAuth2Service, ProfileImageService, ProfileService, TokenStore,
};
use std::sync::Arc;

pub struct SessionService {
    tokens: Arc<TokenStore>,
    oauth: Arc<OAuth2Service>,
    profile: Arc<ProfileService>,
    avatar: Arc<ProfileImageService>,
    feed: Arc<FeedService>,
    logout: LogoutService,
    events: Arc<EventBus<SessionEvent>>,
}

impl SessionService {
    pub fn new(
        tokens: Arc<TokenStore>,
        oauth: Arc<OAuth2Service>,
        profile: Arc<ProfileService>,
        avatar: Arc<ProfileImageService>,
        feed: Arc<FeedService>,
    ) -> Self {
        let events = Arc::new(EventBus::new());
        let logout = LogoutService::new(
            Arc::clone(&tokens),
            Arc::clone(&oauth),
            Arc::clone(&profile),
            Arc::clone(&avatar),
            Arc::clone(&feed),
            Arc::clone(&events),
        );

        Self {
            tokens,
            oauth,
            profile,
            avatar,
            feed,
            logout,
            events,
        }
    }

    /// Resume a session from a restored token, or ask for a login.
    ///
    /// Returns the profile when a session was loaded.
    pub async fn start(&self) -> Result<Option<Profile>> {
        if !self.tokens.is_authenticated() {
            tracing::info!("No saved token, login required");
            self.events.publish(&SessionEvent::LoginRequired);
            return Ok(None);
        }

        self.load().await.map(Some)
    }

    /// Exchange the code from the web login, then load the session.
    pub async fn complete_login(&self, code: &str) -> Result<Profile> {
        self.oauth.exchange(code).await?;
        self.load().await
    }

    /// Clear all session state. See [`LogoutService::logout`].
    pub fn logout(&self) -> bool {
        self.logout.logout()
    }

    /// Listen for session transitions.
    pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Load profile, avatar and the first feed page for the current token.
    ///
    /// Fails with [`ApiError::Cancelled`] if the session was logged out
    /// (or replaced) while loading; `Authenticated` is not published then.
    async fn load(&self) -> Result<Profile> {
        let token = self.tokens.get().ok_or(ApiError::MissingToken)?;
        let profile = self.profile.fetch().await?;

        // The avatar is cosmetic; a failure here does not block the session.
        if let Err(e) = self.avatar.fetch(&profile.username).await {
            tracing::warn!(error = %e, "Avatar unavailable");
        }

        self.feed.fetch_next_page().await;

        if self.tokens.get().as_ref() != Some(&token) {
            tracing::info!("Session ended while loading");
            return Err(ApiError::Cancelled);
        }

        tracing::info!(username = %profile.username, "Session loaded");
        self.events.publish(&SessionEvent::Authenticated);
        Ok(profile)
    }
}
