// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Logout coordinator: returns every service to its initial state.

use crate::events::{EventBus, SessionEvent};
use crate::services::{FeedService, OAuth2Service, ProfileImageService, ProfileService, TokenStore};
use std::sync::Arc;

pub struct LogoutService {
    tokens: Arc<TokenStore>,
    oauth: Arc<OAuth2Service>,
    profile: Arc<ProfileService>,
    avatar: Arc<ProfileImageService>,
    feed: Arc<FeedService>,
    events: Arc<EventBus<SessionEvent>>,
}

impl LogoutService {
    pub fn new(
        tokens: Arc<TokenStore>,
        oauth: Arc<OAuth2Service>,
        profile: Arc<ProfileService>,
        avatar: Arc<ProfileImageService>,
        feed: Arc<FeedService>,
        events: Arc<EventBus<SessionEvent>>,
    ) -> Self {
        Self {
            tokens,
            oauth,
            profile,
            avatar,
            feed,
            events,
        }
    }

    /// Clear token, profile, avatar and feed, then signal the UI to show
    /// the login entry point.
    ///
    /// Idempotent: when there was nothing to clear, no event is published.
    /// Returns whether anything was cleared.
    pub fn logout(&self) -> bool {
        self.oauth.reset();

        // Evaluate every reset; `||` would short-circuit.
        let cleared = [
            self.tokens.clear(),
            self.profile.reset(),
            self.avatar.reset(),
            self.feed.reset(),
        ];

        if !cleared.contains(&true) {
            tracing::debug!("Logout requested while already logged out");
            return false;
        }

        tracing::info!("Logged out, session state cleared");
        self.events.publish(&SessionEvent::LoggedOut);
        true
    }
}
