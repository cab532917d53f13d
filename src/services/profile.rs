// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and avatar fetchers.
//!
//! Both are single-shot: a second fetch while one is outstanding is
//! rejected with [`ApiError::InvalidRequest`]. A reset while a fetch is
//! outstanding discards that fetch's result.

use crate::error::{ApiError, Result};
use crate::events::{AvatarChanged, EventBus, Unsubscribe};
use crate::models::Profile;
use crate::services::{TokenStore, UnsplashClient};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Clears an in-flight flag when the fetch ends, including when the
/// caller drops the future early.
struct FetchGuard<'a>(&'a AtomicBool);

impl<'a> FetchGuard<'a> {
    fn acquire(flag: &'a AtomicBool, what: &str) -> Result<Self> {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(what, "Fetch already in progress");
            return Err(ApiError::InvalidRequest(format!("{} fetch already in progress", what)));
        }
        Ok(Self(flag))
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Value slot tagged with a reset generation.
struct Slot<T> {
    value: Option<T>,
    generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            generation: 0,
        }
    }
}

/// Fetches the logged-in user's profile.
pub struct ProfileService {
    client: UnsplashClient,
    tokens: Arc<TokenStore>,
    is_fetching: AtomicBool,
    slot: Mutex<Slot<Profile>>,
}

impl ProfileService {
    pub fn new(client: UnsplashClient, tokens: Arc<TokenStore>) -> Self {
        Self {
            client,
            tokens,
            is_fetching: AtomicBool::new(false),
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Fetch the profile with the stored token and keep it.
    pub async fn fetch(&self) -> Result<Profile> {
        let _guard = FetchGuard::acquire(&self.is_fetching, "profile")?;
        let token = self.tokens.get().ok_or(ApiError::MissingToken)?;
        let generation = self.generation();

        let result = self.client.get_me(&token).await.map_err(|e| {
            tracing::warn!(error = %e, "Profile fetch failed");
            e
        })?;
        let profile = Profile::from(result);

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != generation {
            tracing::debug!("Discarding profile fetched before reset");
            return Err(ApiError::Cancelled);
        }
        slot.value = Some(profile.clone());
        tracing::info!(username = %profile.username, "Profile loaded");
        Ok(profile)
    }

    pub fn profile(&self) -> Option<Profile> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching.load(Ordering::Acquire)
    }

    /// Forget the profile. Returns whether one was present.
    pub fn reset(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        slot.value.take().is_some()
    }

    fn generation(&self) -> u64 {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}

/// Resolves the logged-in user's avatar URL.
pub struct ProfileImageService {
    client: UnsplashClient,
    tokens: Arc<TokenStore>,
    is_fetching: AtomicBool,
    slot: Mutex<Slot<String>>,
    events: EventBus<AvatarChanged>,
}

impl ProfileImageService {
    pub fn new(client: UnsplashClient, tokens: Arc<TokenStore>) -> Self {
        Self {
            client,
            tokens,
            is_fetching: AtomicBool::new(false),
            slot: Mutex::new(Slot::default()),
            events: EventBus::new(),
        }
    }

    /// Fetch the avatar URL for `username`, keep it and notify listeners.
    ///
    /// Failures go to the caller only; listeners are not notified.
    pub async fn fetch(&self, username: &str) -> Result<String> {
        let _guard = FetchGuard::acquire(&self.is_fetching, "avatar")?;
        let token = self.tokens.get().ok_or(ApiError::MissingToken)?;
        let generation = {
            self.slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .generation
        };

        let user = self.client.get_user(&token, username).await.map_err(|e| {
            tracing::warn!(error = %e, username, "Avatar fetch failed");
            e
        })?;
        let url = user.profile_image.small;

        {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.generation != generation {
                tracing::debug!("Discarding avatar fetched before reset");
                return Err(ApiError::Cancelled);
            }
            slot.value = Some(url.clone());
        }

        tracing::info!(username, "Avatar URL resolved");
        self.events.publish(&AvatarChanged { url: url.clone() });
        Ok(url)
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }

    /// Listen for resolved avatar URLs.
    pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
    where
        F: Fn(&AvatarChanged) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Forget the avatar URL. Returns whether one was present.
    pub fn reset(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        slot.value.take().is_some()
    }
}
