// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated photo feed.
//!
//! Handles the core workflow:
//! 1. Fetch the next page (at most one page request outstanding)
//! 2. Decode records into [`Photo`] values and append in server order
//! 3. Toggle likes and replace the affected photo by id
//! 4. Notify listeners after every mutation
//!
//! The photo list is handed out as an `Arc<Vec<Photo>>` snapshot and
//! mutated copy-on-write, so a snapshot never changes after it is taken.

use crate::error::{ApiError, Result};
use crate::events::{EventBus, FeedChanged, Unsubscribe};
use crate::models::Photo;
use crate::services::{TokenStore, UnsplashClient};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct FeedState {
    photos: Arc<Vec<Photo>>,
    /// Last page successfully appended (0 = nothing fetched yet)
    current_page: u32,
    is_fetching: bool,
    /// Bumped on reset; completions from an older generation are dropped.
    generation: u64,
}

/// Owns the paginated photo collection.
pub struct FeedService {
    client: UnsplashClient,
    tokens: Arc<TokenStore>,
    page_size: u32,
    state: Mutex<FeedState>,
    events: EventBus<FeedChanged>,
}

/// Clears the in-flight flag if the fetch ends without completing,
/// e.g. on failure or when the caller drops the future.
struct PageFetch<'a> {
    state: &'a Mutex<FeedState>,
    generation: u64,
    armed: bool,
}

impl Drop for PageFetch<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation == self.generation {
            state.is_fetching = false;
        }
    }
}

impl FeedService {
    pub fn new(client: UnsplashClient, tokens: Arc<TokenStore>, page_size: u32) -> Self {
        Self {
            client,
            tokens,
            page_size,
            state: Mutex::new(FeedState {
                photos: Arc::new(Vec::new()),
                current_page: 0,
                is_fetching: false,
                generation: 0,
            }),
            events: EventBus::new(),
        }
    }

    /// Fetch and append the next page.
    ///
    /// Does nothing while another page fetch is outstanding or when no
    /// token is stored. Failures are logged, not returned; listeners
    /// learn about new photos through [`FeedChanged`].
    pub async fn fetch_next_page(&self) {
        let Some(token) = self.tokens.get() else {
            tracing::debug!("No access token, skipping feed fetch");
            return;
        };

        let (next_page, mut fetch) = {
            let mut state = self.lock();
            if state.is_fetching {
                tracing::debug!(page = state.current_page + 1, "Feed fetch already in progress");
                return;
            }
            state.is_fetching = true;
            (
                state.current_page + 1,
                PageFetch {
                    state: &self.state,
                    generation: state.generation,
                    armed: true,
                },
            )
        };

        let results = match self
            .client
            .list_photos(&token, next_page, self.page_size)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, page = next_page, "Failed to fetch feed page");
                return;
            }
        };

        let count = results.len();
        {
            let mut state = self.lock();
            fetch.armed = false;
            if state.generation != fetch.generation {
                tracing::debug!(page = next_page, "Discarding feed page fetched before reset");
                return;
            }
            Arc::make_mut(&mut state.photos).extend(results.into_iter().map(Photo::from));
            state.current_page = next_page;
            state.is_fetching = false;
        }

        tracing::info!(page = next_page, count, "Feed page appended");
        self.events.publish(&FeedChanged);
    }

    /// Like or unlike a photo, then replace it in the feed.
    ///
    /// On success the photo with `photo_id` (if still present) is replaced
    /// by a copy whose liked flag is inverted relative to the value held
    /// when the response arrived. On failure the feed is untouched and the
    /// error is returned so the caller can revert optimistic UI state.
    pub async fn toggle_like(&self, photo_id: &str, is_like: bool) -> Result<()> {
        let token = self.tokens.get().ok_or(ApiError::MissingToken)?;

        self.client
            .set_like(&token, photo_id, is_like)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, photo_id, is_like, "Like change failed");
                e
            })?;

        let replaced = {
            let mut state = self.lock();
            match state.photos.iter().position(|p| p.id == photo_id) {
                Some(index) => {
                    let photos = Arc::make_mut(&mut state.photos);
                    let toggled = photos[index].with_liked(!photos[index].is_liked);
                    photos[index] = toggled;
                    true
                }
                None => false,
            }
        };

        if replaced {
            tracing::debug!(photo_id, "Photo like state replaced");
            self.events.publish(&FeedChanged);
        } else {
            tracing::debug!(photo_id, "Liked photo no longer in feed");
        }
        Ok(())
    }

    /// Clear the feed and start over at page 1 on the next fetch.
    ///
    /// Returns whether there was anything to clear.
    pub fn reset(&self) -> bool {
        let mut state = self.lock();
        let had_content = !state.photos.is_empty() || state.current_page != 0 || state.is_fetching;
        state.photos = Arc::new(Vec::new());
        state.current_page = 0;
        state.is_fetching = false;
        state.generation += 1;
        had_content
    }

    /// Snapshot of the photos currently in the feed.
    pub fn photos(&self) -> Arc<Vec<Photo>> {
        Arc::clone(&self.lock().photos)
    }

    pub fn current_page(&self) -> u32 {
        self.lock().current_page
    }

    pub fn is_fetching(&self) -> bool {
        self.lock().is_fetching
    }

    /// Listen for feed changes.
    pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
    where
        F: Fn(&FeedChanged) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
