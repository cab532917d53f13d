// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Change notifications published to the presentation layer.
//!
//! Each service owns an [`EventBus`]; listeners register a callback and
//! keep the returned [`Unsubscribe`] handle to detach later.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Feed contents changed; listeners re-read the full photo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedChanged;

/// Avatar URL resolved for the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarChanged {
    pub url: String,
}

/// Session transitions the UI navigates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// No token available; show the login entry point.
    LoginRequired,
    /// Token, profile and first feed page are loaded.
    Authenticated,
    /// Session state was cleared; return to the login entry point.
    LoggedOut,
}

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync + 'static>;

/// Detaches a listener when called.
pub type Unsubscribe = Box<dyn FnOnce() + Send + 'static>;

struct Registry<E> {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener<E>)>>,
}

/// Multi-subscriber, fire-and-forget observer registry.
pub struct EventBus<E> {
    inner: Arc<Registry<E>>,
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register a listener. It stays registered until the returned
    /// handle is called or the bus is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        let registry: Weak<Registry<E>> = Arc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(existing, _)| *existing != id);
            }
        })
    }

    /// Deliver `event` to every listener registered at the time of the call.
    ///
    /// Listeners run outside the registry lock, so they may subscribe,
    /// unsubscribe or call back into the publishing service.
    pub fn publish(&self, event: &E) {
        let listeners: Vec<Listener<E>> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}
