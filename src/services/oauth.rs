// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authorization code exchange.
//!
//! Authorization codes are single-use. A code that is already being
//! exchanged, or was exchanged since the last reset, is rejected without
//! a network call. A new code supersedes (and aborts) an exchange for a
//! different code still in flight; the superseded caller gets
//! [`ApiError::Cancelled`] and its token never reaches the store.

use crate::error::{ApiError, Result};
use crate::models::AccessToken;
use crate::services::{TokenStore, UnsplashClient};
use reqwest::Url;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::AbortHandle;

/// Path the web login redirects to once the user has granted access.
const NATIVE_REDIRECT_PATH: &str = "/oauth/authorize/native";

struct InFlight {
    code: String,
    generation: u64,
    abort: AbortHandle,
}

#[derive(Default)]
struct ExchangeState {
    /// Codes submitted since the last reset. A single last-code slot
    /// would let a concluded code be exchanged again; the set is cleared
    /// on logout and holds one entry per login attempt.
    used_codes: HashSet<String>,
    in_flight: Option<InFlight>,
    /// Bumped whenever an in-flight exchange is superseded or reset.
    generation: u64,
}

/// Exchanges authorization codes for access tokens.
pub struct OAuth2Service {
    client: UnsplashClient,
    tokens: Arc<TokenStore>,
    state: Arc<Mutex<ExchangeState>>,
}

impl OAuth2Service {
    pub fn new(client: UnsplashClient, tokens: Arc<TokenStore>) -> Self {
        Self {
            client,
            tokens,
            state: Arc::new(Mutex::new(ExchangeState::default())),
        }
    }

    /// Exchange `code` for an access token and store it.
    pub async fn exchange(&self, code: &str) -> Result<AccessToken> {
        let handle = {
            let mut state = lock(&self.state);

            if state.used_codes.contains(code) {
                tracing::warn!("Rejecting reuse of authorization code");
                return Err(ApiError::InvalidRequest(
                    "authorization code already used".to_string(),
                ));
            }

            if let Some(previous) = state.in_flight.take() {
                tracing::info!("Cancelling superseded token exchange");
                previous.abort.abort();
            }

            state.generation += 1;
            let generation = state.generation;
            state.used_codes.insert(code.to_string());

            let client = self.client.clone();
            let tokens = Arc::clone(&self.tokens);
            let shared = Arc::clone(&self.state);
            let owned_code = code.to_string();

            let handle = tokio::spawn(async move {
                let result = client.exchange_code(&owned_code).await;

                let mut state = lock(&shared);
                if state.generation != generation {
                    return Err(ApiError::Cancelled);
                }
                state.in_flight = None;

                match result {
                    Ok(response) => {
                        let token = AccessToken::new(response.access_token);
                        tokens.set(token.clone());
                        tracing::info!(
                            token_type = %response.token_type,
                            scope = %response.scope,
                            "Access token stored"
                        );
                        Ok(token)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Token exchange failed");
                        Err(e)
                    }
                }
            });

            state.in_flight = Some(InFlight {
                code: code.to_string(),
                generation,
                abort: handle.abort_handle(),
            });
            handle
        };

        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ApiError::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// True while an exchange for `code` is outstanding.
    pub fn is_exchanging(&self, code: &str) -> bool {
        lock(&self.state)
            .in_flight
            .as_ref()
            .is_some_and(|f| f.code == code)
    }

    /// Abort any in-flight exchange and forget used codes.
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        if let Some(in_flight) = state.in_flight.take() {
            tracing::debug!(generation = in_flight.generation, "Aborting token exchange on reset");
            in_flight.abort.abort();
        }
        state.generation += 1;
        state.used_codes.clear();
    }
}

fn lock(state: &Mutex<ExchangeState>) -> std::sync::MutexGuard<'_, ExchangeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Extract the authorization code from the web login's final redirect.
///
/// Returns `None` for any other navigation.
pub fn extract_code(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    if url.path() != NATIVE_REDIRECT_PATH {
        return None;
    }
    url.query_pairs()
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}
