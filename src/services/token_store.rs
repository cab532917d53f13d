// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Holder of the current access token.
//!
//! The token lives in memory. When a path is configured it is also
//! written to disk so the next launch can restore it; disk failures are
//! logged and otherwise ignored.

use crate::models::AccessToken;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// At most one access token per session.
#[derive(Debug, Default)]
pub struct TokenStore {
    token: RwLock<Option<AccessToken>>,
    path: Option<PathBuf>,
}

impl TokenStore {
    /// Memory-only store, initially empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by `path`, restoring a previously saved token if present.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        let token = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AccessToken>(&contents) {
                Ok(token) => {
                    tracing::info!(path = %path.display(), "Restored saved access token");
                    Some(token)
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        path = %path.display(),
                        "Ignoring unreadable token file"
                    );
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to read token file");
                None
            }
        };

        Self {
            token: RwLock::new(token),
            path: Some(path),
        }
    }

    pub fn get(&self) -> Option<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn set(&self, token: AccessToken) {
        self.persist(Some(&token));
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the token. Returns whether one was present.
    pub fn clear(&self) -> bool {
        let previous = self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            self.persist(None);
        }
        previous.is_some()
    }

    fn persist(&self, token: Option<&AccessToken>) {
        let Some(path) = &self.path else {
            return;
        };

        let result = match token {
            Some(token) => serde_json::to_string(token)
                .map_err(std::io::Error::other)
                .and_then(|json| fs::write(path, json)),
            None => match fs::remove_file(path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, path = %path.display(), "Failed to persist access token");
        }
    }
}
