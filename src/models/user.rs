// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and public user records.

use serde::Deserialize;

/// Raw profile returned by `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResult {
    pub id: Option<String>,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub total_likes: u32,
    #[serde(default)]
    pub total_photos: u32,
}

/// Profile of the logged-in user as shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Raw username, used for follow-up user lookups
    pub username: String,
    /// First and last name, trimmed
    pub name: String,
    /// "@"-prefixed login handle
    pub login_name: String,
    pub bio: Option<String>,
}

impl From<ProfileResult> for Profile {
    fn from(result: ProfileResult) -> Self {
        let first = result.first_name.as_deref().unwrap_or("");
        let last = result.last_name.as_deref().unwrap_or("");
        let name = format!("{} {}", first, last).trim().to_string();

        Self {
            login_name: format!("@{}", result.username),
            username: result.username,
            name,
            bio: result.bio,
        }
    }
}

/// Public user record returned by `GET /users/{username}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResult {
    pub profile_image: ProfileImage,
}

/// Avatar URLs at several sizes.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImage {
    pub small: String,
    pub medium: Option<String>,
    pub large: Option<String>,
}
