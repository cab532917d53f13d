// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo records from the feed API and the immutable feed value.

use crate::time_utils::parse_internet_datetime;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw photo record as returned by the feed and like endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoResult {
    pub id: String,
    /// Creation time (ISO 8601), may be missing or malformed
    pub created_at: Option<String>,
    pub width: u32,
    pub height: u32,
    pub description: Option<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub liked_by_user: bool,
    pub urls: UrlsResult,
}

/// Image URLs at the resolutions the API offers.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlsResult {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

/// Like/unlike response; wraps the updated photo record.
#[derive(Debug, Clone, Deserialize)]
pub struct LikeResponse {
    pub photo: PhotoResult,
}

/// Pixel dimensions of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoSize {
    pub width: u32,
    pub height: u32,
}

/// A photo in the feed.
///
/// Values are never mutated in place; a like toggle produces a new
/// `Photo` via [`Photo::with_liked`].
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: String,
    pub size: PhotoSize,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub thumb_image_url: String,
    pub large_image_url: String,
    pub is_liked: bool,
}

impl Photo {
    /// Copy of this photo with only the liked flag changed.
    pub fn with_liked(&self, is_liked: bool) -> Self {
        Self {
            is_liked,
            ..self.clone()
        }
    }
}

impl From<PhotoResult> for Photo {
    fn from(result: PhotoResult) -> Self {
        let created_at = result
            .created_at
            .as_deref()
            .and_then(parse_internet_datetime);

        Self {
            id: result.id,
            size: PhotoSize {
                width: result.width,
                height: result.height,
            },
            created_at,
            description: result.description,
            thumb_image_url: result.urls.thumb,
            large_image_url: result.urls.full,
            is_liked: result.liked_by_user,
        }
    }
}
