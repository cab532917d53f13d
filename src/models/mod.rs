// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod photo;
pub mod token;
pub mod user;

pub use photo::{LikeResponse, Photo, PhotoResult, PhotoSize, UrlsResult};
pub use token::{AccessToken, OAuthTokenResponse};
pub use user::{Profile, ProfileImage, ProfileResult, UserResult};
