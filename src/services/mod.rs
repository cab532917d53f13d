// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - data synchronization layer.

pub mod feed;
pub mod logout;
pub mod oauth;
pub mod profile;
pub mod session;
pub mod token_store;
pub mod unsplash;

pub use feed::FeedService;
pub use logout::LogoutService;
pub use oauth::{extract_code, OAuth2Service};
pub use profile::{ProfileImageService, ProfileService};
pub use session::SessionService;
pub use token_store::TokenStore;
pub use unsplash::UnsplashClient;
