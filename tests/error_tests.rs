// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Failure mapping of the HTTP decode layer.

use image_feed::config::Config;
use image_feed::error::ApiError;
use image_feed::models::AccessToken;
use image_feed::AppState;
use std::time::Duration;

mod common;
use common::MeMode;

#[tokio::test]
async fn test_empty_body_is_empty_response() {
    let api = common::spawn_mock_api().await;
    api.state.set_me_mode(MeMode::EmptyBody);
    let state = common::create_logged_in_app(&api);

    let err = state.profile.fetch().await.unwrap_err();
    assert!(matches!(err, ApiError::EmptyResponse));
}

#[tokio::test]
async fn test_shape_mismatch_is_decode_error_with_payload() {
    let api = common::spawn_mock_api().await;
    api.state.set_me_mode(MeMode::WrongShape);
    let state = common::create_logged_in_app(&api);

    match state.profile.fetch().await {
        Err(ApiError::Decode { body, .. }) => assert_eq!(body, r#"{"unexpected":true}"#),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_success_status_carries_code() {
    let api = common::spawn_mock_api().await;
    api.state.set_me_mode(MeMode::ServerError);
    let state = common::create_logged_in_app(&api);

    let err = state.profile.fetch().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(!err.is_unauthorized());
    assert!(matches!(err, ApiError::HttpStatus { ref body, .. } if body == "boom"));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let config = Config {
        api_base_url: "http://127.0.0.1:1".to_string(),
        request_timeout: Duration::from_secs(2),
        ..Config::default()
    };
    let state = AppState::new(config).expect("app state");
    state.tokens.set(AccessToken::new("t"));

    let err = state.profile.fetch().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[test]
fn test_error_helpers() {
    let err = ApiError::HttpStatus {
        status: 401,
        body: String::new(),
    };
    assert!(err.is_unauthorized());
    assert!(!err.is_duplicate());

    let err = ApiError::InvalidRequest("authorization code already used".to_string());
    assert!(err.is_duplicate());
    assert_eq!(err.status(), None);

    assert!(!ApiError::MissingToken.is_unauthorized());
    assert_eq!(ApiError::Cancelled.to_string(), "Request cancelled");
}
