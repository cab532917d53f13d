// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the photo API.
//!
//! Serves the token, feed, like, profile and user endpoints on an
//! ephemeral port, counting requests and switching into failure or
//! delay modes on demand.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use image_feed::config::Config;
use image_feed::models::AccessToken;
use image_feed::AppState;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Token every logged-in test app starts with.
#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-token";

/// How `GET /me` answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum MeMode {
    #[default]
    Ok,
    EmptyBody,
    WrongShape,
    ServerError,
}

#[derive(Default)]
pub struct MockState {
    pub token_requests: AtomicUsize,
    pub photo_requests: AtomicUsize,
    pub like_requests: AtomicUsize,
    pub me_requests: AtomicUsize,
    pub user_requests: AtomicUsize,
    /// Applies to codes starting with "slow"
    pub token_delay_ms: AtomicU64,
    pub photo_delay_ms: AtomicU64,
    pub me_delay_ms: AtomicU64,
    pub fail_photos: AtomicBool,
    pub fail_likes: AtomicBool,
    pub fail_user: AtomicBool,
    pub me_mode: Mutex<MeMode>,
    pub token_forms: Mutex<Vec<HashMap<String, String>>>,
    pub page_queries: Mutex<Vec<(u32, u32)>>,
    pub like_methods: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockState {
    pub fn set_me_mode(&self, mode: MeMode) {
        *self.me_mode.lock().unwrap() = mode;
    }
}

pub struct MockApi {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockApi {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Start the mock API on 127.0.0.1 with an ephemeral port.
pub async fn spawn_mock_api() -> MockApi {
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route("/oauth/token", post(token))
        .route("/photos", get(photos))
        .route("/photos/{id}/like", post(like).delete(unlike))
        .route("/me", get(me))
        .route("/users/{username}", get(user))
        .with_state(state.clone());

    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Err(e) => panic!("bind mock api error: {}", e),
        Ok(listener) => listener,
    };
    let addr = listener.local_addr().expect("mock api address");

    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock api server");
    });

    MockApi {
        addr,
        state,
        server,
    }
}

/// Configuration pointing both API and OAuth hosts at the mock.
pub fn test_config(api: &MockApi) -> Config {
    Config {
        api_base_url: api.url(),
        auth_base_url: api.url(),
        page_size: 10,
        ..Config::default()
    }
}

/// App with no token stored.
#[allow(dead_code)]
pub fn create_test_app(api: &MockApi) -> AppState {
    AppState::new(test_config(api)).expect("Failed to build app state")
}

/// App with [`TEST_TOKEN`] already stored.
#[allow(dead_code)]
pub fn create_logged_in_app(api: &MockApi) -> AppState {
    let state = create_test_app(api);
    state.tokens.set(AccessToken::new(TEST_TOKEN));
    state
}

/// Yield until `condition` holds (bounded).
#[allow(dead_code)]
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached");
}

/// Photo record as the feed endpoint returns it.
pub fn photo_json(id: &str, created_at: Value, liked: bool) -> Value {
    json!({
        "id": id,
        "created_at": created_at,
        "width": 4000,
        "height": 3000,
        "description": format!("Photo {}", id),
        "likes": 3,
        "liked_by_user": liked,
        "urls": {
            "raw": format!("https://images.example/{}/raw", id),
            "full": format!("https://images.example/{}/full", id),
            "regular": format!("https://images.example/{}/regular", id),
            "small": format!("https://images.example/{}/small", id),
            "thumb": format!("https://images.example/{}/thumb", id),
        }
    })
}

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"errors": ["OAuth error: The access token is invalid"]})),
    )
        .into_response()
}

async fn delay(ms: &AtomicU64) {
    let ms = ms.load(Ordering::SeqCst);
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    state.token_forms.lock().unwrap().push(form.clone());

    let code = form.get("code").cloned().unwrap_or_default();
    if code.starts_with("slow") {
        delay(&state.token_delay_ms).await;
    }

    if code == "rejected" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_grant"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": format!("token-{}", code),
        "token_type": "Bearer",
        "scope": "public read_user write_likes",
        "created_at": 1_700_000_000
    }))
    .into_response()
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
    per_page: u32,
}

async fn photos(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    if !has_bearer(&headers) {
        return unauthorized();
    }
    state.photo_requests.fetch_add(1, Ordering::SeqCst);
    state
        .page_queries
        .lock()
        .unwrap()
        .push((query.page, query.per_page));
    delay(&state.photo_delay_ms).await;

    if state.fail_photos.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream failure").into_response();
    }

    // Every third photo carries a date that is not an internet date-time.
    let records: Vec<Value> = (0..query.per_page)
        .map(|i| {
            let created_at = if i % 3 == 2 {
                json!("last tuesday")
            } else {
                json!(format!("2024-01-{:02}T10:00:00Z", i + 1))
            };
            photo_json(&format!("p{}-{}", query.page, i), created_at, false)
        })
        .collect();

    Json(Value::Array(records)).into_response()
}

async fn change_like(
    state: &MockState,
    headers: &HeaderMap,
    id: &str,
    method: &str,
    liked: bool,
) -> Response {
    if !has_bearer(headers) {
        return unauthorized();
    }
    state.like_requests.fetch_add(1, Ordering::SeqCst);
    state.like_methods.lock().unwrap().push(method.to_string());

    if state.fail_likes.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "like failed").into_response();
    }

    Json(json!({ "photo": photo_json(id, Value::Null, liked) })).into_response()
}

async fn like(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    change_like(&state, &headers, &id, "POST", true).await
}

async fn unlike(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    change_like(&state, &headers, &id, "DELETE", false).await
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !has_bearer(&headers) {
        return unauthorized();
    }
    state.me_requests.fetch_add(1, Ordering::SeqCst);
    delay(&state.me_delay_ms).await;

    let mode = *state.me_mode.lock().unwrap();
    match mode {
        MeMode::Ok => Json(json!({
            "id": "u-1",
            "updated_at": "2024-01-01T10:00:00Z",
            "username": "ekaterina_nov",
            "first_name": "Ekaterina",
            "last_name": "Novikova",
            "bio": "Hello, world!",
            "location": null,
            "total_likes": 4,
            "total_photos": 0,
            "links": {"self": "https://api.example/users/ekaterina_nov"}
        }))
        .into_response(),
        MeMode::EmptyBody => (StatusCode::OK, "").into_response(),
        MeMode::WrongShape => (StatusCode::OK, r#"{"unexpected":true}"#).into_response(),
        MeMode::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    if !has_bearer(&headers) {
        return unauthorized();
    }
    state.user_requests.fetch_add(1, Ordering::SeqCst);

    if state.fail_user.load(Ordering::SeqCst) {
        return (StatusCode::NOT_FOUND, Json(json!({"errors": ["Couldn't find User"]})))
            .into_response();
    }

    Json(json!({
        "username": username,
        "profile_image": {
            "small": format!("https://images.example/avatars/{}/small.png", username),
            "medium": format!("https://images.example/avatars/{}/medium.png", username),
            "large": format!("https://images.example/avatars/{}/large.png", username)
        }
    }))
    .into_response()
}
