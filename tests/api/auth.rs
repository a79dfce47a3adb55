//! tests/api/auth.rs
//! Validation runs before Redis is touched; cache failures map to 503.
//! The session flow itself runs against a live Redis when one is reachable.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use edu_api::AppState;

#[tokio::test]
async fn register_validates_before_touching_cache() {
    let base_url: String = common::spawn_app(&[]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({ "username": "x", "password": "secret123" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid registration data");
    assert!(json["data"]["error"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn register_reports_unavailable_cache() {
    let base_url: String = common::spawn_app(&[]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({ "username": "teacher_wang", "password": "secret123", "role": "teacher" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["error"], "cache_unavailable");
}

#[tokio::test]
async fn login_requires_credentials() {
    let base_url: String = common::spawn_app(&[]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "username": "", "password": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_without_token_is_unauthorized() {
    let base_url: String = common::spawn_app(&[]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/auth/logout", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Missing bearer token");
}

// -----------------------------------------------------------------------------
// Against a live Redis (TEST_REDIS_URL). Each test writes under its own key
// prefix and skips when no server answers.
// -----------------------------------------------------------------------------

const SESSION_TTL: &str = "120";

async fn live_app() -> Option<(String, AppState)> {
    let redis_url: String = common::live_redis_url().await?;
    let prefix: String = format!("edu-test:{}:", Uuid::new_v4());

    Some(common::spawn_app_with_state(&[
        ("REDIS_URL", redis_url.as_str()),
        ("REDIS_KEY_PREFIX", prefix.as_str()),
        ("SESSION_TTL_SECONDS", SESSION_TTL),
    ]))
}

async fn post(url: String, body: Value) -> reqwest::Response {
    reqwest::Client::new().post(url).json(&body).send().await.unwrap()
}

async fn cleanup(state: &AppState, usernames: &[&str]) {
    for username in usernames {
        let _ = state.redis.del(&state.redis.key(&format!("user:{username}"))).await;
    }
    let _ = state.redis.del(&state.redis.key("users")).await;
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let Some((base_url, state)) = live_app().await else { return };
    let body = json!({ "username": "Li_Lei", "password": "secret123" });

    let first = post(format!("{}/api/auth/register", base_url), body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let json: Value = first.json().await.unwrap();
    assert_eq!(json["data"]["username"], "li_lei");
    assert_eq!(json["data"]["role"], "student");

    // Usernames are case-insensitive
    let second = post(
        format!("{}/api/auth/register", base_url),
        json!({ "username": "LI_LEI", "password": "another123" }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json: Value = second.json().await.unwrap();
    assert_eq!(json["data"]["error"], "duplicate_username");

    cleanup(&state, &["li_lei"]).await;
}

#[tokio::test]
async fn concurrent_registrations_create_one_user() {
    let Some((base_url, state)) = live_app().await else { return };
    let url: String = format!("{}/api/auth/register", base_url);

    let (a, b) = tokio::join!(
        post(url.clone(), json!({ "username": "han_meimei", "password": "first-pass" })),
        post(url.clone(), json!({ "username": "han_meimei", "password": "second-pass" })),
    );

    let mut statuses: Vec<StatusCode> = vec![a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    // Exactly one of the two passwords was stored
    let mut accepted: usize = 0;
    for password in ["first-pass", "second-pass"] {
        let resp = post(
            format!("{}/api/auth/login", base_url),
            json!({ "username": "han_meimei", "password": password }),
        )
        .await;
        if resp.status() == StatusCode::OK {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);

    cleanup(&state, &["han_meimei"]).await;
}

#[tokio::test]
async fn login_opens_a_session_that_logout_closes() {
    let Some((base_url, state)) = live_app().await else { return };

    let registered = post(
        format!("{}/api/auth/register", base_url),
        json!({ "username": "teacher_wang", "password": "secret123", "role": "teacher" }),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);
    let registered: Value = registered.json().await.unwrap();

    let resp = post(
        format!("{}/api/auth/login", base_url),
        json!({ "username": "teacher_wang", "password": "secret123" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.unwrap();
    let data: &Value = &json["data"];

    let token: &str = data["token"].as_str().unwrap();
    assert!(Uuid::parse_str(token).is_ok());
    assert_eq!(data["user_id"], registered["data"]["user_id"]);
    assert_eq!(data["role"], "teacher");
    assert_eq!(data["expires_in"], 120);

    // The session lives in Redis under the configured TTL
    let session_key: String = state.redis.key(&format!("session:{token}"));
    let ttl: i64 = state.redis.ttl(&session_key).await.unwrap();
    assert!(ttl > 0 && ttl <= 120, "unexpected session TTL {ttl}");

    let stored: Value = serde_json::from_str(&state.redis.get(&session_key).await.unwrap().unwrap()).unwrap();
    assert_eq!(stored["username"], "teacher_wang");

    let client = reqwest::Client::new();
    let logout = client
        .post(format!("{}/api/auth/logout", base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status(), StatusCode::OK);
    assert!(!state.redis.exists(&session_key).await.unwrap());

    let again = client
        .post(format!("{}/api/auth/logout", base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::UNAUTHORIZED);
    let json: Value = again.json().await.unwrap();
    assert_eq!(json["message"], "Invalid or expired session");

    cleanup(&state, &["teacher_wang"]).await;
}

#[tokio::test]
async fn wrong_password_looks_like_unknown_user() {
    let Some((base_url, state)) = live_app().await else { return };

    let registered = post(
        format!("{}/api/auth/register", base_url),
        json!({ "username": "zhang_san", "password": "secret123" }),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);

    let wrong_password = post(
        format!("{}/api/auth/login", base_url),
        json!({ "username": "zhang_san", "password": "not-the-one" }),
    )
    .await;
    let unknown_user = post(
        format!("{}/api/auth/login", base_url),
        json!({ "username": "nobody_here", "password": "secret123" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: Value = wrong_password.json().await.unwrap();
    let unknown_user: Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password["message"], "Invalid credentials");
    assert_eq!(wrong_password["message"], unknown_user["message"]);
    assert_eq!(wrong_password["data"], unknown_user["data"]);

    cleanup(&state, &["zhang_san"]).await;
}
