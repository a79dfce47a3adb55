//! tests/global_errors/404.rs
//! Ensures that hitting an unknown route returns HTTP 404.

// Include the helper module defined in tests/mod.rs.
#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn returns_404_for_nonexistent_route() {
    let base_url: String = common::spawn_app(&[]);

    // Send a GET request to a route that does not exist.
    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/does-not-exist", base_url))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["status"], "NOT_FOUND");
    assert_eq!(json["code"], 404);
    assert_eq!(json["data"], Value::Null);
}

#[tokio::test]
async fn returns_405_for_wrong_method() {
    let base_url: String = common::spawn_app(&[]);

    let resp: reqwest::Response = reqwest::Client::new()
        .patch(format!("{}/api/students", base_url))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "METHOD_NOT_ALLOWED");
    assert_eq!(json["success"], false);
}
