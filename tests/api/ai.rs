//! tests/api/ai.rs
//! AI routes forward to the configured service and fall back to Ollama.

#[path = "../mod.rs"]
mod common;

use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn chat_is_forwarded_verbatim() {
    let ai = MockServer::start_async().await;
    let forwarded = ai.mock_async(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .json_body(json!({ "message": "What is 7 x 8?", "student_id": "s-1" }));
        then.status(200).json_body(json!({ "data": { "content": "56" } }));
    }).await;

    let ai_url: String = ai.base_url();
    let base_url: String = common::spawn_app(&[("AI_SERVICE_URL", ai_url.as_str())]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/ai/chat", base_url))
        .json(&json!({ "message": "What is 7 x 8?", "student_id": "s-1" }))
        .send()
        .await
        .unwrap();

    forwarded.assert_async().await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["content"], "56");
    assert_eq!(json["data"]["source"], "primary");
    assert_eq!(json["data"]["mocked"], false);
}

#[tokio::test]
async fn templated_content_falls_back_to_ollama() {
    let ai = MockServer::start_async().await;
    let ollama = MockServer::start_async().await;

    ai.mock_async(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200).json_body(json!({ "content": "【示例】教案模板" }));
    }).await;
    let generated = ollama.mock_async(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .json_body_partial(r#"{ "model": "llama3", "stream": false }"#)
            .body_contains("Fractions");
        then.status(200).json_body(json!({ "response": "Lesson 1: halves and quarters", "done": true }));
    }).await;

    let ai_url: String = ai.base_url();
    let ollama_url: String = ollama.base_url();
    let base_url: String = common::spawn_app(&[
        ("AI_SERVICE_URL", ai_url.as_str()),
        ("OLLAMA_URL", ollama_url.as_str()),
    ]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/ai/generate", base_url))
        .json(&json!({ "content_type": "lesson_plan", "topic": "Fractions", "grade_level": "4" }))
        .send()
        .await
        .unwrap();

    generated.assert_async().await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["source"], "ollama");
    assert_eq!(json["data"]["model"], "llama3");
    assert_eq!(json["data"]["content"], "Lesson 1: halves and quarters");
    assert_eq!(json["data"]["fallback_reason"], "primary reply looks templated");
}

#[tokio::test]
async fn hanging_primary_still_returns_slow_ollama_reply() {
    let ai = MockServer::start_async().await;
    let ollama = MockServer::start_async().await;

    ai.mock_async(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(200)
            .json_body(json!({ "reply": "never seen" }))
            .delay(Duration::from_secs(5));
    }).await;
    let answered = ollama.mock_async(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(200)
            .json_body(json!({ "message": { "content": "real answer" } }))
            .delay(Duration::from_millis(1500));
    }).await;

    let ai_url: String = ai.base_url();
    let ollama_url: String = ollama.base_url();
    let base_url: String = common::spawn_app(&[
        ("AI_SERVICE_URL", ai_url.as_str()),
        ("OLLAMA_URL", ollama_url.as_str()),
        ("DEFAULT_TIMEOUT_SECONDS", "4"),
        ("AI_PRIMARY_TIMEOUT_SECONDS", "1"),
        ("OLLAMA_TIMEOUT_SECONDS", "2"),
    ]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/ai/chat", base_url))
        .json(&json!({ "message": "hello" }))
        .send()
        .await
        .unwrap();

    answered.assert_async().await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["source"], "ollama");
    assert_eq!(json["data"]["content"], "real answer");
}

#[tokio::test]
async fn unavailable_upstreams_return_502() {
    // Both URLs point at closed ports
    let base_url: String = common::spawn_app(&[]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/ai/chat", base_url))
        .json(&json!({ "message": "anyone there?" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["error"], "ai_unavailable");
}

#[tokio::test]
async fn blank_topic_is_a_bad_request() {
    let base_url: String = common::spawn_app(&[]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/ai/generate", base_url))
        .json(&json!({ "topic": "  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid AI request");
}

#[tokio::test]
async fn missing_message_field_is_rejected() {
    let base_url: String = common::spawn_app(&[]);

    let resp = reqwest::Client::new()
        .post(format!("{}/api/ai/chat", base_url))
        .json(&json!({ "text": "wrong field" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = resp.json().await.unwrap();
    assert!(json["message"].as_str().unwrap().contains("message"));
}
