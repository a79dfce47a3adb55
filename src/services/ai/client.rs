// Outbound calls to the AI service, with a single Ollama fallback

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::detection::{extract_text, looks_mocked};
use super::error::{AiError, Result};
use super::models::{AiReply, AiSource, ChatRequest, ContentRequest};
use crate::config::environment::EnvironmentVariables;

const PRIMARY_CHAT_PATH: &str = "/api/chat";
const PRIMARY_GENERATE_PATH: &str = "/api/generate";
const OLLAMA_CHAT_PATH: &str = "/api/chat";
const OLLAMA_GENERATE_PATH: &str = "/api/generate";

// Upstream error bodies are echoed back to callers; keep them short
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct AiClient {
    http: Client,
    base_url: Arc<str>,
    ollama_url: Arc<str>,
    ollama_model: Arc<str>,
    fallback_enabled: bool,
    mock_markers: Arc<[String]>,
    primary_timeout: Duration,
    ollama_timeout: Duration,
}

impl AiClient {
    pub fn new(env: &EnvironmentVariables) -> anyhow::Result<Self> {
        // Each call sets its own timeout; the two budgets are checked
        // against the request timeout when the configuration loads.
        let http: Client = Client::builder()
            .build()
            .context("Failed to build AI HTTP client")?;

        Ok(Self {
            http,
            base_url: Arc::from(env.ai_service_url.as_ref()),
            ollama_url: Arc::from(env.ollama_url.as_ref()),
            ollama_model: Arc::from(env.ollama_model.as_ref()),
            fallback_enabled: env.ollama_fallback_enabled,
            mock_markers: env.ai_mock_markers.clone().into(),
            primary_timeout: Duration::from_secs(env.ai_primary_timeout_seconds),
            ollama_timeout: Duration::from_secs(env.ollama_timeout_seconds),
        })
    }

    /// Forwards a chat message to the AI service
    #[instrument(skip_all, fields(history = request.history.len()))]
    pub async fn chat(&self, request: &ChatRequest) -> Result<AiReply> {
        if request.message.trim().is_empty() {
            return Err(AiError::Validation { message: "message cannot be empty".to_string() });
        }

        let primary: Result<String> = self.call_primary(PRIMARY_CHAT_PATH, request).await;
        self.resolve(primary, || self.ollama_chat(request)).await
    }

    /// Forwards a teaching-content generation request to the AI service
    #[instrument(skip_all, fields(content_type = %request.content_type))]
    pub async fn generate_content(&self, request: &ContentRequest) -> Result<AiReply> {
        if request.topic.trim().is_empty() {
            return Err(AiError::Validation { message: "topic cannot be empty".to_string() });
        }

        let primary: Result<String> = self.call_primary(PRIMARY_GENERATE_PATH, request).await;
        self.resolve(primary, || self.ollama_generate(request)).await
    }

    /// Decides between the primary answer and one fallback call
    async fn resolve<F, Fut>(&self, primary: Result<String>, fallback: F) -> Result<AiReply>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let (reason, mocked_text): (String, Option<String>) = match primary {
            Ok(text) if !looks_mocked(&text, &self.mock_markers) => {
                debug!("Primary AI reply accepted");
                return Ok(AiReply {
                    content: text,
                    source: AiSource::Primary,
                    mocked: false,
                    model: None,
                    fallback_reason: None,
                });
            }
            Ok(text) => ("primary reply looks templated".to_string(), Some(text)),
            Err(e) => (e.to_string(), None),
        };

        if !self.fallback_enabled {
            return match mocked_text {
                Some(text) => {
                    warn!("Primary AI reply looks templated and fallback is disabled");
                    Ok(AiReply {
                        content: text,
                        source: AiSource::Primary,
                        mocked: true,
                        model: None,
                        fallback_reason: None,
                    })
                }
                None => Err(AiError::Unavailable {
                    primary: reason,
                    fallback: "disabled".to_string(),
                }),
            };
        }

        info!("Falling back to Ollama: {}", reason);

        match fallback().await {
            Ok(text) => Ok(AiReply {
                mocked: looks_mocked(&text, &self.mock_markers),
                content: text,
                source: AiSource::Ollama,
                model: Some(self.ollama_model.to_string()),
                fallback_reason: Some(reason),
            }),
            // A templated answer beats no answer
            Err(fallback_error) => match mocked_text {
                Some(text) => {
                    warn!("Ollama fallback failed, returning templated primary reply: {}", fallback_error);
                    Ok(AiReply {
                        content: text,
                        source: AiSource::Primary,
                        mocked: true,
                        model: None,
                        fallback_reason: None,
                    })
                }
                None => Err(AiError::Unavailable {
                    primary: reason,
                    fallback: fallback_error.to_string(),
                }),
            },
        }
    }

    async fn call_primary<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let url: String = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);
        self.post_for_text(&url, body, self.primary_timeout).await
    }

    async fn ollama_chat(&self, request: &ChatRequest) -> Result<String> {
        let url: String = format!("{}{}", self.ollama_url, OLLAMA_CHAT_PATH);
        let payload: Value = json!({
            "model": self.ollama_model.as_ref(),
            "messages": request.to_ollama_messages(),
            "stream": false,
        });
        self.post_for_text(&url, &payload, self.ollama_timeout).await
    }

    async fn ollama_generate(&self, request: &ContentRequest) -> Result<String> {
        let url: String = format!("{}{}", self.ollama_url, OLLAMA_GENERATE_PATH);
        let payload: Value = json!({
            "model": self.ollama_model.as_ref(),
            "prompt": request.to_prompt(),
            "stream": false,
        });
        self.post_for_text(&url, &payload, self.ollama_timeout).await
    }

    async fn post_for_text<B: Serialize + ?Sized>(&self, url: &str, body: &B, timeout: Duration) -> Result<String> {
        let response: reqwest::Response = self.http
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await?;
        let status: reqwest::StatusCode = response.status();

        if !status.is_success() {
            let mut body: String = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut: usize = (0..=MAX_ERROR_BODY).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
                body.truncate(cut);
            }
            return Err(AiError::Status { status: status.as_u16(), body });
        }

        let value: Value = response.json().await?;
        extract_text(&value).ok_or(AiError::EmptyReply)
    }
}
