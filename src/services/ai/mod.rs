/*
* AI forwarding: chat and teaching-content generation against the
* configured AI service, with a local Ollama endpoint as fallback.
*/

pub mod client;
pub mod detection;
pub mod error;
pub mod models;

pub use client::AiClient;
pub use detection::{extract_text, looks_mocked, DEFAULT_MOCK_MARKERS};
pub use error::AiError;
pub use models::{AiReply, AiSource, ChatMessage, ChatRequest, ContentRequest};
