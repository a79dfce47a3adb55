use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat request as received from the frontend. Unknown fields are kept
/// in `extra` so the body is forwarded to the AI service unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ChatMessage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Teaching-material generation request (lesson plans, exercises, quizzes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_content_type() -> String {
    "lesson_plan".to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AiSource {
    Primary,
    Ollama,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiReply {
    pub content: String,
    pub source: AiSource,
    /// The returned content still looks templated
    pub mocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Why the primary answer was discarded, when the fallback was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

const SYSTEM_PROMPT: &str =
    "You are a helpful teaching assistant for a school management platform. Answer clearly and accurately.";

impl ChatRequest {
    /// Conversation in the shape Ollama's chat endpoint expects
    pub fn to_ollama_messages(&self) -> Vec<ChatMessage> {
        let mut messages: Vec<ChatMessage> = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: self.message.clone(),
        });
        messages
    }
}

impl ContentRequest {
    /// Single prompt for Ollama's generate endpoint
    pub fn to_prompt(&self) -> String {
        let kind: String = match self.content_type.as_str() {
            "lesson_plan" => "a detailed lesson plan".to_string(),
            "exercise" | "exercises" => "a set of practice exercises with answers".to_string(),
            "quiz" | "exam" => "an exam paper with an answer key".to_string(),
            "summary" => "a concise study summary".to_string(),
            other => format!("a {}", other.replace('_', " ")),
        };

        let mut prompt: String = format!("{SYSTEM_PROMPT}\n\nWrite {kind} about \"{}\".", self.topic);
        if let Some(subject) = &self.subject {
            prompt.push_str(&format!("\nSubject: {subject}"));
        }
        if let Some(grade) = &self.grade_level {
            prompt.push_str(&format!("\nGrade level: {grade}"));
        }
        if let Some(requirements) = &self.requirements {
            prompt.push_str(&format!("\nAdditional requirements: {requirements}"));
        }
        prompt
    }
}
