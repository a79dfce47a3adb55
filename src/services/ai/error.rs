use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI response did not contain any text")]
    EmptyReply,

    #[error("Invalid AI request: {message}")]
    Validation { message: String },

    #[error("AI service unavailable (primary: {primary}; fallback: {fallback})")]
    Unavailable { primary: String, fallback: String },
}

pub type Result<T> = std::result::Result<T, AiError>;
