// Start of file: /src/config/environment.rs

// * Environment configuration, loaded once from the process environment
// * (and .env outside production).

use std::{borrow::Cow, collections::HashMap};
// * anyhow for convenient error handling
use anyhow::{Context, Result};
use tracing::warn;

use crate::services::ai::DEFAULT_MOCK_MARKERS;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_SIZE: usize = 2_097_152; // 2MB
const DEFAULT_TIMEOUT: u64 = 30; // 30 seconds, AI calls are slow
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";
const DEFAULT_REDIS_KEY_PREFIX: &str = "edu:";
const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_AI_PRIMARY_TIMEOUT: u64 = 8;
const DEFAULT_OLLAMA_TIMEOUT: u64 = 20;
const DEFAULT_BCRYPT_COST: u32 = 10;
const DEFAULT_SESSION_TTL: u64 = 86_400; // 24 hours

// * A struct containing all environment variables used by the app
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,
    pub redis_url: Cow<'static, str>,
    pub redis_key_prefix: Cow<'static, str>,
    pub ai_service_url: Cow<'static, str>,
    pub ollama_url: Cow<'static, str>,
    pub ollama_model: Cow<'static, str>,
    pub ollama_fallback_enabled: bool,
    pub ai_primary_timeout_seconds: u64,
    pub ollama_timeout_seconds: u64,
    pub ai_mock_markers: Vec<String>,
    pub bcrypt_cost: u32,
    pub session_ttl_seconds: u64,
}

impl EnvironmentVariables {
    // * Loads environment variables from the process.
    // * Only reads .env if ENVIRONMENT != "production".
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        // * Collect all environment vars from the system and .env
        let vars: HashMap<String, String> = std::env::vars()
            .chain(dotenv::vars())
            .collect();

        Self::from_vars(&vars)
    }

    // * Builds the configuration from an arbitrary key/value map,
    // * providing defaults for anything missing.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        // * A small helper closure to fetch a variable by key
        let get_var = |key: &str| vars.get(key).map(String::as_str);

        let config: Self = Self {
            environment: get_var("ENVIRONMENT")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    Cow::Borrowed(DEFAULT_ENVIRONMENT)
                }),

            host: get_var("HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),

            max_request_body_size: get_var("MAX_REQUEST_BODY_SIZE")
                .map(|s| s.parse().context("Invalid MAX_REQUEST_BODY_SIZE"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT),

            redis_url: get_var("REDIS_URL")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing REDIS_URL, defaulting to '{DEFAULT_REDIS_URL}'");
                    Cow::Borrowed(DEFAULT_REDIS_URL)
                }),

            redis_key_prefix: get_var("REDIS_KEY_PREFIX")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_REDIS_KEY_PREFIX)),

            ai_service_url: get_var("AI_SERVICE_URL")
                .map(|s| Cow::Owned(s.trim_end_matches('/').into()))
                .unwrap_or_else(|| {
                    warn!("Missing AI_SERVICE_URL, defaulting to '{DEFAULT_AI_SERVICE_URL}'");
                    Cow::Borrowed(DEFAULT_AI_SERVICE_URL)
                }),

            ollama_url: get_var("OLLAMA_URL")
                .map(|s| Cow::Owned(s.trim_end_matches('/').into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_OLLAMA_URL)),

            ollama_model: get_var("OLLAMA_MODEL")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_OLLAMA_MODEL)),

            ollama_fallback_enabled: get_var("OLLAMA_FALLBACK_ENABLED")
                .map(parse_bool)
                .transpose()
                .context("Invalid OLLAMA_FALLBACK_ENABLED")?
                .unwrap_or(true),

            ai_primary_timeout_seconds: get_var("AI_PRIMARY_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid AI_PRIMARY_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_AI_PRIMARY_TIMEOUT),

            ollama_timeout_seconds: get_var("OLLAMA_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid OLLAMA_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_OLLAMA_TIMEOUT),

            ai_mock_markers: get_var("AI_MOCK_MARKERS")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(str::to_lowercase)
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_MOCK_MARKERS.iter().map(|m| m.to_string()).collect()),

            bcrypt_cost: get_var("BCRYPT_COST")
                .map(|s| s.parse().context("Invalid BCRYPT_COST"))
                .transpose()?
                .unwrap_or(DEFAULT_BCRYPT_COST),

            session_ttl_seconds: get_var("SESSION_TTL_SECONDS")
                .map(|s| s.parse().context("Invalid SESSION_TTL_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_SESSION_TTL),
        };

        config.validate()?;
        Ok(config)
    }

    // ! The primary AI call and the Ollama fallback run back to back inside
    // ! one request, so both budgets together must fit under the request timeout.
    fn validate(&self) -> Result<()> {
        let ai_budget: u64 = if self.ollama_fallback_enabled {
            self.ai_primary_timeout_seconds + self.ollama_timeout_seconds
        } else {
            self.ai_primary_timeout_seconds
        };

        if ai_budget >= self.default_timeout_seconds {
            anyhow::bail!(
                "AI_PRIMARY_TIMEOUT_SECONDS ({}) + OLLAMA_TIMEOUT_SECONDS ({}) must be below DEFAULT_TIMEOUT_SECONDS ({})",
                self.ai_primary_timeout_seconds,
                if self.ollama_fallback_enabled { self.ollama_timeout_seconds } else { 0 },
                self.default_timeout_seconds,
            );
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got '{other}'")),
    }
}


// End of file: /src/config/environment.rs
