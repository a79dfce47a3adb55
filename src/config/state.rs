// Application state management with singleton pattern

use std::sync::Arc;
use once_cell::sync::Lazy;
use crate::config::environment::EnvironmentVariables;
use crate::database::RedisService;
use crate::services::{ai::AiClient, password::PasswordHasher};

// AppState singleton
#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub redis: RedisService,
    pub passwords: PasswordHasher,
    pub ai: AiClient,
}

impl AppState {
    /// Builds the state and its services from an explicit configuration
    pub fn new(environment: EnvironmentVariables) -> anyhow::Result<Self> {
        let environment_arc: Arc<EnvironmentVariables> = Arc::new(environment);

        // Create services
        let redis: RedisService = RedisService::new(environment_arc.clone())?;
        let passwords: PasswordHasher = PasswordHasher::new(environment_arc.bcrypt_cost);
        let ai: AiClient = AiClient::new(&environment_arc)?;

        Ok(Self {
            environment: environment_arc,
            redis,
            passwords,
            ai,
        })
    }

    /// Returns the singleton instance built from the process environment
    pub fn instance() -> &'static Self {
        static INSTANCE: Lazy<AppState> = Lazy::new(|| {
            let environment = EnvironmentVariables::load()
                .expect("Failed to load environment configuration");

            if cfg!(debug_assertions) {
                tracing::debug!("Loaded environment configuration: {:#?}", environment);
            }

            AppState::new(environment).expect("Failed to initialize AppState")
        });
        &INSTANCE
    }

    /// Verifies backing services. Redis is optional for most routes,
    /// so an unreachable server only produces a warning.
    pub async fn initialize(&self) {
        match self.redis.initialize().await {
            Ok(()) => tracing::info!("Services initialized successfully"),
            Err(e) => tracing::warn!("Redis unavailable at startup, auth routes will fail: {:#}", e),
        }
    }

    /// Gracefully shutdown all service connections
    pub async fn shutdown(&self) {
        self.redis.shutdown().await;
    }
}
