use std::collections::HashMap;
use std::sync::Arc;
use anyhow::{Context, Result};
use redis::{AsyncCommands, Client};
use tracing::{debug, info};
use crate::config::environment::EnvironmentVariables;

/// Thin async wrapper over the Redis client. Every command is a direct
/// pass-through; TTLs and key layout are up to the caller.
#[derive(Debug, Clone)]
pub struct RedisService {
    client: Client,
    prefix: Arc<str>,
}

impl RedisService {
    pub fn new(env: Arc<EnvironmentVariables>) -> Result<Self> {
        let client = Client::open(env.redis_url.as_ref())
            .context("Failed to create Redis client")?;
        Ok(Self {
            client,
            prefix: Arc::from(env.redis_key_prefix.as_ref()),
        })
    }

    pub async fn initialize(&self) -> Result<()> {
        self.ping().await?;
        info!("Redis connection established successfully");
        Ok(())
    }

    pub async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await
            .context("Failed to get Redis multiplexed connection")
    }

    pub async fn shutdown(&self) {
        // Connections are dropped with the client, nothing to close explicitly.
        info!("Redis service shutdown (noop)");
    }

    /// Prepends the configured namespace to a key
    pub fn key(&self, suffix: &str) -> String {
        format!("{}{}", self.prefix, suffix)
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let _: () = redis::cmd("PING").query_async(&mut conn).await
            .context("Failed to ping Redis")?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        debug!(key, "redis GET");
        conn.get(key).await.context("Redis GET failed")
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        debug!(key, "redis SET");
        conn.set(key, value).await.context("Redis SET failed")
    }

    pub async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> Result<()> {
        let mut conn = self.get_connection().await?;
        debug!(key, seconds, "redis SETEX");
        conn.set_ex(key, value, seconds).await.context("Redis SETEX failed")
    }

    /// Returns the number of keys removed
    pub async fn del(&self, key: &str) -> Result<u64> {
        let mut conn = self.get_connection().await?;
        debug!(key, "redis DEL");
        conn.del(key).await.context("Redis DEL failed")
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        conn.exists(key).await.context("Redis EXISTS failed")
    }

    /// Remaining time to live in seconds (-1 without expiry, -2 when missing)
    pub async fn ttl(&self, key: &str) -> Result<i64> {
        let mut conn = self.get_connection().await?;
        conn.ttl(key).await.context("Redis TTL failed")
    }

    pub async fn expire(&self, key: &str, seconds: i64) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        conn.expire(key, seconds).await.context("Redis EXPIRE failed")
    }

    pub async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        debug!(key, field, "redis HSET");
        let _: i64 = conn.hset(key, field, value).await.context("Redis HSET failed")?;
        Ok(())
    }

    /// HSETNX: sets the field only if it is absent. Returns whether it was set.
    pub async fn hsetnx(&self, key: &str, field: &str, value: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        debug!(key, field, "redis HSETNX");
        conn.hset_nx(key, field, value).await.context("Redis HSETNX failed")
    }

    pub async fn hset_multiple(&self, key: &str, fields: &[(&str, &str)]) -> Result<()> {
        let mut conn = self.get_connection().await?;
        debug!(key, count = fields.len(), "redis HSET (multiple)");
        conn.hset_multiple(key, fields).await.context("Redis HSET failed")
    }

    pub async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        conn.hget(key, field).await.context("Redis HGET failed")
    }

    pub async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut conn = self.get_connection().await?;
        conn.hgetall(key).await.context("Redis HGETALL failed")
    }

    /// Returns the list length after the push
    pub async fn lpush(&self, key: &str, value: &str) -> Result<u64> {
        let mut conn = self.get_connection().await?;
        debug!(key, "redis LPUSH");
        conn.lpush(key, value).await.context("Redis LPUSH failed")
    }

    pub async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let mut conn = self.get_connection().await?;
        conn.lrange(key, start, stop).await.context("Redis LRANGE failed")
    }
}
