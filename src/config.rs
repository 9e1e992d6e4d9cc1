use std::net::SocketAddr;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Whether the wired backend provisions asynchronously. When true,
    /// mutating requests must carry `accepts_incomplete=true`.
    pub async_backend: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_string("BROKER_BIND_ADDR", "127.0.0.1:8080")
            .parse::<SocketAddr>()
            .context("BROKER_BIND_ADDR must be a valid host:port")?;

        let async_backend = env_string("BROKER_ASYNC_BACKEND", "true")
            .parse::<bool>()
            .context("BROKER_ASYNC_BACKEND must be true or false")?;

        Ok(Self {
            bind_addr,
            async_backend,
        })
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
