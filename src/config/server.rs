// src/config/server.rs
// Server, database, and logging configuration

use serde::{Deserialize, Serialize};

use super::helpers::{env_or, env_parsed};
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_or("VERSUS_HOST", "127.0.0.1"),
            port: env_parsed("VERSUS_PORT", 3000)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env_or("DATABASE_URL", "sqlite://versus.db?mode=rwc"),
            max_connections: env_parsed("VERSUS_SQLITE_MAX_CONNECTIONS", 5)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: env_or("VERSUS_LOG_LEVEL", "info"),
        }
    }
}
