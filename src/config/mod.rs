// src/config/mod.rs
// Central configuration, loaded from the environment (and .env when present)

pub mod helpers;
pub mod llm;
pub mod server;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration structure - composes all domain configs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersusConfig {
    pub server: server::ServerConfig,
    pub database: server::DatabaseConfig,
    pub llm: llm::LlmConfig,
    pub logging: server::LoggingConfig,
}

impl VersusConfig {
    pub fn from_env() -> Result<Self> {
        // Don't fail if .env doesn't exist
        dotenvy::dotenv().ok();

        Ok(Self {
            server: server::ServerConfig::from_env()?,
            database: server::DatabaseConfig::from_env()?,
            llm: llm::LlmConfig::from_env()?,
            logging: server::LoggingConfig::from_env(),
        })
    }
}
