// src/config/llm.rs
// Analyzer / explainer model configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::helpers::{env_optional, env_or, env_parsed};
use crate::error::Result;
use crate::llm::gemini::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Absent key leaves the analyzer and explainer disabled
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub analyzer_timeout_secs: u64,
    pub explainer_timeout_secs: u64,
}

impl LlmConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: env_optional("GEMINI_API_KEY"),
            model: env_or("GEMINI_MODEL", "gemini-2.5-flash"),
            base_url: env_or("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            analyzer_timeout_secs: env_parsed("VERSUS_ANALYZER_TIMEOUT_SECS", 60)?,
            explainer_timeout_secs: env_parsed("VERSUS_EXPLAINER_TIMEOUT_SECS", 60)?,
        })
    }

    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_secs(self.analyzer_timeout_secs)
    }

    pub fn explainer_timeout(&self) -> Duration {
        Duration::from_secs(self.explainer_timeout_secs)
    }
}
