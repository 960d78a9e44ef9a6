use anyhow::{Context, Result};

use llm::LlmConfig;

/// Service configuration, read once at startup. Missing store credentials
/// are a startup error; everything else has a sensible default.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub store_url: String,
    pub store_key: String,
    pub llm: LlmConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let store_url = std::env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?;
        let store_key = std::env::var("SUPABASE_KEY").context("SUPABASE_KEY must be set")?;
        let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());

        Ok(Self {
            bind_addr: format!("0.0.0.0:{port}"),
            store_url,
            store_key,
            llm: LlmConfig::from_env(),
        })
    }
}
