use serde::{Deserialize, Serialize};

/// Hosted chat-completion backends the client can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    OpenRouter,
    Gemini,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model_id: String,
    pub backend: Backend,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model_id: "mistralai/mistral-7b-instruct:free".to_string(),
            backend: Backend::OpenRouter,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// Read LLM_* variables from the environment, keeping defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.api_key = key;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.model_id = model;
        }
        if let Ok(backend) = std::env::var("LLM_BACKEND") {
            match backend.to_lowercase().as_str() {
                "openrouter" => config.backend = Backend::OpenRouter,
                "gemini" => config.backend = Backend::Gemini,
                other => {
                    tracing::warn!(backend = other, "unknown LLM_BACKEND, keeping default")
                }
            }
        }
        if let Ok(timeout) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.timeout_secs = secs;
            }
        }

        config
    }
}

/// Per-call generation knobs. Callers with different needs (a warm reply vs
/// a terse summary) pass their own values.
#[derive(Debug, Clone, Copy)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 200,
        }
    }
}
