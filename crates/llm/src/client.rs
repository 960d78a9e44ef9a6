use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{Backend, LlmConfig, SamplingOptions};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Text-in, text-out contract shared by the real client and test doubles.
#[allow(async_fn_in_trait)]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str, opts: &SamplingOptions) -> Result<String>;

    /// Infallible variant: any transport or protocol failure is logged and
    /// collapses to an empty string, never an error.
    async fn call(&self, prompt: &str, opts: &SamplingOptions) -> String {
        match self.generate(prompt, opts).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "model call failed, treating as empty response");
                String::new()
            }
        }
    }
}

#[derive(Clone)]
pub struct LlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client for the LLM backend")?;

        Ok(Self { config, client })
    }

    async fn generate_openrouter(&self, prompt: &str, opts: &SamplingOptions) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
        };

        let response = self
            .client
            .post(OPENROUTER_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("failed to send request to OpenRouter")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            anyhow::bail!("OpenRouter request failed: {} - {}", status, excerpt);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("failed to parse OpenRouter response")?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .context("OpenRouter response contained no choices")?;

        Ok(choice.message.content)
    }

    async fn generate_gemini(&self, prompt: &str, opts: &SamplingOptions) -> Result<String> {
        let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, self.config.model_id);

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": opts.temperature,
                "maxOutputTokens": opts.max_tokens,
                "topP": 0.9,
            }
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("failed to send request to Gemini")?;

        if !response.status().is_success() {
            anyhow::bail!("Gemini request failed: {}", response.status());
        }

        let result: serde_json::Value = response
            .json()
            .await
            .context("failed to parse Gemini response")?;

        let text = result["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        if text.is_empty() {
            anyhow::bail!("Gemini response contained no text");
        }

        Ok(text)
    }
}

impl TextModel for LlmClient {
    async fn generate(&self, prompt: &str, opts: &SamplingOptions) -> Result<String> {
        match self.config.backend {
            Backend::OpenRouter => self.generate_openrouter(prompt, opts).await,
            Backend::Gemini => self.generate_gemini(prompt, opts).await,
        }
    }
}
