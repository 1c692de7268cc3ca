use crate::clients::ai::prompts::build_strategy_prompt;
use crate::clients::ai::schema::parse_strategies;
use crate::clients::ai::StrategyAnalyzer;
use crate::config::Config;
use crate::types::{OptionsData, Strategy};
use crate::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const SERVICE: &str = "OpenAI API";
const TIMEOUT_SECS: u64 = 120;

pub const COMPLETION_MODEL: &str = "gpt-4";
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

pub struct OpenAiClient {
    client: Client,
    completions_url: Url,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            completions_url: completions_url(&config.openai_api_base)?,
            api_key: config.openai_api_key.clone(),
        })
    }

    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: COMPLETION_MODEL,
            prompt,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.completions_url.clone())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::transport(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::upstream_status(
                SERVICE,
                status.as_u16(),
                &error_text,
                &self.api_key,
            ));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::unparseable(SERVICE, format!("unexpected envelope: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| AppError::unparseable(SERVICE, "no completion choices returned"))
    }

    pub async fn analyze(&self, options_data: &OptionsData) -> Result<Vec<Strategy>> {
        let prompt = build_strategy_prompt(options_data);
        tracing::debug!(prompt_chars = prompt.len(), "Requesting strategy completion");

        let text = self.complete(&prompt).await?;
        let strategies = parse_strategies(&text).map_err(|e| {
            tracing::warn!("Completion did not match the strategy schema: {}", e);
            e
        })?;

        tracing::info!(count = strategies.len(), "Parsed strategies from completion");
        Ok(strategies)
    }
}

// `Url::join` drops the last path segment unless the base ends with '/'.
fn completions_url(base: &Url) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("completions")
        .map_err(|e| AppError::Config(format!("Invalid OPENAI_API_BASE: {}", e)))
}

#[async_trait]
impl StrategyAnalyzer for OpenAiClient {
    async fn analyze_options(&self, options_data: &OptionsData) -> Result<Vec<Strategy>> {
        self.analyze(options_data).await
    }

    fn model_name(&self) -> &str {
        COMPLETION_MODEL
    }
}
