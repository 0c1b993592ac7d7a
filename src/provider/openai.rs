use super::{build_prompt, http_error, require_env, PlanProvider, SYSTEM_INSTRUCTION};
use crate::config::OpenAiConfig;
use crate::error::{ConfigError, ProviderError};
use crate::plan::{parse_plan, Plan};
use crate::request::{ChangeSpec, SchemaContext};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// OpenAI Responses API
pub struct OpenAiProvider {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &OpenAiConfig) -> Result<Self, ConfigError> {
        let api_key = require_env(&config.api_key_env)?;
        Ok(Self::new(
            api_key,
            config.model.clone(),
            config.base_url.clone(),
        ))
    }
}

impl OpenAiProvider {
    fn request_body(&self, spec: &ChangeSpec, schema: &SchemaContext) -> Value {
        json!({
            "model": self.model,
            "input": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": build_prompt(spec, schema) },
            ],
            "temperature": 0.2,
        })
    }
}

#[async_trait]
impl PlanProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate_plan(
        &self,
        spec: &ChangeSpec,
        schema: &SchemaContext,
    ) -> Result<Plan, ProviderError> {
        let body = self.request_body(spec, schema);

        let url = format!("{}/v1/responses", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error("openai", response).await);
        }

        let data: Value = response.json().await?;
        let text = response_text(&data);
        debug!("openai returned {} chars", text.len());

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse("openai"));
        }
        parse_plan(&text)
    }
}

/// `output_text` when present, else the text parts of the first output item
fn response_text(data: &Value) -> String {
    if let Some(text) = data.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }

    data.pointer("/output/0/content")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
