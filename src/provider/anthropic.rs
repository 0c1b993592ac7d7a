use super::{build_prompt, http_error, require_env, PlanProvider, SYSTEM_INSTRUCTION};
use crate::config::AnthropicConfig;
use crate::error::{ConfigError, ProviderError};
use crate::plan::{parse_plan, Plan};
use crate::request::{ChangeSpec, SchemaContext};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API
pub struct AnthropicProvider {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String, base_url: String, max_tokens: u32) -> Self {
        Self {
            api_key,
            model,
            base_url,
            max_tokens,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &AnthropicConfig) -> Result<Self, ConfigError> {
        let api_key = require_env(&config.api_key_env)?;
        Ok(Self::new(
            api_key,
            config.model.clone(),
            config.base_url.clone(),
            config.max_tokens,
        ))
    }
}

impl AnthropicProvider {
    fn request_body(&self, spec: &ChangeSpec, schema: &SchemaContext) -> Value {
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": 0.2,
            "system": SYSTEM_INSTRUCTION,
            "messages": [{ "role": "user", "content": build_prompt(spec, schema) }],
        })
    }
}

#[async_trait]
impl PlanProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate_plan(
        &self,
        spec: &ChangeSpec,
        schema: &SchemaContext,
    ) -> Result<Plan, ProviderError> {
        let body = self.request_body(spec, schema);

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error("anthropic", response).await);
        }

        let data: Value = response.json().await?;
        let text = response_text(&data);
        debug!("anthropic returned {} chars", text.len());

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse("anthropic"));
        }
        parse_plan(&text)
    }
}

fn response_text(data: &Value) -> String {
    data.get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::tests::serve_once;

    fn provider(base_url: String) -> AnthropicProvider {
        AnthropicProvider::new(
            "sk-ant-test".to_string(),
            "claude-3-5-sonnet-20240620".to_string(),
            base_url,
            1024,
        )
    }

    #[test]
    fn test_request_body() {
        let body = provider("https://api.anthropic.com".to_string()).request_body(
            &ChangeSpec::new("Add a tip field"),
            &SchemaContext::default(),
        );

        assert_eq!(body["model"], "claude-3-5-sonnet-20240620");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["system"], SYSTEM_INSTRUCTION);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("Add a tip field"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let base_url = serve_once(
            "529 Overloaded",
            r#"{"error":{"message":"overloaded for jane@shop.com"}}"#,
        )
        .await;

        let err = provider(base_url)
            .generate_plan(&ChangeSpec::new("x"), &SchemaContext::default())
            .await
            .unwrap_err();

        match err {
            ProviderError::Http { status, body, .. } => {
                assert_eq!(status, 529);
                assert!(body.contains("[EMAIL]"));
                assert!(!body.contains("jane@shop.com"));
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_successful_response_is_parsed() {
        let base_url = serve_once(
            "200 OK",
            r#"{"content":[{"type":"text","text":"{\"ui\":{\"patches\":[{\"targetPath\":\"src/Tip.jsx\"}]}}"}]}"#,
        )
        .await;

        let plan = provider(base_url)
            .generate_plan(&ChangeSpec::new("x"), &SchemaContext::default())
            .await
            .unwrap();
        assert_eq!(plan.ui.patches[0].target_path.as_deref(), Some("src/Tip.jsx"));
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let data = json!({
            "content": [
                {"type": "text", "text": "{\"ui\": {\"patches\": []}}"},
                {"type": "tool_use", "id": "x"}
            ]
        });
        assert_eq!(response_text(&data), "{\"ui\": {\"patches\": []}}");
    }

    #[test]
    fn test_response_text_without_content() {
        assert_eq!(response_text(&json!({"type": "error"})), "");
    }
}
