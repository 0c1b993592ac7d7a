use super::{build_prompt, http_error, truncate_chars, PlanProvider, MAX_ERROR_CHARS, SYSTEM_INSTRUCTION};
use crate::config::VertexConfig;
use crate::error::{ConfigError, ProviderError};
use crate::plan::{parse_plan, Plan};
use crate::request::{ChangeSpec, SchemaContext};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Vertex AI Gemini `generateContent`
pub struct VertexProvider {
    pub project: String,
    pub location: String,
    pub model: String,
    pub token_env: String,
    pub gcloud_binary: PathBuf,
    client: reqwest::Client,
}

impl VertexProvider {
    pub fn from_config(config: &VertexConfig) -> Result<Self, ConfigError> {
        let project = config
            .project
            .clone()
            .or_else(|| std::env::var("VERTEX_PROJECT").ok())
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingCredential(
                    "providers.vertex.project (or VERTEX_PROJECT) is not set".to_string(),
                )
            })?;

        Ok(Self {
            project,
            location: config.location.clone(),
            model: config.model.clone(),
            token_env: config.token_env.clone(),
            gcloud_binary: config.gcloud_binary.clone(),
            client: reqwest::Client::new(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{loc}-aiplatform.googleapis.com/v1/projects/{project}/locations/{loc}/publishers/google/models/{model}:generateContent",
            loc = self.location,
            project = self.project,
            model = self.model
        )
    }

    fn request_body(&self, spec: &ChangeSpec, schema: &SchemaContext) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(spec, schema) }],
            }],
            "generationConfig": { "temperature": 0.2 },
        })
    }

    /// Token from the environment, or minted by `gcloud auth print-access-token`
    async fn access_token(&self) -> Result<String, ProviderError> {
        if let Ok(token) = std::env::var(&self.token_env) {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }

        let mut cmd = Command::new(&self.gcloud_binary);
        cmd.arg("auth").arg("print-access-token");

        let output = tokio_timeout(TOKEN_TIMEOUT, cmd.output())
            .await
            .map_err(|_| ProviderError::Token(format!("gcloud timed out after {:?}", TOKEN_TIMEOUT)))?
            .map_err(ProviderError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Token(truncate_chars(stderr.trim(), MAX_ERROR_CHARS)));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(ProviderError::Token("gcloud printed an empty token".to_string()));
        }
        Ok(token)
    }
}

#[async_trait]
impl PlanProvider for VertexProvider {
    fn name(&self) -> &'static str {
        "vertex"
    }

    async fn generate_plan(
        &self,
        spec: &ChangeSpec,
        schema: &SchemaContext,
    ) -> Result<Plan, ProviderError> {
        let token = self.access_token().await?;

        let body = self.request_body(spec, schema);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error("vertex", response).await);
        }

        let data: Value = response.json().await?;
        let text = response_text(&data);
        debug!("vertex returned {} chars", text.len());

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse("vertex"));
        }
        parse_plan(&text)
    }
}

fn response_text(data: &Value) -> String {
    data.pointer("/candidates/0/content/parts")
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
