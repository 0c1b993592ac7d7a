mod anthropic;
mod openai;
mod prompt;
mod vertex;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
pub use prompt::{build_prompt, SYSTEM_INSTRUCTION};
pub use vertex::VertexProvider;

use crate::config::Config;
use crate::error::{ConfigError, ProviderError};
use crate::plan::Plan;
use crate::request::{ChangeSpec, SchemaContext};
use crate::sanitize::sanitize;
use async_trait::async_trait;
use std::sync::Arc;

/// Longest error text kept from a provider
pub const MAX_ERROR_CHARS: usize = 2000;

/// A planning backend that turns a change request into a plan
#[async_trait]
pub trait PlanProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate_plan(
        &self,
        spec: &ChangeSpec,
        schema: &SchemaContext,
    ) -> Result<Plan, ProviderError>;
}

/// Build the three production providers from config, in fan-out order
pub fn create_providers(config: &Config) -> Result<[Arc<dyn PlanProvider>; 3], ConfigError> {
    let openai = OpenAiProvider::from_config(&config.providers.openai)?;
    let vertex = VertexProvider::from_config(&config.providers.vertex)?;
    let anthropic = AnthropicProvider::from_config(&config.providers.anthropic)?;

    let providers: [Arc<dyn PlanProvider>; 3] =
        [Arc::new(openai), Arc::new(vertex), Arc::new(anthropic)];
    Ok(providers)
}

/// Read a required secret from the environment
fn require_env(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential(format!(
            "environment variable {} is not set",
            var
        ))),
    }
}

/// Keep at most `max` characters
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Turn a non-success HTTP response into a provider error
async fn http_error(provider: &'static str, response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    status_error(provider, status, &body)
}

/// Backends may echo the request back, so the body is redacted before it
/// can reach logs or the audit trail
fn status_error(provider: &'static str, status: u16, body: &str) -> ProviderError {
    ProviderError::Http {
        provider,
        status,
        body: truncate_chars(&sanitize(body), MAX_ERROR_CHARS),
    }
}
