use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Upper bound for a single provider call, in seconds
    #[serde(default = "default_provider_timeout_sec")]
    pub provider_timeout_sec: u64,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub budget: BudgetConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub anthropic: AnthropicConfig,

    #[serde(default)]
    pub vertex: VertexConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_openai_model(),
            api_key_env: default_openai_key_env(),
            base_url: default_openai_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_anthropic_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,

    #[serde(default = "default_anthropic_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: default_anthropic_model(),
            api_key_env: default_anthropic_key_env(),
            base_url: default_anthropic_base_url(),
            max_tokens: default_anthropic_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct VertexConfig {
    #[serde(default = "default_vertex_model")]
    pub model: String,

    /// GCP project id; falls back to the VERTEX_PROJECT environment variable
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default = "default_vertex_location")]
    pub location: String,

    /// Environment variable holding a pre-minted OAuth access token
    #[serde(default = "default_vertex_token_env")]
    pub token_env: String,

    /// gcloud binary used to mint a token when `token_env` is unset
    #[serde(default = "default_gcloud_binary")]
    pub gcloud_binary: PathBuf,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            model: default_vertex_model(),
            project: None,
            location: default_vertex_location(),
            token_env: default_vertex_token_env(),
            gcloud_binary: default_gcloud_binary(),
        }
    }
}

/// Performance budget an agreed plan has to fit in
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct BudgetConfig {
    #[serde(default = "default_max_bundle_kb")]
    pub max_bundle_kb: f64,

    #[serde(default = "default_max_reads_per_action")]
    pub max_reads_per_action: f64,

    /// Minification/compression heuristic applied to raw patch size
    #[serde(default = "default_compression_factor")]
    pub compression_factor: f64,

    #[serde(default = "default_tti_ms_per_kb")]
    pub tti_ms_per_kb: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_bundle_kb: default_max_bundle_kb(),
            max_reads_per_action: default_max_reads_per_action(),
            compression_factor: default_compression_factor(),
            tti_ms_per_kb: default_tti_ms_per_kb(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AuditConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_audit_dir")]
    pub dir: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_audit_dir(),
        }
    }
}
