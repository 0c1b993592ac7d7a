use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_provider_timeout_sec() -> u64 {
    90
}

pub fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}

pub fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

pub fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-20240620".to_string()
}

pub fn default_anthropic_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

pub fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

pub fn default_anthropic_max_tokens() -> u32 {
    4096
}

pub fn default_vertex_model() -> String {
    "gemini-1.5-pro".to_string()
}

pub fn default_vertex_location() -> String {
    "asia-southeast1".to_string()
}

pub fn default_vertex_token_env() -> String {
    "VERTEX_ACCESS_TOKEN".to_string()
}

pub fn default_gcloud_binary() -> PathBuf {
    PathBuf::from("gcloud")
}

pub fn default_max_bundle_kb() -> f64 {
    5.0
}

pub fn default_max_reads_per_action() -> f64 {
    2.0
}

pub fn default_compression_factor() -> f64 {
    0.3
}

pub fn default_tti_ms_per_kb() -> f64 {
    2.0
}

pub fn default_audit_dir() -> PathBuf {
    PathBuf::from(".plan-quorum/audit")
}

pub fn default_true() -> bool {
    true
}
