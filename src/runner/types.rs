use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::plan::{normalize, NormalizedPlan, Plan};
use crate::provider::{truncate_chars, MAX_ERROR_CHARS};
use crate::sanitize::sanitize;

/// What one provider produced during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResult {
    pub provider_name: String,
    pub success: bool,
    /// The plan as the provider returned it, before normalization
    pub plan: Option<Plan>,
    pub error: Option<String>,
    /// SHA-256 of the normalized plan's canonical JSON
    pub plan_hash: Option<String>,
    pub latency_ms: u64,
}

impl ProviderResult {
    pub fn succeeded(provider_name: impl Into<String>, plan: Plan, latency: Duration) -> Self {
        let plan_hash = normalize(&plan).content_hash().ok();
        Self {
            provider_name: provider_name.into(),
            success: true,
            plan: Some(plan),
            error: None,
            plan_hash,
            latency_ms: latency.as_millis() as u64,
        }
    }

    /// The error text is redacted and truncated since it ends up in the audit
    pub fn failed(
        provider_name: impl Into<String>,
        error: impl AsRef<str>,
        latency: Duration,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            success: false,
            plan: None,
            error: Some(truncate_chars(&sanitize(error.as_ref()), MAX_ERROR_CHARS)),
            plan_hash: None,
            latency_ms: latency.as_millis() as u64,
        }
    }

    /// Counts toward the quorum only when it succeeded with a plan
    pub fn usable_plan(&self) -> Option<&Plan> {
        if self.success {
            self.plan.as_ref()
        } else {
            None
        }
    }
}

/// Returned to the caller for every run, successful or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    pub success: bool,
    pub quorum_met: bool,
    pub agreed_plan: Option<NormalizedPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreed_plan_hash: Option<String>,
    pub providers: Vec<ProviderResult>,
    pub audit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrchestrationResult {
    pub fn succeeded(
        run_id: &str,
        providers: Vec<ProviderResult>,
        agreed_plan: NormalizedPlan,
        agreed_plan_hash: String,
    ) -> Self {
        Self {
            success: true,
            quorum_met: true,
            agreed_plan: Some(agreed_plan),
            agreed_plan_hash: Some(agreed_plan_hash),
            providers,
            audit_id: run_id.to_string(),
            error: None,
        }
    }

    pub fn failed(run_id: &str, providers: Vec<ProviderResult>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            quorum_met: false,
            agreed_plan: None,
            agreed_plan_hash: None,
            providers,
            audit_id: run_id.to_string(),
            error: Some(error.into()),
        }
    }
}
