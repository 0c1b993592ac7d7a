//! Append-only audit trail, one record per orchestration run.
//!
//! Writing the record is best-effort: the recorder logs and swallows store
//! failures so that persistence problems never change the outcome of a run.

mod file;
mod memory;

pub use file::FileAuditStore;
pub use memory::MemoryAuditStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::perf::PerfMetrics;
use crate::plan::NormalizedPlan;
use crate::request::ChangeSpec;
use crate::runner::{OrchestrationResult, ProviderResult};
use crate::sanitize::sanitize;

/// Timing and budget figures for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetrics {
    pub total_latency_ms: u64,
    /// Present once an agreed plan went through budget validation
    pub perf: Option<PerfMetrics>,
}

/// Persisted decision trail of one run. Never mutated after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub run_id: String,
    pub sanitized_spec: String,
    pub responses: Vec<ProviderResult>,
    pub quorum_result: bool,
    pub agreed_plan: Option<NormalizedPlan>,
    pub agreed_plan_hash: Option<String>,
    pub performance_metrics: Option<RunMetrics>,
    pub success: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Keyed, append-only storage for audit records
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Store a new record; fails if one already exists for the run id
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;

    async fn get(&self, run_id: &str) -> Result<AuditRecord, AuditError>;

    /// Run ids of every stored record, sorted
    async fn list(&self) -> Result<Vec<String>, AuditError>;
}

/// Writes audit records for the orchestrator
#[derive(Clone)]
pub struct AuditRecorder {
    store: Option<Arc<dyn AuditStore>>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A recorder that persists nothing
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        if config.enabled {
            Self::new(Arc::new(FileAuditStore::new(config.dir.clone())))
        } else {
            Self::disabled()
        }
    }

    /// Persist one record for the run. Errors are logged, never returned.
    pub async fn save_audit(
        &self,
        run_id: &str,
        spec: &ChangeSpec,
        result: &OrchestrationResult,
        metrics: Option<RunMetrics>,
    ) {
        let Some(store) = &self.store else {
            debug!("Audit disabled, skipping record for {}", run_id);
            return;
        };

        let record = AuditRecord {
            run_id: run_id.to_string(),
            sanitized_spec: sanitize(spec.as_str()),
            responses: result.providers.clone(),
            quorum_result: result.quorum_met,
            agreed_plan: result.agreed_plan.clone(),
            agreed_plan_hash: result.agreed_plan_hash.clone(),
            performance_metrics: metrics,
            success: result.success,
            error: result.error.clone(),
            created_at: Utc::now(),
        };

        match store.append(&record).await {
            Ok(()) => debug!("Saved audit record {}", run_id),
            Err(e) => warn!("Failed to save audit record {}: {}", run_id, e),
        }
    }
}

/// Run ids double as file names; keep them to a safe alphabet
fn is_valid_run_id(run_id: &str) -> bool {
    !run_id.is_empty()
        && run_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
