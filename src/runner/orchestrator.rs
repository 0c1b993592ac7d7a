use crate::audit::{AuditRecorder, RunMetrics};
use crate::config::{BudgetConfig, Config};
use crate::error::{ConfigError, OrchestratorError};
use crate::perf::{validate_performance_with, PerfMetrics};
use crate::plan::{normalize, NormalizedPlan};
use crate::provider::{create_providers, PlanProvider};
use crate::quorum::find_quorum;
use crate::request::{ChangeSpec, SchemaContext};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

use super::executor::execute_provider;
use super::{OrchestrationResult, ProviderResult};

/// Successful providers needed before plans are compared
pub const MIN_SUCCESSFUL: usize = 2;

pub const INSUFFICIENT_RESPONSES: &str = "Insufficient successful AI responses (need 2/3)";
pub const NO_QUORUM: &str = "No quorum reached: AI providers disagree";

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Upper bound for each provider call; a timeout counts as a provider failure
    pub provider_timeout: Duration,
    pub budget: BudgetConfig,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OrchestratorOptions {
    fn from(config: &Config) -> Self {
        Self {
            provider_timeout: config.provider_timeout(),
            budget: config.budget.clone(),
        }
    }
}

/// The decided result plus whatever budget figures were computed on the way
struct Outcome {
    result: OrchestrationResult,
    perf: Option<PerfMetrics>,
}

impl Outcome {
    fn failed(run_id: &str, providers: &[ProviderResult], error: impl Into<String>) -> Self {
        Self {
            result: OrchestrationResult::failed(run_id, providers.to_vec(), error),
            perf: None,
        }
    }
}

/// Fans a change request out to three planners and gates the result on a
/// 2-of-3 quorum plus the performance budget
pub struct Orchestrator {
    providers: [Arc<dyn PlanProvider>; 3],
    recorder: AuditRecorder,
    options: OrchestratorOptions,
}

impl Orchestrator {
    pub fn new(
        providers: [Arc<dyn PlanProvider>; 3],
        recorder: AuditRecorder,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            providers,
            recorder,
            options,
        }
    }

    /// Production wiring: HTTP providers and the configured audit store
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            create_providers(config)?,
            AuditRecorder::from_config(&config.audit),
            OrchestratorOptions::from(config),
        ))
    }

    /// Run one orchestration. Always returns a well-formed result; every
    /// failure is reported through `success = false` and `error`.
    #[instrument(skip_all, fields(run_id))]
    pub async fn orchestrate(&self, spec: ChangeSpec, schema: SchemaContext) -> OrchestrationResult {
        let run_id = generate_run_id();
        tracing::Span::current().record("run_id", run_id.as_str());
        let start = Instant::now();

        info!(
            "[{}] Starting {}-provider generation",
            run_id,
            self.providers.len()
        );

        let spec = Arc::new(spec);
        let schema = Arc::new(schema);
        let providers = self.fan_out(&spec, &schema).await;

        let outcome = match self.evaluate(&run_id, &providers) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("[{}] Unexpected failure: {}", run_id, e);
                Outcome {
                    result: OrchestrationResult::failed(&run_id, providers, e.to_string()),
                    perf: None,
                }
            }
        };

        let metrics = RunMetrics {
            total_latency_ms: start.elapsed().as_millis() as u64,
            perf: outcome.perf,
        };

        match &outcome.result.error {
            None => info!("[{}] Success in {}ms", run_id, metrics.total_latency_ms),
            Some(e) => warn!("[{}] Failed in {}ms: {}", run_id, metrics.total_latency_ms, e),
        }

        self.recorder
            .save_audit(&run_id, &spec, &outcome.result, Some(metrics))
            .await;

        outcome.result
    }

    /// Call every provider concurrently and wait for all of them
    async fn fan_out(
        &self,
        spec: &Arc<ChangeSpec>,
        schema: &Arc<SchemaContext>,
    ) -> Vec<ProviderResult> {
        let timeout = self.options.provider_timeout;

        let handles = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let spec = Arc::clone(spec);
            let schema = Arc::clone(schema);
            tokio::spawn(async move {
                execute_provider(provider.as_ref(), &spec, &schema, timeout).await
            })
        });

        let joined = join_all(handles).await;

        joined
            .into_iter()
            .zip(self.providers.iter())
            .map(|(joined, provider)| match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!("Provider {} task panicked: {}", provider.name(), e);
                    ProviderResult::failed(
                        provider.name(),
                        format!("Provider task failed: {}", e),
                        Duration::ZERO,
                    )
                }
            })
            .collect()
    }

    /// Decide the run from the collected provider results
    fn evaluate(
        &self,
        run_id: &str,
        providers: &[ProviderResult],
    ) -> Result<Outcome, OrchestratorError> {
        let successful: Vec<_> = providers.iter().filter_map(|p| p.usable_plan()).collect();

        info!(
            "[{}] Successful: {}/{}",
            run_id,
            successful.len(),
            providers.len()
        );

        if successful.len() < MIN_SUCCESSFUL {
            return Ok(Outcome::failed(run_id, providers, INSUFFICIENT_RESPONSES));
        }

        let normalized: Vec<NormalizedPlan> = successful.into_iter().map(normalize).collect();

        let quorum = find_quorum(&normalized);
        if !quorum.found {
            return Ok(Outcome::failed(run_id, providers, NO_QUORUM));
        }

        let agreed = quorum
            .indices
            .first()
            .and_then(|&i| normalized.get(i))
            .cloned()
            .ok_or_else(|| OrchestratorError::InvalidQuorum(quorum.indices.clone()))?;

        info!("[{}] Quorum between plans {:?}", run_id, quorum.indices);

        let validation = validate_performance_with(agreed.as_plan(), &self.options.budget);
        if !validation.valid {
            return Ok(Outcome {
                result: OrchestrationResult::failed(
                    run_id,
                    providers.to_vec(),
                    format!(
                        "Performance budget exceeded: {}",
                        validation.issues.join(", ")
                    ),
                ),
                perf: Some(validation.metrics),
            });
        }

        let hash = agreed.content_hash()?;

        Ok(Outcome {
            result: OrchestrationResult::succeeded(run_id, providers.to_vec(), agreed, hash),
            perf: Some(validation.metrics),
        })
    }
}

/// `run_<unix millis>_<8 hex chars>`
pub fn generate_run_id() -> String {
    format!(
        "run_{}_{:08x}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}
