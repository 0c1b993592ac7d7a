use crate::error::ProviderError;
use crate::provider::PlanProvider;
use crate::request::{ChangeSpec, SchemaContext};
use std::time::{Duration, Instant};
use tokio::time::timeout as tokio_timeout;
use tracing::{debug, warn};

use super::ProviderResult;

/// Call one provider with an upper time bound. Never fails: errors and
/// timeouts become an unsuccessful `ProviderResult`.
pub async fn execute_provider(
    provider: &dyn PlanProvider,
    spec: &ChangeSpec,
    schema: &SchemaContext,
    timeout: Duration,
) -> ProviderResult {
    let start = Instant::now();

    let outcome = match tokio_timeout(timeout, provider.generate_plan(spec, schema)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    };

    match outcome {
        Ok(plan) => {
            debug!(
                "Provider {} returned {} patches, {} reads, {} writes, {} steps in {:?}",
                provider.name(),
                plan.ui.patches.len(),
                plan.db.reads.len(),
                plan.db.writes.len(),
                plan.ps.steps.len(),
                start.elapsed()
            );
            ProviderResult::succeeded(provider.name(), plan, start.elapsed())
        }
        Err(e) => {
            warn!("Provider {} failed: {}", provider.name(), e);
            ProviderResult::failed(provider.name(), e.to_string(), start.elapsed())
        }
    }
}
