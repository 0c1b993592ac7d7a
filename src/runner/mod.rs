mod executor;
mod orchestrator;
mod types;

pub use executor::execute_provider;
pub use orchestrator::{
    generate_run_id, Orchestrator, OrchestratorOptions, INSUFFICIENT_RESPONSES, MIN_SUCCESSFUL,
    NO_QUORUM,
};
pub use types::{OrchestrationResult, ProviderResult};
