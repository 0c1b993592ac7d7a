//! Quorum-gated change planning across three AI backends.
//!
//! A change request is sent to three planners concurrently. The run succeeds
//! only when two of the returned plans agree on the UI files they touch and
//! the agreed plan fits the performance budget. Every run leaves an audit
//! record.

pub mod audit;
pub mod config;
pub mod error;
pub mod perf;
pub mod plan;
pub mod provider;
pub mod quorum;
pub mod request;
pub mod runner;
pub mod sanitize;

pub use runner::{Orchestrator, OrchestratorOptions, OrchestrationResult, ProviderResult};
