//! Plan model: typed proposals, canonical normalization and extraction from
//! model output.

pub mod normalize;
pub mod parser;
pub mod types;

pub use normalize::{normalize, NormalizedPlan};
pub use parser::parse_plan;
pub use types::{DbOperation, DbPlan, Patch, Plan, PsPlan, Step, UiPlan};
