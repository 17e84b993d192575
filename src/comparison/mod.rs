// src/comparison/mod.rs
//! Version-to-version comparison: classify each issue code, persist once per pair

pub mod classifier;
pub mod engine;
pub mod service;
pub mod store;
pub mod types;

pub use classifier::{ChangeType, classify};
pub use engine::diff_issues;
pub use service::ComparisonService;
pub use store::{ComparisonStore, Inserted};
pub use types::{
    CompareAnalysesRequest, CompareVersionsRequest, Comparison, ComparisonOutcome,
    ComparisonResult, ResultDraft,
};
