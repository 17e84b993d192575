// src/explain/mod.rs
//! Free-text explanation of a comparison, generated once and kept

pub mod explainer;
pub mod service;
pub mod store;
pub mod types;

pub use explainer::{Explainer, LlmExplainer};
pub use service::{ExplanationOutcome, ExplanationService};
pub use store::ExplanationStore;
pub use types::Explanation;
