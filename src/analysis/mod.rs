// src/analysis/mod.rs
pub mod analyzer;
pub mod payload;
pub mod service;
pub mod store;
pub mod types;

pub use analyzer::{Analyzer, LlmAnalyzer};
pub use service::AnalysisService;
pub use store::AnalysisStore;
pub use types::{Analysis, AnalysisDraft, AnalysisReport};
