// src/issues/mod.rs
pub mod rank;
pub mod reducer;
pub mod types;

pub use reducer::{ReducedAnalysis, reduce_issues};
pub use types::{Complexity, Issue, IssueCategory, IssueCode, IssueDraft, Severity};
