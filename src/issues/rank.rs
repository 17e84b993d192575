// src/issues/rank.rs
// Total orders over severity and complexity. Lower rank is better.

use super::types::{Complexity, Severity};

impl Severity {
    /// low=1, medium=2, high=3
    pub const fn rank(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

impl Complexity {
    /// O(1)=1, O(n)=2, O(n²)=3
    pub const fn rank(self) -> u8 {
        match self {
            Complexity::Constant => 1,
            Complexity::Linear => 2,
            Complexity::Quadratic => 3,
        }
    }
}

/// Signed rank movement from `before` to `after`; negative means better
pub fn severity_delta(before: Severity, after: Severity) -> i8 {
    after.rank() as i8 - before.rank() as i8
}

pub fn complexity_delta(before: Complexity, after: Complexity) -> i8 {
    after.rank() as i8 - before.rank() as i8
}
