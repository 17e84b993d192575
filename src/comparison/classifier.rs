// src/comparison/classifier.rs
// Deterministic per-issue-code verdict between two analyses. No AI involved.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVariant;
use crate::issues::Issue;
use crate::issues::rank::{complexity_delta, severity_delta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Improved,
    Unchanged,
    Worsened,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Improved => "IMPROVED",
            ChangeType::Unchanged => "UNCHANGED",
            ChangeType::Worsened => "WORSENED",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IMPROVED" => Ok(ChangeType::Improved),
            "UNCHANGED" => Ok(ChangeType::Unchanged),
            "WORSENED" => Ok(ChangeType::Worsened),
            _ => Err(UnknownVariant::new("change type", s)),
        }
    }
}

/// Classify one issue code given its representative on each side.
///
/// Rules, first match wins:
/// - only in `from`: resolved, IMPROVED
/// - only in `to`: introduced, WORSENED
/// - in both: severity rank decides; complexity rank only breaks severity ties
/// - in neither: UNCHANGED
pub fn classify(from: Option<&Issue>, to: Option<&Issue>) -> ChangeType {
    match (from, to) {
        (Some(_), None) => ChangeType::Improved,
        (None, Some(_)) => ChangeType::Worsened,
        (Some(before), Some(after)) => {
            let severity = severity_delta(before.severity, after.severity);
            let complexity = complexity_delta(before.complexity, after.complexity);
            // Severity dominates; never blend the two scales.
            match severity.cmp(&0).then(complexity.cmp(&0)) {
                Ordering::Less => ChangeType::Improved,
                Ordering::Greater => ChangeType::Worsened,
                Ordering::Equal => ChangeType::Unchanged,
            }
        }
        (None, None) => ChangeType::Unchanged,
    }
}
