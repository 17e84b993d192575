// src/comparison/engine.rs
// Pure result-set computation: reduce both sides, union the codes, classify each

use std::collections::BTreeSet;

use super::classifier::classify;
use super::types::ResultDraft;
use crate::issues::{Issue, IssueCode, reduce_issues};

/// Compute one result per issue code present in either analysis.
///
/// Output is ordered by issue code; the order carries no meaning.
pub fn diff_issues(from: &[Issue], to: &[Issue]) -> Vec<ResultDraft> {
    let before = reduce_issues(from);
    let after = reduce_issues(to);

    let codes: BTreeSet<IssueCode> = before.keys().chain(after.keys()).copied().collect();

    codes
        .into_iter()
        .map(|code| {
            let from_issue = before.get(&code).copied();
            let to_issue = after.get(&code).copied();
            ResultDraft {
                issue_code: code,
                change_type: classify(from_issue, to_issue),
                before_severity: from_issue.map(|i| i.severity),
                before_complexity: from_issue.map(|i| i.complexity),
                after_severity: to_issue.map(|i| i.severity),
                after_complexity: to_issue.map(|i| i.complexity),
            }
        })
        .collect()
}
