// src/issues/reducer.rs
// Collapse duplicate issue codes within one analysis to a single representative

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::types::{Issue, IssueCode};

/// issue code -> worst instance of that code in one analysis
pub type ReducedAnalysis<'a> = BTreeMap<IssueCode, &'a Issue>;

/// Keep the highest-severity issue per code.
///
/// Ties on severity keep whichever issue came first in `issues`. The tie-break
/// is deliberately arbitrary: stored analyses are loaded in insertion order, so
/// it is stable for a given analysis, but no meaning attaches to which instance
/// wins. Codes with no issues are simply absent from the map.
pub fn reduce_issues<'a, I>(issues: I) -> ReducedAnalysis<'a>
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut reduced = BTreeMap::new();
    for issue in issues {
        match reduced.entry(issue.issue_code) {
            Entry::Vacant(slot) => {
                slot.insert(issue);
            }
            Entry::Occupied(mut slot) => {
                if issue.severity.rank() > slot.get().severity.rank() {
                    slot.insert(issue);
                }
            }
        }
    }
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::types::{Complexity, Severity};

    fn issue(id: &str, code: IssueCode, severity: Severity, complexity: Complexity) -> Issue {
        Issue {
            id: id.to_string(),
            analysis_id: "a1".to_string(),
            issue_code: code,
            severity,
            complexity,
            function_name: None,
            start_line: None,
            end_line: None,
            before_snippet: None,
            after_snippet: None,
        }
    }

    #[test]
    fn test_keeps_highest_severity() {
        let issues = vec![
            issue("1", IssueCode::NestedLoop, Severity::Low, Complexity::Linear),
            issue("2", IssueCode::NestedLoop, Severity::High, Complexity::Linear),
            issue("3", IssueCode::NestedLoop, Severity::Medium, Complexity::Quadratic),
        ];
        let reduced = reduce_issues(&issues);
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[&IssueCode::NestedLoop].severity, Severity::High);
        assert_eq!(reduced[&IssueCode::NestedLoop].id, "2");
    }

    #[test]
    fn test_severity_tie_keeps_first_encountered() {
        let issues = vec![
            issue("first", IssueCode::MagicNumber, Severity::Medium, Complexity::Constant),
            issue("second", IssueCode::MagicNumber, Severity::Medium, Complexity::Quadratic),
        ];
        let reduced = reduce_issues(&issues);
        assert_eq!(reduced[&IssueCode::MagicNumber].id, "first");
    }

    #[test]
    fn test_distinct_codes_are_kept_and_absent_codes_missing() {
        let issues = vec![
            issue("1", IssueCode::SqlInjection, Severity::High, Complexity::Constant),
            issue("2", IssueCode::DeadCode, Severity::Low, Complexity::Constant),
        ];
        let reduced = reduce_issues(&issues);
        assert_eq!(reduced.len(), 2);
        assert!(reduced.contains_key(&IssueCode::SqlInjection));
        assert!(reduced.contains_key(&IssueCode::DeadCode));
        assert!(!reduced.contains_key(&IssueCode::NestedLoop));
    }

    #[test]
    fn test_empty_input() {
        let issues: Vec<Issue> = Vec::new();
        assert!(reduce_issues(&issues).is_empty());
    }
}
