// src/analysis/payload.rs
// Untrusted analyzer output -> typed AnalysisDraft. Nothing passes through unchecked.

use serde::Deserialize;

use super::types::AnalysisDraft;
use crate::error::{Result, VersusError};
use crate::issues::{Complexity, IssueCode, IssueDraft, Severity};

/// Snippets are advisory; anything longer is cut to this many lines
const MAX_SNIPPET_LINES: usize = 5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    summary: String,
    #[serde(default)]
    issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIssue {
    issue_code: IssueCode,
    severity: Severity,
    complexity: Complexity,
    #[serde(default)]
    function_name: Option<String>,
    #[serde(default)]
    start_line: Option<u32>,
    #[serde(default)]
    end_line: Option<u32>,
    #[serde(default)]
    before_snippet: Option<String>,
    #[serde(default)]
    after_snippet: Option<String>,
}

/// Decode the analyzer's text response.
///
/// Markdown code fences are tolerated. Unknown issue codes, severities or
/// complexities, malformed JSON, and bad line ranges all reject the whole
/// payload; the caller degrades to an empty analysis.
pub fn decode_analysis(text: &str) -> Result<AnalysisDraft> {
    let body = strip_code_fences(text);
    let raw: RawAnalysis = serde_json::from_str(body)
        .map_err(|e| VersusError::Analyzer(format!("analyzer returned an invalid payload: {e}")))?;

    let issues = raw
        .issues
        .into_iter()
        .enumerate()
        .map(|(index, issue)| validate_issue(index, issue))
        .collect::<Result<Vec<_>>>()?;

    Ok(AnalysisDraft {
        summary: raw.summary.trim().to_string(),
        issues,
    })
}

fn validate_issue(index: usize, raw: RawIssue) -> Result<IssueDraft> {
    if raw.start_line == Some(0) || raw.end_line == Some(0) {
        return Err(VersusError::Analyzer(format!(
            "issue {index}: line numbers start at 1"
        )));
    }
    if let (Some(start), Some(end)) = (raw.start_line, raw.end_line) {
        if end < start {
            return Err(VersusError::Analyzer(format!(
                "issue {index}: endLine {end} precedes startLine {start}"
            )));
        }
    }

    Ok(IssueDraft {
        issue_code: raw.issue_code,
        severity: raw.severity,
        complexity: raw.complexity,
        function_name: non_blank(raw.function_name),
        start_line: raw.start_line,
        end_line: raw.end_line,
        before_snippet: non_blank(raw.before_snippet).map(truncate_snippet),
        after_snippet: non_blank(raw.after_snippet).map(truncate_snippet),
    })
}

fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn truncate_snippet(snippet: String) -> String {
    if snippet.lines().count() <= MAX_SNIPPET_LINES {
        return snippet;
    }
    snippet
        .lines()
        .take(MAX_SNIPPET_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_fenced_payload() {
        let text = r#"```json
{
  "summary": "One nested loop.",
  "issues": [
    {"issueCode": "NESTED_LOOP", "severity": "high", "complexity": "O_n2",
     "functionName": "find_pairs", "startLine": 3, "endLine": 9}
  ]
}
```"#;
        let draft = decode_analysis(text).unwrap();
        assert_eq!(draft.summary, "One nested loop.");
        assert_eq!(draft.issues.len(), 1);
        let issue = &draft.issues[0];
        assert_eq!(issue.issue_code, IssueCode::NestedLoop);
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.complexity, Complexity::Quadratic);
        assert_eq!(issue.function_name.as_deref(), Some("find_pairs"));
        assert_eq!((issue.start_line, issue.end_line), (Some(3), Some(9)));
    }

    #[test]
    fn test_missing_issues_means_no_issues() {
        let draft = decode_analysis(r#"{"summary": "clean"}"#).unwrap();
        assert!(draft.issues.is_empty());
    }

    #[test]
    fn test_rejects_unknown_issue_code() {
        let text = r#"{"summary": "x", "issues": [
            {"issueCode": "SPAGHETTI", "severity": "low", "complexity": "O_1"}]}"#;
        assert!(matches!(decode_analysis(text), Err(VersusError::Analyzer(_))));
    }

    #[test]
    fn test_rejects_unknown_severity_and_complexity() {
        let bad_severity = r#"{"summary": "x", "issues": [
            {"issueCode": "DEAD_CODE", "severity": "critical", "complexity": "O_1"}]}"#;
        assert!(decode_analysis(bad_severity).is_err());

        let bad_complexity = r#"{"summary": "x", "issues": [
            {"issueCode": "DEAD_CODE", "severity": "low", "complexity": "O_log_n"}]}"#;
        assert!(decode_analysis(bad_complexity).is_err());
    }

    #[test]
    fn test_rejects_inverted_line_range() {
        let text = r#"{"summary": "x", "issues": [
            {"issueCode": "DEAD_CODE", "severity": "low", "complexity": "O_1",
             "startLine": 10, "endLine": 4}]}"#;
        let err = decode_analysis(text).unwrap_err();
        assert!(err.to_string().contains("endLine"));

        let zero = r#"{"summary": "x", "issues": [
            {"issueCode": "DEAD_CODE", "severity": "low", "complexity": "O_1", "startLine": 0}]}"#;
        assert!(decode_analysis(zero).is_err());
    }

    #[test]
    fn test_rejects_prose() {
        assert!(decode_analysis("I could not analyze this code, sorry!").is_err());
    }

    #[test]
    fn test_snippets_are_capped() {
        let long = (1..=8).map(|n| format!("line{n}")).collect::<Vec<_>>().join("\\n");
        let text = format!(
            r#"{{"summary": "x", "issues": [{{"issueCode": "LONG_FUNCTION", "severity": "low",
               "complexity": "O_n", "beforeSnippet": "{long}", "afterSnippet": "  "}}]}}"#
        );
        let draft = decode_analysis(&text).unwrap();
        let snippet = draft.issues[0].before_snippet.as_deref().unwrap();
        assert_eq!(snippet.lines().count(), 5);
        assert!(draft.issues[0].after_snippet.is_none());
    }
}
