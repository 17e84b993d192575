// src/llm/prompt.rs
// Prompt text for the analyzer and the explainer

use crate::comparison::{ChangeType, ComparisonResult};
use crate::issues::IssueCode;

/// Analyzer prompt. The reply must be bare JSON matching the payload the
/// analysis decoder accepts.
pub fn analysis_prompt(source_code: &str) -> String {
    let codes = IssueCode::ALL
        .iter()
        .map(|code| format!("- {}: {}", code.as_str(), code.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a code reviewer. Find performance, quality, security, error-handling and best-practice issues in the code below.

Use ONLY these issue codes:
{codes}

Respond with JSON only, no markdown, in exactly this shape:
{{
  "summary": "one or two sentences about overall code health",
  "issues": [
    {{
      "issueCode": "ONE_OF_THE_CODES_ABOVE",
      "severity": "low" | "medium" | "high",
      "complexity": "O_1" | "O_n" | "O_n2",
      "functionName": "name of the enclosing function, if any",
      "startLine": 1,
      "endLine": 1,
      "beforeSnippet": "the offending code, at most 5 lines",
      "afterSnippet": "a suggested fix, at most 5 lines"
    }}
  ]
}}

Line numbers start at 1. Report nothing you are not confident about.

Code:
```
{source_code}
```"#
    )
}

/// Explainer prompt. Carries only the computed results, never source code.
pub fn explanation_prompt(results: &[ComparisonResult]) -> String {
    let count = |kind: ChangeType| results.iter().filter(|r| r.change_type == kind).count();
    let improved = count(ChangeType::Improved);
    let worsened = count(ChangeType::Worsened);
    let unchanged = count(ChangeType::Unchanged);

    let lines = results
        .iter()
        .map(|r| {
            format!(
                "- {} ({}): {} -> {}",
                r.issue_code,
                r.change_type,
                describe(r.before_severity.map(|s| s.as_str()), r.before_complexity.map(|c| c.as_str())),
                describe(r.after_severity.map(|s| s.as_str()), r.after_complexity.map(|c| c.as_str())),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Two versions of the same code were analyzed and compared issue by issue.

Improved: {improved}
Worsened: {worsened}
Unchanged: {unchanged}

Per issue (severity/complexity before -> after):
{lines}

In plain language for a developer, explain in a short paragraph what got better, what got worse, and what to look at next. Do not invent issues that are not listed."#
    )
}

fn describe(severity: Option<&str>, complexity: Option<&str>) -> String {
    match (severity, complexity) {
        (Some(s), Some(c)) => format!("{s}/{c}"),
        _ => "absent".to_string(),
    }
}
