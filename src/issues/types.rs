// src/issues/types.rs
// Closed vocabularies for analysis issues plus the Issue record itself

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVariant;

/// Fixed catalogue of issue codes an analysis may report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    // Performance
    NestedLoop,
    InefficientAlgorithm,
    MemoryLeak,
    NPlusOneQuery,
    BlockingOperation,
    // Quality
    UnusedVariable,
    MagicNumber,
    LongFunction,
    DuplicateCode,
    DeadCode,
    ComplexCondition,
    DeepNesting,
    // Security
    HardcodedSecret,
    SqlInjection,
    XssVulnerability,
    InsecureRandom,
    // Error handling
    EmptyCatch,
    MissingErrorHandling,
    SwallowedException,
    // Best practice
    MissingNullCheck,
    MissingTypeAnnotation,
    InconsistentNaming,
    GodFunction,
    MissingReturnType,
}

impl IssueCode {
    pub const ALL: [IssueCode; 24] = [
        IssueCode::NestedLoop,
        IssueCode::InefficientAlgorithm,
        IssueCode::MemoryLeak,
        IssueCode::NPlusOneQuery,
        IssueCode::BlockingOperation,
        IssueCode::UnusedVariable,
        IssueCode::MagicNumber,
        IssueCode::LongFunction,
        IssueCode::DuplicateCode,
        IssueCode::DeadCode,
        IssueCode::ComplexCondition,
        IssueCode::DeepNesting,
        IssueCode::HardcodedSecret,
        IssueCode::SqlInjection,
        IssueCode::XssVulnerability,
        IssueCode::InsecureRandom,
        IssueCode::EmptyCatch,
        IssueCode::MissingErrorHandling,
        IssueCode::SwallowedException,
        IssueCode::MissingNullCheck,
        IssueCode::MissingTypeAnnotation,
        IssueCode::InconsistentNaming,
        IssueCode::GodFunction,
        IssueCode::MissingReturnType,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::NestedLoop => "NESTED_LOOP",
            IssueCode::InefficientAlgorithm => "INEFFICIENT_ALGORITHM",
            IssueCode::MemoryLeak => "MEMORY_LEAK",
            IssueCode::NPlusOneQuery => "N_PLUS_ONE_QUERY",
            IssueCode::BlockingOperation => "BLOCKING_OPERATION",
            IssueCode::UnusedVariable => "UNUSED_VARIABLE",
            IssueCode::MagicNumber => "MAGIC_NUMBER",
            IssueCode::LongFunction => "LONG_FUNCTION",
            IssueCode::DuplicateCode => "DUPLICATE_CODE",
            IssueCode::DeadCode => "DEAD_CODE",
            IssueCode::ComplexCondition => "COMPLEX_CONDITION",
            IssueCode::DeepNesting => "DEEP_NESTING",
            IssueCode::HardcodedSecret => "HARDCODED_SECRET",
            IssueCode::SqlInjection => "SQL_INJECTION",
            IssueCode::XssVulnerability => "XSS_VULNERABILITY",
            IssueCode::InsecureRandom => "INSECURE_RANDOM",
            IssueCode::EmptyCatch => "EMPTY_CATCH",
            IssueCode::MissingErrorHandling => "MISSING_ERROR_HANDLING",
            IssueCode::SwallowedException => "SWALLOWED_EXCEPTION",
            IssueCode::MissingNullCheck => "MISSING_NULL_CHECK",
            IssueCode::MissingTypeAnnotation => "MISSING_TYPE_ANNOTATION",
            IssueCode::InconsistentNaming => "INCONSISTENT_NAMING",
            IssueCode::GodFunction => "GOD_FUNCTION",
            IssueCode::MissingReturnType => "MISSING_RETURN_TYPE",
        }
    }

    pub fn category(self) -> IssueCategory {
        use IssueCode::*;
        match self {
            NestedLoop | InefficientAlgorithm | MemoryLeak | NPlusOneQuery | BlockingOperation => {
                IssueCategory::Performance
            }
            UnusedVariable | MagicNumber | LongFunction | DuplicateCode | DeadCode
            | ComplexCondition | DeepNesting => IssueCategory::Quality,
            HardcodedSecret | SqlInjection | XssVulnerability | InsecureRandom => {
                IssueCategory::Security
            }
            EmptyCatch | MissingErrorHandling | SwallowedException => IssueCategory::ErrorHandling,
            MissingNullCheck | MissingTypeAnnotation | InconsistentNaming | GodFunction
            | MissingReturnType => IssueCategory::BestPractice,
        }
    }

    /// One-line meaning, used when instructing the analyzer
    pub fn description(self) -> &'static str {
        match self {
            IssueCode::NestedLoop => "nested loops that may cause O(n²) work",
            IssueCode::InefficientAlgorithm => "a suboptimal algorithm choice",
            IssueCode::MemoryLeak => "memory that is retained and never released",
            IssueCode::NPlusOneQuery => "one query per item instead of a batched query",
            IssueCode::BlockingOperation => "a blocking call inside async code",
            IssueCode::UnusedVariable => "a variable declared but never read",
            IssueCode::MagicNumber => "an unexplained literal number",
            IssueCode::LongFunction => "a function longer than about 50 lines",
            IssueCode::DuplicateCode => "repeated blocks of code",
            IssueCode::DeadCode => "code that can never run",
            IssueCode::ComplexCondition => "an overly complex conditional",
            IssueCode::DeepNesting => "more than four levels of nesting",
            IssueCode::HardcodedSecret => "API keys, passwords or tokens in source",
            IssueCode::SqlInjection => "SQL built from unsanitized input",
            IssueCode::XssVulnerability => "unescaped user input rendered as HTML",
            IssueCode::InsecureRandom => "non-cryptographic randomness used for security",
            IssueCode::EmptyCatch => "a catch block that does nothing",
            IssueCode::MissingErrorHandling => "a risky operation with no error handling",
            IssueCode::SwallowedException => "an error caught and silently discarded",
            IssueCode::MissingNullCheck => "a value used without a null/undefined check",
            IssueCode::MissingTypeAnnotation => "a missing type annotation",
            IssueCode::InconsistentNaming => "inconsistent naming of variables or functions",
            IssueCode::GodFunction => "a function doing too many unrelated things",
            IssueCode::MissingReturnType => "a function without a declared return type",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueCode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("issue code", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Performance,
    Quality,
    Security,
    ErrorHandling,
    BestPractice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(UnknownVariant::new("severity", s)),
        }
    }
}

/// Asymptotic cost attached to an issue. Wire names follow `O_1`/`O_n`/`O_n2`,
/// the conventional spellings are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    #[serde(rename = "O_1", alias = "O(1)")]
    Constant,
    #[serde(rename = "O_n", alias = "O(n)")]
    Linear,
    #[serde(rename = "O_n2", alias = "O(n²)", alias = "O(n^2)")]
    Quadratic,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [
        Complexity::Constant,
        Complexity::Linear,
        Complexity::Quadratic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Constant => "O_1",
            Complexity::Linear => "O_n",
            Complexity::Quadratic => "O_n2",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "O_1" | "O(1)" => Ok(Complexity::Constant),
            "O_n" | "O(n)" => Ok(Complexity::Linear),
            "O_n2" | "O(n²)" | "O(n^2)" => Ok(Complexity::Quadratic),
            _ => Err(UnknownVariant::new("complexity", s)),
        }
    }
}

/// One defect found by an analysis. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub analysis_id: String,
    pub issue_code: IssueCode,
    pub severity: Severity,
    pub complexity: Complexity,
    pub function_name: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub before_snippet: Option<String>,
    pub after_snippet: Option<String>,
}

/// A validated issue that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub issue_code: IssueCode,
    pub severity: Severity,
    pub complexity: Complexity,
    pub function_name: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub before_snippet: Option<String>,
    pub after_snippet: Option<String>,
}

impl IssueDraft {
    pub fn new(issue_code: IssueCode, severity: Severity, complexity: Complexity) -> Self {
        Self {
            issue_code,
            severity,
            complexity,
            function_name: None,
            start_line: None,
            end_line: None,
            before_snippet: None,
            after_snippet: None,
        }
    }
}
