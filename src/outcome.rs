//! Per-test outcomes and run totals.
//!
//! Outcomes are created by the executor, exactly once per test case, and only read afterwards.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::discovery::TestCase;

/// Pass/fail status of one executed test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
}

impl TestStatus {
    /// Label used in rendered reports.
    pub fn label(self) -> &'static str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// `assert_equal` saw two different values.
    Assertion,
    /// The test body panicked for another reason or returned `Err`.
    Runtime,
    /// A fresh instance could not be built.
    Instantiation,
}

impl FailureKind {
    fn fallback_message(self) -> &'static str {
        match self {
            FailureKind::Assertion => "assertion failed",
            FailureKind::Runtime => "test failed without a message",
            FailureKind::Instantiation => "instance could not be constructed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Assertion => "assertion failure",
            FailureKind::Runtime => "runtime fault",
            FailureKind::Instantiation => "instantiation failure",
        })
    }
}

/// Description of why a test case failed. The message is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetail {
    kind: FailureKind,
    message: String,
}

impl FailureDetail {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.fallback_message().to_string()
        } else {
            message
        };
        Self { kind, message }
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Assertion, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Runtime, message)
    }

    pub fn instantiation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Instantiation, message)
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of executing one test case.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    class_name: String,
    method_name: String,
    display_name: String,
    status: TestStatus,
    failure: Option<FailureDetail>,
    elapsed: Duration,
}

impl TestOutcome {
    pub fn passed(case: &TestCase<'_>, elapsed: Duration) -> Self {
        Self::build(case, TestStatus::Passed, None, elapsed)
    }

    pub fn failed(case: &TestCase<'_>, detail: FailureDetail, elapsed: Duration) -> Self {
        Self::build(case, TestStatus::Failed, Some(detail), elapsed)
    }

    fn build(case: &TestCase<'_>, status: TestStatus, failure: Option<FailureDetail>, elapsed: Duration) -> Self {
        Self {
            class_name: case.class_name().to_string(),
            method_name: case.method_name().to_string(),
            display_name: case.display_name().to_string(),
            status,
            failure,
            elapsed,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    /// Present exactly when the status is `Failed`.
    pub fn failure(&self) -> Option<&FailureDetail> {
        self.failure.as_ref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Renders the report line: `<DisplayName> : PASSED` or `<DisplayName> : FAILED`.
impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.display_name, self.status)
    }
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[TestOutcome], duration: Duration) -> Self {
        let passed = outcomes.iter().filter(|outcome| outcome.is_passed()).count();
        Self {
            total: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
            duration,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed in {:.2}s",
            self.passed,
            self.failed,
            self.duration.as_secs_f64()
        )
    }
}
