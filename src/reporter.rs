//! Result reporting.
//!
//! The harness hands every [`TestOutcome`] to a [`TestReporter`] in discovery order once execution is finished.
//! Reporters only observe: a reporter that fails to write keeps the error and returns it from `finish`, so the
//! run itself is never interrupted by output problems.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

use crate::outcome::{FailureDetail, RunSummary, TestOutcome, TestStatus};

/// Failure to emit a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for reporting test execution results.
///
/// Implement this trait to customize the output format.
pub trait TestReporter {
    /// Called once with the number of discovered test cases, before any outcome.
    fn on_collection_complete(&mut self, _test_count: usize) {}

    /// Called once per outcome, in discovery order.
    fn record(&mut self, outcome: &TestOutcome);

    /// Called after the last outcome.
    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

/// Plain-text reporter: one `<DisplayName> : PASSED|FAILED` line per outcome.
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    summary: bool,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            verbose: false,
            summary: false,
            error: None,
        }
    }

    /// Print the failure detail, indented, under each failed line.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Print a closing `N passed, M failed in X.XXs` line.
    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    /// Flushes and returns the writer, or the first write error seen.
    pub fn finish(mut self) -> Result<W, ReportError> {
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{line}") {
            self.error = Some(err);
        }
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn record(&mut self, outcome: &TestOutcome) {
        self.emit(&outcome.to_string());
        if let Some(detail) = outcome.failure().filter(|_| self.verbose) {
            self.emit(&format!("    {detail}"));
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        if self.summary {
            self.emit(&summary.to_string());
        }
    }
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    event: &'static str,
    name: &'a str,
    class: &'a str,
    method: &'a str,
    status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<&'a FailureDetail>,
    duration_ms: f64,
}

#[derive(Serialize)]
struct SummaryRecord {
    event: &'static str,
    total: usize,
    passed: usize,
    failed: usize,
    duration_ms: f64,
}

/// Newline-delimited JSON: one object per outcome followed by a summary object.
pub struct JsonReporter<W: Write> {
    out: W,
    error: Option<ReportError>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn finish(mut self) -> Result<W, ReportError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit<T: Serialize>(&mut self, record: &T) {
        if self.error.is_some() {
            return;
        }
        let written = serde_json::to_writer(&mut self.out, record)
            .map_err(ReportError::from)
            .and_then(|()| self.out.write_all(b"\n").map_err(ReportError::from));
        if let Err(err) = written {
            self.error = Some(err);
        }
    }
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn record(&mut self, outcome: &TestOutcome) {
        let record = OutcomeRecord {
            event: "test",
            name: outcome.display_name(),
            class: outcome.class_name(),
            method: outcome.method_name(),
            status: outcome.status(),
            failure: outcome.failure(),
            duration_ms: outcome.elapsed().as_secs_f64() * 1000.0,
        };
        self.emit(&record);
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        let record = SummaryRecord {
            event: "summary",
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            duration_ms: summary.duration.as_secs_f64() * 1000.0,
        };
        self.emit(&record);
    }
}

/// Keeps everything in memory for inspection.
#[derive(Debug, Default)]
pub struct CaptureReporter {
    collected: Option<usize>,
    outcomes: Vec<TestOutcome>,
    lines: Vec<String>,
    summary: Option<RunSummary>,
}

impl CaptureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The count passed to `on_collection_complete`, if it was called.
    pub fn collected(&self) -> Option<usize> {
        self.collected
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Lines the console reporter would have printed.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }
}

impl TestReporter for CaptureReporter {
    fn on_collection_complete(&mut self, test_count: usize) {
        self.collected = Some(test_count);
    }

    fn record(&mut self, outcome: &TestOutcome) {
        self.lines.push(outcome.to_string());
        self.outcomes.push(outcome.clone());
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        self.summary = Some(*summary);
    }
}
