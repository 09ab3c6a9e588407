//! The discovery -> execution -> report pipeline.
//!
//! A run moves through [`RunPhase`]s strictly in order and always ends in `Done`, however many tests fail.
//! Reporting is batched: outcomes are collected while executing and handed to the reporter afterwards.

use std::time::Instant;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::discovery::{Discovery, NamingPolicy, discover};
use crate::executor::{InProcessExecutor, PanicHookGuard, TestExecutor};
use crate::inspector::{DescriptorInspector, MetadataInspector};
use crate::outcome::{RunSummary, TestOutcome};
use crate::reporter::TestReporter;

/// Where a harness is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    Discovering,
    Executing,
    Reporting,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    pub naming: NamingPolicy,
    /// Keep caught test panics off stderr while tests execute.
    pub silence_panics: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::Auto,
            silence_panics: true,
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    outcomes: Vec<TestOutcome>,
    summary: RunSummary,
}

impl RunReport {
    /// One outcome per test case, in discovery order.
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn all_passed(&self) -> bool {
        self.summary.all_passed()
    }

    pub fn into_outcomes(self) -> Vec<TestOutcome> {
        self.outcomes
    }
}

pub struct Harness<I = DescriptorInspector, E = InProcessExecutor> {
    config: HarnessConfig,
    inspector: I,
    executor: E,
    phase: RunPhase,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_parts(config, DescriptorInspector, InProcessExecutor)
    }
}

impl<I: MetadataInspector, E: TestExecutor> Harness<I, E> {
    /// Build a harness with a custom inspector or executor.
    pub fn with_parts(config: HarnessConfig, inspector: I, executor: E) -> Self {
        Self {
            config,
            inspector,
            executor,
            phase: RunPhase::Start,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Discovery only, without executing anything.
    pub fn discover<'c>(&self, catalog: &'c Catalog) -> Discovery<'c> {
        discover(catalog, &self.inspector, self.config.naming)
    }

    /// Discover, execute and report every test in `catalog`.
    pub fn run(&mut self, catalog: &Catalog, reporter: &mut dyn TestReporter) -> RunReport {
        let started = Instant::now();

        self.enter(RunPhase::Discovering);
        let discovery = self.discover(catalog);

        self.enter(RunPhase::Executing);
        let outcomes = self.execute_all(&discovery);
        let summary = RunSummary::from_outcomes(&outcomes, started.elapsed());

        self.enter(RunPhase::Reporting);
        reporter.on_collection_complete(discovery.len());
        for outcome in &outcomes {
            reporter.record(outcome);
        }
        reporter.on_run_complete(&summary);

        self.enter(RunPhase::Done);
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "test run complete"
        );
        RunReport { outcomes, summary }
    }

    fn execute_all(&self, discovery: &Discovery<'_>) -> Vec<TestOutcome> {
        let _quiet = self.config.silence_panics.then(PanicHookGuard::silence);
        discovery
            .cases()
            .iter()
            .map(|case| {
                let outcome = self.executor.execute(case);
                debug!(test = outcome.display_name(), status = %outcome.status(), "test executed");
                outcome
            })
            .collect()
    }

    fn enter(&mut self, phase: RunPhase) {
        debug!(from = ?self.phase, to = ?phase, "run phase");
        self.phase = phase;
    }
}
