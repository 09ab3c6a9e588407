#![forbid(unsafe_code)]
//! verdict: a minimal test discovery and execution harness.
//!
//! Classes opt in with `#[test_class]` and mark test methods with `#[test_method]`. A [`Catalog`] lists the
//! classes to consider; the [`Harness`] discovers which of them qualify, runs every marked parameterless method on
//! a fresh instance, and hands one [`TestOutcome`] per test to a [`TestReporter`].
//!
//! ```ignore
//! use verdict::{Catalog, CaptureReporter, Harness, HarnessConfig};
//!
//! let catalog = Catalog::new().with::<MyTests>();
//! let mut reporter = CaptureReporter::new();
//! let report = Harness::new(HarnessConfig::default()).run(&catalog, &mut reporter);
//! assert!(report.all_passed());
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test bodies**: panics are expected there. The executor catches them and records a failed outcome.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod catalog;
pub mod cli;
pub mod demo;
pub mod discovery;
pub mod executor;
pub mod harness;
pub mod inspector;
pub mod outcome;
pub mod reporter;

pub use catalog::Catalog;
pub use discovery::{Discovery, NamingPolicy, TestCase, TestClassDescriptor, discover};
pub use executor::{InProcessExecutor, TestExecutor};
pub use harness::{Harness, HarnessConfig, RunPhase, RunReport};
pub use inspector::{DescriptorInspector, MetadataInspector};
pub use outcome::{FailureDetail, FailureKind, RunSummary, TestOutcome, TestStatus};
pub use reporter::{CaptureReporter, ConsoleReporter, JsonReporter, ReportError, TestReporter};

pub use verdict_runtime;
pub use verdict_runtime::{assert_equal, test_class};

/// Run `catalog` with the default configuration and collect the outcomes in memory.
pub fn run_catalog(catalog: &Catalog) -> (RunReport, CaptureReporter) {
    let mut reporter = CaptureReporter::new();
    let report = Harness::new(HarnessConfig::default()).run(catalog, &mut reporter);
    (report, reporter)
}
