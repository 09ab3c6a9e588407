//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::Write;

use crate::catalog::Catalog;
use crate::discovery::NamingPolicy;
use crate::harness::{Harness, HarnessConfig, RunReport};
use crate::reporter::{ConsoleReporter, JsonReporter, ReportError};

use super::{CliError, CliResult, ExitCode, OutputFormat, RunArgs};

fn naming(qualified: bool) -> NamingPolicy {
    if qualified {
        NamingPolicy::Qualified
    } else {
        NamingPolicy::Auto
    }
}

fn report_failed(err: ReportError) -> CliError {
    CliError::failure(format!("Error: {err}"))
}

/// Run every test in `catalog`, writing the report to `out`.
///
/// Returns an empty-message failure when any test failed: the report already says which.
pub fn run_tests<W: Write>(catalog: &Catalog, args: &RunArgs, out: W) -> CliResult<ExitCode> {
    let mut harness = Harness::new(HarnessConfig {
        naming: naming(args.qualified),
        ..HarnessConfig::default()
    });

    let report: RunReport = match args.format {
        OutputFormat::Console => {
            let mut reporter = ConsoleReporter::new(out).verbose(args.verbose).with_summary(args.summary);
            let report = harness.run(catalog, &mut reporter);
            reporter.finish().map_err(report_failed)?;
            report
        }
        OutputFormat::Json => {
            let mut reporter = JsonReporter::new(out);
            let report = harness.run(catalog, &mut reporter);
            reporter.finish().map_err(report_failed)?;
            report
        }
    };

    if report.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

/// Print the display name of every discovered test, one per line.
pub fn list_tests<W: Write>(catalog: &Catalog, qualified: bool, mut out: W) -> CliResult<ExitCode> {
    let harness = Harness::new(HarnessConfig {
        naming: naming(qualified),
        ..HarnessConfig::default()
    });
    let discovery = harness.discover(catalog);

    for case in discovery.cases() {
        writeln!(out, "{}", case.display_name()).map_err(|e| report_failed(e.into()))?;
    }
    out.flush().map_err(|e| report_failed(e.into()))?;
    Ok(ExitCode::SUCCESS)
}
