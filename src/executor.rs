//! Isolated execution of test cases.
//!
//! Every test case gets its own instance, built with the class's parameterless constructor. Panics and `Err`
//! returns from the constructor or the test body are caught and recorded as a failed outcome, so one failing
//! test never stops the ones after it.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::Instant;

use verdict_runtime::{AssertionFailure, ClassDescriptor, Instance};

use crate::discovery::TestCase;
use crate::outcome::{FailureDetail, TestOutcome};

/// Runs one test case and reports its outcome.
///
/// Implementations must not let a failure escape: every call returns an outcome.
pub trait TestExecutor {
    fn execute(&self, case: &TestCase<'_>) -> TestOutcome;
}

/// Runs tests on the calling thread, one fresh instance per case (default behavior).
#[derive(Debug, Default, Clone, Copy)]
pub struct InProcessExecutor;

impl TestExecutor for InProcessExecutor {
    fn execute(&self, case: &TestCase<'_>) -> TestOutcome {
        let start = Instant::now();
        let result = run_case(case);
        let elapsed = start.elapsed();
        match result {
            Ok(()) => TestOutcome::passed(case, elapsed),
            Err(detail) => TestOutcome::failed(case, detail, elapsed),
        }
    }
}

fn run_case(case: &TestCase<'_>) -> Result<(), FailureDetail> {
    let instance = instantiate(case.class())?;
    let invoke = case.method().invoker().ok_or_else(|| {
        FailureDetail::runtime(format!(
            "{}::{} cannot be invoked without arguments",
            case.class_name(),
            case.method_name()
        ))
    })?;

    // The instance moves into the closure so that a panicking `Drop` is caught as well.
    let result = panic::catch_unwind(AssertUnwindSafe(move || {
        let mut instance = instance;
        invoke(instance.as_mut())
    }));

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(message)) => Err(FailureDetail::runtime(message)),
        Err(payload) => Err(describe_panic(payload)),
    }
}

fn instantiate(class: &ClassDescriptor) -> Result<Instance, FailureDetail> {
    let construct = class.parameterless_constructor().ok_or_else(|| {
        FailureDetail::instantiation(format!("{} has no parameterless constructor", class.name()))
    })?;

    match panic::catch_unwind(construct) {
        Ok(Ok(instance)) => Ok(instance),
        Ok(Err(message)) => Err(FailureDetail::instantiation(format!(
            "constructing {} failed: {message}",
            class.name()
        ))),
        Err(payload) => Err(FailureDetail::instantiation(format!(
            "constructing {} panicked: {}",
            class.name(),
            panic_message(payload.as_ref())
        ))),
    }
}

fn describe_panic(payload: Box<dyn Any + Send>) -> FailureDetail {
    match payload.downcast::<AssertionFailure>() {
        Ok(failure) => FailureDetail::assertion(failure.to_string()),
        Err(payload) => FailureDetail::runtime(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(failure) = payload.downcast_ref::<AssertionFailure>() {
        failure.to_string()
    } else {
        "non-string panic payload".to_string()
    }
}

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

static FILTER_HOOK: Once = Once::new();

/// Wraps the current panic hook once per process so it stays quiet on silenced threads.
fn install_filter_hook() {
    FILTER_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCED.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Suppresses panic output on the current thread until dropped.
///
/// Caught test panics would otherwise print to stderr on top of the report. Panics on other threads still reach
/// the original hook.
pub(crate) struct PanicHookGuard {
    was_silenced: bool,
}

impl PanicHookGuard {
    pub(crate) fn silence() -> Self {
        install_filter_hook();
        Self {
            was_silenced: SILENCED.with(|silenced| silenced.replace(true)),
        }
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        SILENCED.with(|silenced| silenced.set(self.was_silenced));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::discovery::{NamingPolicy, discover};
    use crate::inspector::DescriptorInspector;
    use crate::outcome::{FailureKind, TestStatus};
    use verdict_runtime::{ConstructorInfo, MethodInfo, assert_equal};

    struct Flag(bool);

    fn construct_flag() -> Result<Instance, String> {
        Ok(Box::new(Flag(false)))
    }

    fn refuse() -> Result<Instance, String> {
        Err("database offline".to_string())
    }

    fn explode() -> Result<Instance, String> {
        panic!("constructor blew up")
    }

    fn set_and_check(instance: &mut dyn Any) -> Result<(), String> {
        let flag = instance.downcast_mut::<Flag>().ok_or("not a Flag")?;
        assert_equal(flag.0, false);
        flag.0 = true;
        Ok(())
    }

    fn unequal(_instance: &mut dyn Any) -> Result<(), String> {
        assert_equal(1, 2);
        Ok(())
    }

    fn panics(_instance: &mut dyn Any) -> Result<(), String> {
        panic!("index out of range")
    }

    fn errors(_instance: &mut dyn Any) -> Result<(), String> {
        Err("file not found".to_string())
    }

    fn method(name: &str, invoke: verdict_runtime::Invoker) -> MethodInfo {
        MethodInfo::new(name, 0).marked_as_test().with_invoker(invoke)
    }

    fn outcomes(catalog: &Catalog) -> Vec<TestOutcome> {
        let discovery = discover(catalog, &DescriptorInspector, NamingPolicy::Auto);
        let _quiet = PanicHookGuard::silence();
        discovery.cases().iter().map(|case| InProcessExecutor.execute(case)).collect()
    }

    #[test]
    fn test_each_case_gets_a_fresh_instance() {
        let catalog = Catalog::new().with_descriptor(
            ClassDescriptor::new("Flags")
                .with_constructor(ConstructorInfo::parameterless(construct_flag))
                .with_method(method("first", set_and_check))
                .with_method(method("second", set_and_check)),
        );
        let results = outcomes(&catalog);
        assert!(results.iter().all(TestOutcome::is_passed));
        assert!(results.iter().all(|outcome| outcome.failure().is_none()));
    }

    #[test]
    fn test_failures_are_classified_and_do_not_stop_the_run() {
        let catalog = Catalog::new().with_descriptor(
            ClassDescriptor::new("Faults")
                .with_constructor(ConstructorInfo::parameterless(construct_flag))
                .with_method(method("unequal", unequal))
                .with_method(method("panics", panics))
                .with_method(method("errors", errors))
                .with_method(method("passes", set_and_check)),
        );
        let results = outcomes(&catalog);
        let kinds: Vec<Option<FailureKind>> = results
            .iter()
            .map(|outcome| outcome.failure().map(FailureDetail::kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(FailureKind::Assertion),
                Some(FailureKind::Runtime),
                Some(FailureKind::Runtime),
                None
            ]
        );

        let assertion = results[0].failure().map(FailureDetail::message).unwrap_or_default();
        assert!(assertion.contains('1') && assertion.contains('2'), "{assertion}");
        let panic = results[1].failure().map(FailureDetail::message).unwrap_or_default();
        assert_eq!(panic, "panicked: index out of range");
        let error = results[2].failure().map(FailureDetail::message).unwrap_or_default();
        assert_eq!(error, "file not found");
        assert_eq!(results[3].status(), TestStatus::Passed);
    }

    #[test]
    fn test_constructor_errors_become_instantiation_failures() {
        let catalog = Catalog::new()
            .with_descriptor(
                ClassDescriptor::new("Refuses")
                    .with_constructor(ConstructorInfo::parameterless(refuse))
                    .with_method(method("never", set_and_check)),
            )
            .with_descriptor(
                ClassDescriptor::new("Explodes")
                    .with_constructor(ConstructorInfo::parameterless(explode))
                    .with_method(method("never_either", set_and_check)),
            );
        let results = outcomes(&catalog);
        assert_eq!(results.len(), 2);
        for outcome in &results {
            assert_eq!(outcome.status(), TestStatus::Failed);
            assert_eq!(outcome.failure().map(FailureDetail::kind), Some(FailureKind::Instantiation));
        }
        assert_eq!(
            results[0].failure().map(FailureDetail::message),
            Some("constructing Refuses failed: database offline")
        );
        assert_eq!(
            results[1].failure().map(FailureDetail::message),
            Some("constructing Explodes panicked: constructor blew up")
        );
    }

    fn silenced() -> bool {
        SILENCED.with(Cell::get)
    }

    #[test]
    fn test_silencing_is_per_thread_and_nests() {
        assert!(!silenced());
        {
            let _outer = PanicHookGuard::silence();
            let other_thread = std::thread::spawn(silenced).join().unwrap_or(true);
            assert!(!other_thread);
            {
                let _inner = PanicHookGuard::silence();
                assert!(silenced());
            }
            assert!(silenced());
        }
        assert!(!silenced());
    }

    #[test]
    fn test_panic_message_handles_owned_and_opaque_payloads() {
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&"borrowed"), "borrowed");
        assert_eq!(panic_message(&42_u32), "non-string panic payload");
    }
}
