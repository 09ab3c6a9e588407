//! Assertion helpers for test method bodies.
//!
//! A failed assertion panics with an [`AssertionFailure`] payload. The harness catches the unwind and turns the
//! payload into a failure detail that names both compared values.

use std::fmt::{self, Debug, Display};
use std::panic::{self, Location};

/// Payload carried by a failed [`assert_equal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    actual: String,
    expected: String,
    location: &'static Location<'static>,
}

impl AssertionFailure {
    pub fn new<T: Debug + ?Sized>(actual: &T, expected: &T, location: &'static Location<'static>) -> Self {
        Self {
            actual: format!("{actual:?}"),
            expected: format!("{expected:?}"),
            location,
        }
    }

    /// `Debug` rendering of the value under test.
    pub fn actual(&self) -> &str {
        &self.actual
    }

    /// `Debug` rendering of the expected value.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "assertion failed: {} != {} (at {})",
            self.actual, self.expected, self.location
        )
    }
}

/// Assert that two values are equal.
///
/// # Panics
///
/// Panics with an [`AssertionFailure`] payload if `actual != expected`.
#[track_caller]
pub fn assert_equal<T: PartialEq + Debug>(actual: T, expected: T) {
    if actual != expected {
        panic::panic_any(AssertionFailure::new(&actual, &expected, Location::caller()));
    }
}

/// Converts the return value of a test method into a pass/fail result.
///
/// Test methods may return `()` or `Result<(), E>` for any displayable `E`.
pub trait IntoTestResult {
    fn into_test_result(self) -> Result<(), String>;
}

impl IntoTestResult for () {
    fn into_test_result(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: Display> IntoTestResult for Result<(), E> {
    fn into_test_result(self) -> Result<(), String> {
        self.map_err(|err| err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn failure_of(f: impl FnOnce() + panic::UnwindSafe) -> Option<AssertionFailure> {
        let payload = panic::catch_unwind(f).err()?;
        payload.downcast::<AssertionFailure>().ok().map(|failure| *failure)
    }

    #[test]
    fn test_equal_values_pass() {
        assert!(failure_of(|| assert_equal(1, 1)).is_none());
        assert!(failure_of(|| assert_equal("same", "same")).is_none());
    }

    #[test]
    fn test_unequal_values_carry_both_sides() {
        let failure = failure_of(|| assert_equal(1, 2)).expect("assertion should fail");
        assert_eq!(failure.actual(), "1");
        assert_eq!(failure.expected(), "2");
        let rendered = failure.to_string();
        assert!(rendered.contains("1 != 2"));
        assert!(rendered.contains("testing.rs"));
    }

    #[test]
    fn test_strings_render_with_debug_quotes() {
        let failure = failure_of(|| assert_equal("left", "right")).expect("assertion should fail");
        assert_eq!(failure.actual(), "\"left\"");
        assert_eq!(failure.expected(), "\"right\"");
    }

    #[test]
    fn test_result_returns_convert() {
        assert_eq!(().into_test_result(), Ok(()));
        let ok: Result<(), String> = Ok(());
        assert_eq!(ok.into_test_result(), Ok(()));
        let err: Result<(), std::num::ParseIntError> = "x".parse::<i32>().map(|_| ());
        let message = err.into_test_result().unwrap_err();
        assert!(message.contains("invalid digit"));
    }
}
