//! Assertion support for runnable examples.
//!
//! Every example returns a [`Check`]. The assertion functions return
//! `Err(Failure)` instead of panicking, so an example stops at the first
//! failed check with `?` and the runner reports it. Panics are left alone:
//! they mean the example itself is broken.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;
use thiserror::Error;

/// Where an assertion was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32, column: u32) -> Self {
        Location { file, line, column }
    }

    /// Location of the caller of the enclosing `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = std::panic::Location::caller();
        Location::new(loc.file(), loc.line(), loc.column())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A failed check.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Failure {
    /// An asserted condition evaluated to false.
    #[error("assertion failed @ {location}")]
    Condition { location: Location },

    /// An operation that should have failed completed normally.
    #[error("expected failure did not occur @ {location}")]
    Expectation { location: Location },
}

impl Failure {
    pub fn location(&self) -> Location {
        match self {
            Failure::Condition { location } | Failure::Expectation { location } => *location,
        }
    }
}

/// Result of one check or one whole example.
pub type Check = Result<(), Failure>;

pub fn assert_true_at(condition: bool, location: Location) -> Check {
    if condition {
        Ok(())
    } else {
        Err(Failure::Condition { location })
    }
}

#[track_caller]
pub fn assert_true(condition: bool) -> Check {
    assert_true_at(condition, Location::caller())
}

#[track_caller]
pub fn assert_equal<A, B>(a: A, b: B) -> Check
where
    A: PartialEq<B>,
{
    assert_true_at(a == b, Location::caller())
}

#[track_caller]
pub fn assert_not_equal<A, B>(a: A, b: B) -> Check
where
    A: PartialEq<B>,
{
    assert_true_at(a != b, Location::caller())
}

/// Runs `op` and succeeds only if it fails.
///
/// Both an `Err` return and a panic count as failing. Whatever `op` raised is
/// discarded here and never reaches the caller.
pub fn expect_failure_at<T, E, F>(op: F, location: Location) -> Check
where
    F: FnOnce() -> Result<T, E>,
{
    match catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(_)) => Err(Failure::Expectation { location }),
        Ok(Err(_)) | Err(_) => Ok(()),
    }
}

#[track_caller]
pub fn expect_failure<T, E, F>(op: F) -> Check
where
    F: FnOnce() -> Result<T, E>,
{
    expect_failure_at(op, Location::caller())
}

/// `check!(cond)`: return the failure from the current example if `cond` is false.
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        $crate::harness::assert_true($cond)?
    };
}

#[macro_export]
macro_rules! check_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::harness::assert_equal($a, $b)?
    };
}

#[macro_export]
macro_rules! check_ne {
    ($a:expr, $b:expr $(,)?) => {
        $crate::harness::assert_not_equal($a, $b)?
    };
}

/// `check_fails!(op)`: return an expectation failure if `op()` succeeds.
#[macro_export]
macro_rules! check_fails {
    ($op:expr $(,)?) => {
        $crate::harness::expect_failure($op)?
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    #[test]
    fn test_assert_true_passes_on_true() {
        assert_eq!(assert_true(true), Ok(()));
    }

    #[test]
    fn test_assert_true_reports_caller_line() {
        let line = line!() + 1;
        let failure = assert_true(false).unwrap_err();
        match failure {
            Failure::Condition { location } => {
                assert_eq!(location.line, line);
                assert!(location.file.ends_with("harness.rs"));
            }
            other => panic!("unexpected failure kind: {:?}", other),
        }
    }

    #[test]
    fn test_assert_equal_matches_assert_true() {
        for (a, b) in [(1, 1), (1, 2), (0, -1), (7, 7)] {
            assert_eq!(assert_equal(a, b).is_ok(), assert_true(a == b).is_ok());
            assert_eq!(assert_not_equal(a, b).is_ok(), assert_true(a != b).is_ok());
        }
    }

    #[test]
    fn test_assert_equal_across_types() {
        let owned = String::from("str");
        assert!(assert_equal(owned.as_str(), "str").is_ok());
        assert!(assert_equal(owned, "str").is_ok());
    }

    #[test]
    fn test_float_sum_scenario() {
        assert!(assert_equal(6.3, 1.0 + 2.3 + 3.0).is_ok());

        let line = line!() + 1;
        let failure = assert_equal(6.3, 1.0 + 2.3 + 4.0).unwrap_err();
        assert!(matches!(failure, Failure::Condition { .. }));
        let message = failure.to_string();
        assert!(message.starts_with("assertion failed @ "));
        assert!(message.ends_with(&format!(":{}", line)));
    }

    #[test]
    fn test_explicit_location() {
        let location = Location::new("demo.rs", 12, 1);
        let failure = assert_true_at(false, location).unwrap_err();
        assert_eq!(failure.to_string(), "assertion failed @ demo.rs:12");
        assert_eq!(failure.location(), location);
    }

    #[test]
    fn test_expect_failure_swallows_err() {
        let result = expect_failure(|| -> Result<(), Boom> { Err(Boom) });
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_expect_failure_swallows_panic() {
        let result = expect_failure(|| -> Result<(), Boom> { panic!("invalid state") });
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_expect_failure_swallows_inner_failure() {
        let result = expect_failure(|| assert_true(false));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_expect_failure_on_noop() {
        let failure = expect_failure(|| Ok::<(), Boom>(())).unwrap_err();
        assert!(matches!(failure, Failure::Expectation { .. }));
        assert!(failure.to_string().starts_with("expected failure did not occur @ "));
    }

    #[test]
    fn test_macros_short_circuit() {
        fn example(flag: bool) -> Check {
            check!(flag);
            check_eq!(1 + 1, 2);
            check_ne!("a", "b");
            check_fails!(|| "x".parse::<i32>());
            Ok(())
        }

        assert!(example(true).is_ok());
        assert!(matches!(example(false), Err(Failure::Condition { .. })));
    }

    #[test]
    fn test_failure_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Failure>();
        assert_sync::<Failure>();
    }
}
