//! kata assertion macros.
//!
//! Those assertions are borrowed from `pretty_assertions` crate and made
//! with small modification which returns an [`AssertionFailure`] instead of
//! panicking. The runner tells expected failures apart from unexpected errors
//! by that type alone: an example whose body returns an `AssertionFailure` is
//! reported as failed, anything else as an error.

use crate::Location;

/// Error produced by a failed check or an explicit [`fail`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
    pub location: Location,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>, location: Location) -> AssertionFailure {
        AssertionFailure {
            message: message.into(),
            location,
        }
    }
}

/// Fails the running example.
///
/// Always returns `Err`, so it is meant to be propagated with `?`. The
/// failure records the caller's location.
///
/// ```rust,ignore
/// if total != 3 {
///     kata::fail("total should be 3")?;
/// }
/// ```
#[track_caller]
pub fn fail(message: impl Into<String>) -> eyre::Result<()> {
    Err(AssertionFailure::new(message, Location::caller()).into())
}

/// Like [`fail`] with an explicit location, for helpers that know better
/// than their caller where the failure belongs.
pub fn fail_at(message: impl Into<String>, location: Location) -> eyre::Result<()> {
    Err(AssertionFailure::new(message, location).into())
}

/// Returns an [`AssertionFailure`] with a formatted message from the enclosing
/// function or closure.
#[macro_export]
macro_rules! fail {
    ($($arg:tt)+) => {
        return ::core::result::Result::Err(
            $crate::assertion::AssertionFailure::new(
                format!($($arg)+),
                $crate::Location::at(file!(), line!()),
            )
            .into(),
        )
    };
}

/// Asserts that a boolean expression is true.
///
/// # Examples
///
/// ```rust,ignore
/// kata::suite! {
///     it "is positive" {
///         check!(1 + 1 > 0);
///         check!(2 > 1, "two should exceed {}", 1);
///     }
/// }
/// ```
#[macro_export]
macro_rules! check {
    ($cond:expr) => {
        $crate::check!(@ $cond, "", "");
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::check!(@ $cond, ": ", $($arg)+);
    };
    (@ $cond:expr, $maybe_colon:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::fail!(
                "check failed: {}{}{}",
                stringify!($cond),
                $maybe_colon,
                format_args!($($arg)*)
            );
        }
    };
}

/// Asserts that two string expressions are equal, with a line diff on failure.
#[macro_export]
macro_rules! check_str_eq {
    ($left:expr, $right:expr$(,)?) => ({
        $crate::check_str_eq!(@ $left, $right, "", "");
    });
    ($left:expr, $right:expr, $($arg:tt)*) => ({
        $crate::check_str_eq!(@ $left, $right, ": ", $($arg)+);
    });
    (@ $left:expr, $right:expr, $maybe_colon:expr, $($arg:tt)*) => ({
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::fail!(
                        "check failed: `(left == right)`{}{}\
                         \n\
                         \n{}\
                         \n",
                        $maybe_colon,
                        format_args!($($arg)*),
                        $crate::pretty_assertions::StrComparison::new(left_val, right_val)
                    );
                }
            }
        }
    });
}

/// Asserts that two expressions are equal using `==`, with a diff on failure.
#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr$(,)?) => ({
        $crate::check_eq!(@ $left, $right, "", "");
    });
    ($left:expr, $right:expr, $($arg:tt)*) => ({
        $crate::check_eq!(@ $left, $right, ": ", $($arg)+);
    });
    (@ $left:expr, $right:expr, $maybe_colon:expr, $($arg:tt)*) => ({
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::fail!(
                        "check failed: `(left == right)`{}{}\
                         \n\
                         \n{}\
                         \n",
                        $maybe_colon,
                        format_args!($($arg)*),
                        $crate::pretty_assertions::Comparison::new(left_val, right_val)
                    );
                }
            }
        }
    });
}

/// Asserts that two expressions are not equal using `!=`.
#[macro_export]
macro_rules! check_ne {
    ($left:expr, $right:expr$(,)?) => ({
        $crate::check_ne!(@ $left, $right, "", "");
    });
    ($left:expr, $right:expr, $($arg:tt)+) => ({
        $crate::check_ne!(@ $left, $right, ": ", $($arg)+);
    });
    (@ $left:expr, $right:expr, $maybe_colon:expr, $($arg:tt)*) => ({
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if *left_val == *right_val {
                    $crate::fail!(
                        "check failed: `(left != right)`{}{}\
                         \n\
                         \nBoth sides:\
                         \n{:#?}\
                         \n\
                         \n",
                        $maybe_colon,
                        format_args!($($arg)*),
                        left_val
                    );
                }
            }
        }
    });
}
