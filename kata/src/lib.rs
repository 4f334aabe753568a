//! # Kata - Behavior-style Testing Framework
//!
//! Kata lets you describe the behavior of your code as a tree of nested
//! groups and examples, runs the examples one at a time in declaration
//! order, and reports every outcome as it happens.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kata::{check_eq, eyre};
//!
//! #[derive(Default)]
//! struct Calc;
//!
//! impl Calc {
//!     fn add(&self, a: i32, b: i32) -> i32 {
//!         a + b
//!     }
//! }
//!
//! fn main() -> eyre::Result<()> {
//!     let suite = kata::suite! {
//!         describe "calc" {
//!             before_each |scope| { scope.insert(Calc); }
//!
//!             it "adds" |scope| {
//!                 let calc = scope.get::<Calc>().unwrap();
//!                 check_eq!(calc.add(1, 1), 2);
//!             }
//!
//!             pending "divides";
//!         }
//!     };
//!
//!     kata::App::new().run(kata::Runner::new(), suite)
//! }
//! ```
//!
//! Then `cargo run -- test`, `cargo run -- test -e adds` or
//! `cargo run -- test -l src/main.rs:21`.
//!
//! ## Outcomes
//!
//! - **success**: setup, body and teardown all returned `Ok`
//! - **fail**: a `check*!` macro, `fail!` or [`fail`] reported an assertion failure
//! - **error**: anything else went wrong, including panics
//! - **pending**: the example was declared with `pending` and never ran
//!
//! A hook or body that declares further examples while running aborts the
//! whole run with a [`ConfigurationError`].
//!
//! ## Configuration
//!
//! `kata.toml` in the current directory, or the file named by `KATA_CONFIG`:
//!
//! ```toml
//! fail_fast = true
//! color = "never"
//! ```

mod app;

// Re-export procedural macros
pub use kata_derive::suite;

// Re-export error handling crates for user convenience
pub use eyre;
#[doc(hidden)]
pub use pretty_assertions;

// Re-export main application struct
pub use app::App;

// Re-export core functionality
pub use kata_core::{
    assertion,
    config::{get_kata_config, Color, Config},
    error::{ConfigurationError, Error, Result},
    filter::{matches, DescriptionFilter, Filter, LocationFilter, Selection},
    reporter::{ListReporter, NullReporter, Reporter, ReporterType},
    runner::{ExampleResult, Options, Runner, Summary},
    tree::{Example, ExampleInfo, Failure, FailureKind, Group, Node, Status},
    {check, check_eq, check_ne, check_str_eq, fail, fail_at},
    Location, Scope, Suite,
};
