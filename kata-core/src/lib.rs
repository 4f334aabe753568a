//! # Kata Core
//!
//! Core functionality for the kata behavior-style testing framework.
//!
//! This crate provides the fundamental building blocks for kata, including:
//! - The example tree and its registration API ([`Suite`])
//! - Hooks that wrap every example of a group
//! - Example selection by description or source line
//! - The sequential, fail-fast aware [`Runner`]
//! - Assertion macros and utilities
//! - Configuration management
//! - Test reporting infrastructure
//!
//! ## Architecture (block diagram)
//!
//! ```text
//! +---------------------+      +---------------------+      +---------------------+
//! | suite! / Suite      | ---> | runner (sequential) | ---> | reporter (output)   |
//! | describe/it/hooks   |      | hooks + lifecycle   |      | List/Null/etc.      |
//! +---------------------+      +---------------------+      +---------------------+
//!            |                    ^            |
//!            v                    |            v
//! +---------------------+         |     +---------------------+
//! | assertion macros    | --------+     | Scope               |
//! | check!, check_eq!   |  Fail/Error   | per-example state   |
//! +---------------------+               +---------------------+
//!                                 ^
//! +---------------------+         |
//! | config + selection  | --------+
//! | description/line    |
//! +---------------------+
//! ```
//!
//! Most users should use the main `kata` crate rather than importing `kata-core` directly.

pub mod assertion;
pub mod config;
pub mod error;
pub mod filter;
mod hook;
pub mod location;
pub mod reporter;
pub mod runner;
mod scope;
pub mod suite;
pub mod tree;

// Re-export error handling crates
pub use eyre;
#[doc(hidden)]
pub use pretty_assertions;

// Re-export key functionality
pub use assertion::{fail, fail_at, AssertionFailure};
pub use config::{get_kata_config, Color, Config};
pub use error::{ConfigurationError, Error, Result};
pub use filter::{matches, DescriptionFilter, Filter, LocationFilter, Selection};
pub use hook::{Hook, HookSet};
pub use location::Location;
pub use reporter::{ListReporter, NullReporter, Reporter, ReporterType};
pub use runner::{ExampleResult, Options, Runner, Summary};
pub use scope::Scope;
pub use suite::Suite;
pub use tree::{Body, Example, ExampleInfo, Failure, FailureKind, Group, Node, Status};
