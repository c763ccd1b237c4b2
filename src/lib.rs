//! hull - git + hub = github
//!
//! Hull sits between the user and git. It recognizes GitHub-flavored
//! shorthand in an invocation (`owner/repo` references, pull-request URLs,
//! cross-fork commits), rewrites the argument list, and executes the
//! result — replacing its own process with the final command so the
//! wrapper is transparent. Users typically alias `git=hull`.
//!
//! # Architecture
//!
//! - [`cli`] - Global-flag interception, alias expansion, rule dispatch
//! - [`engine`] - The mutable command buffer and the chain runner
//! - [`core`] - Resolution model: repository, remotes, branches, projects
//! - [`git`] - Memoized read-only queries against the git executable
//! - [`forge`] - The hosting service's HTTP API
//! - [`ui`] - User messaging and editor-driven message composition
//!
//! # Guarantees
//!
//! 1. Every git query runs at most once per process and all reads of it
//!    observe the same value
//! 2. Unrecognized commands pass through to git byte-for-byte
//! 3. A failing chain step aborts the run with that step's exit code
//! 4. The terminal command replaces the hull process entirely

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod git;
pub mod ui;

/// Hull's own version, chained after `git --version` output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
