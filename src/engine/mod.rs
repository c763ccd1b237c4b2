//! engine
//!
//! The argument transformation and execution engine: the mutable command
//! buffer rules rewrite ([`invocation`]) and the runner that turns the
//! finished chain into processes ([`runner`]).

pub mod invocation;
pub mod runner;

pub use invocation::{Callback, Invocation, Step};
pub use runner::{execute, RunError};
