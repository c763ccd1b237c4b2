//! ui
//!
//! User-facing output. Warnings and errors go to stderr so they never mix
//! with command output that scripts may be capturing.

pub mod editor;

use std::fmt::Display;

/// Print a warning (non-fatal).
pub fn warn(message: impl Display) {
    eprintln!("{}", message);
}

/// Print an error message.
pub fn error(message: impl Display) {
    eprintln!("{}", message);
}
