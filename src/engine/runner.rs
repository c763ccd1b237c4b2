//! engine::runner
//!
//! Turns a finished [`Invocation`] into process executions.
//!
//! Modes:
//! - explain (`--noop`): print the quoted rendering of every chain step
//! - suppressed: do nothing
//! - chained: run every non-final step as a blocking subprocess (or call
//!   it in-process), aborting the whole chain on the first failure with
//!   that step's exact exit code
//! - terminal step: replace the current process image, so signal handling,
//!   stream inheritance, and the exit code behave as if the rewritten
//!   command had been typed directly
//!
//! On non-Unix targets process replacement is unavailable; the terminal
//! step is spawned and waited on and its exit code propagated, which
//! differs only in signal forwarding.

use std::process::Command;

use thiserror::Error;

use super::invocation::{Invocation, Step};

/// Errors from executing a command chain.
#[derive(Debug, Error)]
pub enum RunError {
    /// A chain step exited non-zero; its code must be propagated exactly.
    /// The step already wrote its own diagnostics to stderr.
    #[error("command failed with exit status {code}")]
    StepFailed { code: i32 },

    #[error("Error: `{program}` command not found")]
    CommandNotFound { program: String },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Callback(String),
}

impl RunError {
    /// The exit code the whole process should finish with.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::StepFailed { code } => *code,
            _ => 1,
        }
    }

    /// Whether the step already reported itself and hull should stay quiet.
    pub fn is_silent(&self) -> bool {
        matches!(self, RunError::StepFailed { .. })
    }
}

/// Execute (or explain, or suppress) the invocation's command chain.
pub fn execute(invocation: Invocation) -> Result<(), RunError> {
    if invocation.skip() {
        return Ok(());
    }
    if invocation.noop() {
        for line in invocation.render_commands() {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut steps = invocation.into_steps();
    let terminal = match steps.pop() {
        Some(step) => step,
        None => return Ok(()),
    };
    for step in steps {
        run_step(step)?;
    }
    finish_with(terminal)
}

fn run_step(step: Step) -> Result<(), RunError> {
    match step {
        Step::Call { func, .. } => func().map_err(|e| RunError::Callback(format!("{:#}", e))),
        Step::Exec(argv) => {
            if argv.is_empty() {
                return Ok(());
            }
            let status = Command::new(&argv[0])
                .args(&argv[1..])
                .status()
                .map_err(|e| spawn_error(&argv[0], e))?;
            if status.success() {
                Ok(())
            } else {
                Err(RunError::StepFailed {
                    code: status.code().unwrap_or(1),
                })
            }
        }
    }
}

fn finish_with(step: Step) -> Result<(), RunError> {
    match step {
        Step::Call { func, .. } => func().map_err(|e| RunError::Callback(format!("{:#}", e))),
        Step::Exec(argv) => {
            if argv.is_empty() {
                return Ok(());
            }
            replace_process(argv)
        }
    }
}

#[cfg(unix)]
fn replace_process(argv: Vec<String>) -> Result<(), RunError> {
    use std::os::unix::process::CommandExt;

    // Only returns on failure.
    let err = Command::new(&argv[0]).args(&argv[1..]).exec();
    Err(spawn_error(&argv[0], err))
}

#[cfg(not(unix))]
fn replace_process(argv: Vec<String>) -> Result<(), RunError> {
    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .status()
        .map_err(|e| spawn_error(&argv[0], e))?;
    if status.success() {
        Ok(())
    } else {
        Err(RunError::StepFailed {
            code: status.code().unwrap_or(1),
        })
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> RunError {
    if err.kind() == std::io::ErrorKind::NotFound {
        RunError::CommandNotFound {
            program: program.to_string(),
        }
    } else {
        RunError::Spawn {
            program: program.to_string(),
            source: err,
        }
    }
}
