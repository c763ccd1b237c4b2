//! git
//!
//! Memoized read-only interface to the git executable.
//!
//! This module is the **single doorway** for every query hull makes against
//! the underlying tool. No other module spawns git directly for reads; they
//! all go through [`GitReader`], which provides:
//!
//! - Memoization: each distinct query runs at most once per process. A miss
//!   (non-zero exit or empty output) is cached too, so repeated reads always
//!   observe the same answer for the lifetime of one invocation.
//! - Pre-seeding: tests and the `-c key=value` global flag can plant answers
//!   before any process is spawned.
//! - Exec-flag augmentation: intercepted global flags (`--git-dir=...` and
//!   friends) are appended to the executable so every future query carries
//!   them.
//!
//! The executable defaults to `git` and is overridable with the `GIT`
//! environment variable.

use std::cell::RefCell;
use std::collections::HashMap;
use std::process::{Command, Stdio};

/// Cached, read-only query access to the git executable.
///
/// Interior mutability keeps the borrow story simple for the lazy traversal
/// in [`crate::core`]; the tool is single-threaded, so a `RefCell` suffices.
pub struct GitReader {
    executable: RefCell<Vec<String>>,
    cache: RefCell<HashMap<String, Option<String>>>,
}

impl GitReader {
    /// Create a reader for the executable named by `$GIT`, or `git`.
    pub fn from_env() -> Self {
        let exe = std::env::var("GIT").unwrap_or_else(|_| "git".to_string());
        Self::new(vec![exe])
    }

    /// Create a reader for an explicit executable argv.
    pub fn new(executable: Vec<String>) -> Self {
        GitReader {
            executable: RefCell::new(executable),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The current executable argv (program plus any attached global flags).
    pub fn executable(&self) -> Vec<String> {
        self.executable.borrow().clone()
    }

    /// Append global flags to the executable for all future queries.
    pub fn add_exec_flags(&self, flags: &[String]) {
        self.executable.borrow_mut().extend_from_slice(flags);
    }

    /// Run `git <query>` and return its trimmed stdout, memoized.
    ///
    /// Returns `None` when the command exits non-zero or prints nothing.
    /// Stderr is silenced; these are speculative reads and their failures
    /// are answers, not errors.
    pub fn read(&self, query: &str) -> Option<String> {
        if let Some(cached) = self.cache.borrow().get(query) {
            return cached.clone();
        }
        let result = self.run_query(query);
        self.cache
            .borrow_mut()
            .insert(query.to_string(), result.clone());
        result
    }

    /// Read a single-valued config key (`git config --get <key>`).
    pub fn read_config(&self, key: &str) -> Option<String> {
        self.read(&format!("config --get {}", key))
    }

    /// Read a multi-valued config key (`git config --get-all <key>`),
    /// one value per line.
    pub fn read_config_all(&self, key: &str) -> Option<String> {
        self.read(&format!("config --get-all {}", key))
    }

    /// Plant the answer for a query without running anything.
    pub fn stub_output(&self, query: &str, value: Option<&str>) {
        self.cache
            .borrow_mut()
            .insert(query.to_string(), value.map(str::to_string));
    }

    /// Plant a config value as if `git config --get <key>` had returned it.
    ///
    /// Used by the `-c key=value` global flag so in-process reads observe
    /// the override that will also be re-attached to spawned commands.
    pub fn stub_config_value(&self, key: &str, value: &str) {
        self.stub_output(&format!("config --get {}", key), Some(value));
    }

    fn run_query(&self, query: &str) -> Option<String> {
        let exe = self.executable.borrow();
        let words = shlex::split(query)
            .unwrap_or_else(|| query.split_whitespace().map(str::to_string).collect());

        let output = Command::new(&exe[0])
            .args(&exe[1..])
            .args(&words)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                // Unrecoverable mid-resolution: the configured executable
                // does not exist, so no query can ever succeed.
                eprintln!("Error: `{}` command not found", exe[0]);
                std::process::exit(1);
            }
            Err(_) => return None,
        };

        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8_lossy(&output.stdout);
        let text = text.trim_end_matches(|c| c == '\r' || c == '\n');
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}
