//! cli
//!
//! Entry layer: intercepts global flags, expands git aliases for the
//! command word, dispatches to the matching rewrite rule, and hands the
//! finished buffer to the engine.
//!
//! The surface is deliberately a passthrough: tokens hull does not
//! recognize are forwarded to git verbatim, so parsing is a fixed
//! name-to-rule table plus hand-rolled interception of the handful of
//! global git flags that matter before dispatch.

pub mod commands;

use std::rc::Rc;

use anyhow::Result;

use crate::core::Context;
use crate::engine::{self, Invocation};
use crate::git::GitReader;

/// Run one hull invocation (everything after the program name).
pub fn run(argv: Vec<String>) -> Result<()> {
    let reader = Rc::new(GitReader::from_env());
    let mut invocation = Invocation::with_executable(argv, reader.executable());

    slurp_global_flags(&mut invocation, &reader);
    if invocation.is_empty() {
        invocation.push("help");
    }

    let ctx = Context::new(reader);
    dispatch(&mut invocation, &ctx)?;
    engine::execute(invocation)?;
    Ok(())
}

/// Expand a configured alias for the command word, then apply its rule.
fn dispatch(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let mut command = match invocation.get(0) {
        Some(command) => command.to_string(),
        None => return Ok(()),
    };

    // Shell-style (`!`) aliases stay git's business.
    let expansion = ctx
        .git_alias(&command)
        .filter(|body| !body.starts_with('!'))
        .and_then(|body| shlex::split(&body))
        .filter(|words| !words.is_empty());
    if let Some(words) = &expansion {
        command = words[0].clone();
    }

    if let Some(rule) = commands::rule_for(&command) {
        if let Some(words) = expansion {
            let mut tokens = invocation.tokens().to_vec();
            tokens.splice(0..1, words);
            invocation.replace_tokens(tokens);
        }
        rule(invocation, ctx)?;
    }
    Ok(())
}

/// Global flags recognized before the command word.
const GLOBAL_FLAGS: &[&str] = &[
    "--noop",
    "-c",
    "-p",
    "--paginate",
    "--no-pager",
    "--no-replace-objects",
    "--bare",
    "--version",
    "--help",
];

/// Global flags carrying an inline value.
const GLOBAL_VALUE_FLAGS: &[&str] = &["--exec-path=", "--git-dir=", "--work-tree="];

/// Pull the global flags off the front of the buffer.
///
/// Most re-attach to both the reader (so queries see them) and every
/// spawned command; pager flags re-attach to spawned commands only, and
/// `-c key=value` additionally pre-seeds the reader so in-process reads
/// observe the override.
fn slurp_global_flags(invocation: &mut Invocation, reader: &GitReader) {
    let mut globals: Vec<String> = Vec::new();
    let mut locals: Vec<String> = Vec::new();

    loop {
        let flag = match invocation.get(0) {
            Some(first)
                if GLOBAL_FLAGS.contains(&first)
                    || GLOBAL_VALUE_FLAGS.iter().any(|p| first.starts_with(p)) =>
            {
                first.to_string()
            }
            _ => break,
        };
        invocation.remove_at(0);
        match flag.as_str() {
            "--noop" => invocation.mark_noop(),
            "--version" => invocation.insert(0, "version"),
            "--help" => invocation.insert(0, "help"),
            "-c" => {
                if !invocation.is_empty() {
                    let pair = invocation.remove_at(0);
                    match pair.split_once('=') {
                        Some((key, value)) => reader.stub_config_value(key, value),
                        None => reader.stub_output(&format!("config --get {}", pair), None),
                    }
                    globals.push(flag);
                    globals.push(pair);
                }
            }
            "-p" | "--paginate" | "--no-pager" => locals.push(flag),
            _ => globals.push(flag),
        }
    }

    reader.add_exec_flags(&globals);
    invocation.add_exec_flags(&globals);
    invocation.add_exec_flags(&locals);
}
