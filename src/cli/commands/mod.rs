//! cli::commands
//!
//! The rewrite rules, one per recognized git command.
//!
//! Each rule receives the in-progress [`Invocation`] and the resolution
//! [`Context`] and mutates the buffer: replacing shorthand tokens,
//! scheduling extra chain steps, or swapping out the main command
//! entirely. A rule returning an error aborts the run before anything is
//! executed. Command names the table does not know pass through untouched.

mod alias;
mod am;
mod browse;
mod checkout;
mod cherry_pick;
mod clone;
mod create;
mod fetch;
mod fork;
mod help;
mod init;
mod pull_request;
mod push;
mod remote;
mod submodule;
mod version;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::{Context, GitUrlOptions, Project};
use crate::engine::Invocation;

/// A rewrite rule bound to one command name.
pub type Rule = fn(&mut Invocation, &Context) -> Result<()>;

/// Fixed mapping from a command name to its rule.
///
/// Unknown names get no rule: the invocation passes through to git
/// unmodified.
pub fn rule_for(name: &str) -> Option<Rule> {
    match name {
        "alias" => Some(alias::alias),
        "am" | "apply" => Some(am::am),
        "browse" => Some(browse::browse),
        "checkout" => Some(checkout::checkout),
        "cherry-pick" => Some(cherry_pick::cherry_pick),
        "clone" => Some(clone::clone),
        "compare" => Some(browse::compare),
        "create" => Some(create::create),
        "fetch" => Some(fetch::fetch),
        "fork" => Some(fork::fork),
        "help" => Some(help::help),
        "init" => Some(init::init),
        "pull-request" => Some(pull_request::pull_request),
        "push" => Some(push::push),
        "remote" => Some(remote::remote),
        "submodule" => Some(submodule::submodule),
        "version" => Some(version::version),
        _ => None,
    }
}

/// `name` or `owner/name`.
pub(crate) static NAME_WITH_OWNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\w[\w.-]*|[a-zA-Z0-9-]+/\w[\w.-]*)$").unwrap());

/// Resolve a shorthand reference and render its clone URL, honoring the
/// configured transport preference.
pub(crate) fn git_url_for(
    ctx: &Context,
    name: Option<&str>,
    owner: Option<&str>,
    private: bool,
) -> Result<String> {
    let project = ctx.resolve_project(name, owner)?;
    Ok(clone_url(ctx, &project, private))
}

pub(crate) fn clone_url(ctx: &Context, project: &Project, private: bool) -> String {
    project.git_url(GitUrlOptions {
        https: ctx.https_protocol(),
        private,
    })
}
