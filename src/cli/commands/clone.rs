//! cli::commands::clone
//!
//! Expands `owner/name` (or bare `name`) shorthand in clone-like position
//! into a fully qualified clone URL. SSH transport is implied when the
//! resolved owner is the caller's own identity, when `-p` asks for it, or
//! when a custom host is in force.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::NAME_WITH_OWNER;
use crate::core::{Context, GitUrlOptions, Project};
use crate::engine::Invocation;

/// Flags of `git clone` that consume a following value.
static HAS_VALUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(--(upload-pack|template|depth|origin|branch|reference)|-[ubo])$").unwrap()
});

pub fn clone(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let mut ssh = invocation.remove_value("-p");

    // Clone accepts at most one repository reference: scan flags (skipping
    // the values of value-taking ones) and stop at the first word.
    let mut idx = 1;
    while idx < invocation.len() {
        let arg = match invocation.get(idx) {
            Some(arg) => arg.to_string(),
            None => break,
        };
        if arg.starts_with('-') {
            if HAS_VALUES.is_match(&arg) {
                idx += 1;
            }
        } else {
            if NAME_WITH_OWNER.is_match(&arg) && !std::path::Path::new(&arg).is_dir() {
                let host = std::env::var("GITHUB_HOST").ok();
                let (owner, name) = match arg.split_once('/') {
                    Some((owner, name)) => (owner.to_string(), name),
                    None => (ctx.github_user(host.as_deref())?, arg.as_str()),
                };
                let project = Project::new(owner, name, host.clone());

                let is_submodule = invocation.get(0) == Some("submodule");
                if !ssh {
                    let own_identity = ctx.try_github_user(host.as_deref());
                    ssh = (!is_submodule
                        && own_identity.as_deref() == Some(project.owner.as_str()))
                        || host.is_some();
                }
                let url = project.git_url(GitUrlOptions {
                    https: ctx.https_protocol(),
                    private: ssh,
                });
                invocation.set(idx, url);
            }
            break;
        }
        idx += 1;
    }
    Ok(())
}
