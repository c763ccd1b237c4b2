//! cli::commands::fetch
//!
//! `fetch owner1,owner2,...` expands into `fetch --multiple` over the
//! listed names. Names that are not yet remotes (nor remote groups) but do
//! exist as forks of this repository on the host get a `remote add` step
//! scheduled before the fetch.

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use super::clone_url;
use crate::core::Context;
use crate::engine::Invocation;
use crate::forge::{self, ApiClient};

static COMMA_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+(,\w+)+$").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").unwrap());

pub fn fetch(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let names: Vec<String> = if invocation.position("--multiple").is_some() {
        invocation.words().into_iter().skip(1).collect()
    } else if let Some(remote_name) = invocation.word_at(1) {
        if COMMA_LIST.is_match(&remote_name) {
            let names: Vec<String> = remote_name.split(',').map(str::to_string).collect();
            if let Some(index) = invocation.position(&remote_name) {
                invocation.remove_at(index);
                for name in names.iter().rev() {
                    invocation.insert(index, name.clone());
                }
                invocation.insert(index, "--multiple");
            }
            names
        } else {
            vec![remote_name]
        }
    } else {
        Vec::new()
    };
    if names.is_empty() {
        return Ok(());
    }

    let repo = ctx.local_repo()?;
    let api = ApiClient::new(ctx);
    let mut projects = Vec::new();
    for name in &names {
        if NON_WORD.is_match(name)
            || repo.remote_by_name(name).is_some()
            || repo.remotes_group(name).is_some()
        {
            continue;
        }
        let project = ctx.resolve_project(None, Some(name.as_str()))?;
        let exists = api
            .repo_exists(&project)
            .map_err(|e| anyhow!("{}", forge::describe("checking for fork", &e)))?;
        if exists {
            projects.push(project);
        }
    }

    for project in &projects {
        let url = clone_url(ctx, project, false);
        invocation.before_git(["remote", "add", project.owner.as_str(), url.as_str()]);
    }
    Ok(())
}
