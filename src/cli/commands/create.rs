//! cli::commands::create
//!
//! Creates the repository on the host, then rewrites the invocation into
//! wiring up (or showing) the `origin` remote.

use anyhow::{anyhow, bail, Result};
use std::collections::VecDeque;

use crate::core::{Context, GitUrlOptions};
use crate::engine::Invocation;
use crate::forge::{self, ApiClient, RepoOptions};
use crate::ui;

pub fn create(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    if !ctx.is_repo() {
        bail!("'create' must be run from inside a git repository");
    }
    let mut owner = ctx.github_user(None)?;
    ctx.github_token(None)?;

    let mut rest: VecDeque<String> = invocation.tokens()[1..].iter().cloned().collect();
    let mut options = RepoOptions::default();
    let mut new_repo_name: Option<String> = None;

    while let Some(arg) = rest.pop_front() {
        match arg.as_str() {
            "-p" => options.private = true,
            "-d" => options.description = rest.pop_front(),
            "-h" => options.homepage = rest.pop_front(),
            _ => {
                if !arg.starts_with('-') && new_repo_name.is_none() {
                    match arg.split_once('/') {
                        Some((o, n)) => {
                            owner = o.to_string();
                            new_repo_name = Some(n.to_string());
                        }
                        None => new_repo_name = Some(arg),
                    }
                } else {
                    bail!("invalid argument: {}", arg);
                }
            }
        }
    }

    let name = match new_repo_name {
        Some(name) => name,
        None => ctx.repo_name()?,
    };
    let new_project = ctx.resolve_project(Some(name.as_str()), Some(owner.as_str()))?;

    let api = ApiClient::new(ctx);
    let action = if api
        .repo_exists(&new_project)
        .map_err(|e| anyhow!("{}", forge::describe("creating repository", &e)))?
    {
        ui::warn(format!(
            "{} already exists on {}",
            new_project.name_with_owner(),
            new_project.host
        ));
        "set remote origin"
    } else {
        if !invocation.noop() {
            api.create_repo(&new_project, &options)
                .map_err(|e| anyhow!("{}", forge::describe("creating repository", &e)))?;
        }
        "created repository"
    };

    let url = new_project.git_url(GitUrlOptions {
        https: ctx.https_protocol(),
        private: true,
    });
    let has_origin = ctx
        .local_repo()?
        .remotes()
        .first()
        .map(|r| r.name() == "origin")
        .unwrap_or(false);
    if !has_origin {
        invocation.replace_tokens(
            ["remote", "add", "-f", "origin", url.as_str()]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
    } else {
        invocation.replace_tokens(vec!["remote".to_string(), "-v".to_string()]);
    }
    invocation.after_exec([
        "echo".to_string(),
        format!("{}:", action),
        new_project.name_with_owner(),
    ]);
    Ok(())
}
