//! cli::commands::fork
//!
//! Forks the main project to the caller's own account, then rewrites the
//! invocation into adding that fork as a remote.

use anyhow::{anyhow, bail, Result};

use crate::core::{Context, GitUrlOptions};
use crate::engine::Invocation;
use crate::forge::{self, ApiClient};
use crate::ui;

pub fn fork(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let repo = ctx.local_repo()?;
    let project = match repo.main_project() {
        Some(project) => project,
        None => bail!("Error: repository under 'origin' remote is not a GitHub project"),
    };
    let user = ctx.github_user(Some(project.host.as_str()))?;
    let forked = project.owned_by(&user);

    let api = ApiClient::new(ctx);
    let exists = api
        .repo_exists(&forked)
        .map_err(|e| anyhow!("{}", forge::describe("creating fork", &e)))?;
    if exists {
        ui::warn(format!(
            "{} already exists on {}",
            forked.name_with_owner(),
            forked.host
        ));
    } else if !invocation.noop() {
        api.fork_repo(&project)
            .map_err(|e| anyhow!("{}", forge::describe("creating fork", &e)))?;
    }

    if invocation.position("--no-remote").is_some() {
        invocation.mark_skip();
        return Ok(());
    }

    let url = forked.git_url(GitUrlOptions {
        https: ctx.https_protocol(),
        private: true,
    });
    invocation.replace_tokens(
        ["remote", "add", "-f", user.as_str(), url.as_str()]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    invocation.after_exec(["echo", "new remote:", user.as_str()]);
    Ok(())
}
