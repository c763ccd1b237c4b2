//! cli::commands::checkout
//!
//! `checkout <pull-request-url> [branch]` fetches the pull request's head
//! into a local tracking branch, adding or updating the contributor's
//! remote as needed.

use anyhow::{anyhow, bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::{Context, GitUrlOptions};
use crate::engine::Invocation;
use crate::forge::{self, ApiClient};

static PULL_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^pull/(\d+)").unwrap());

pub fn checkout(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let words = invocation.words();
    let url_arg = match words.get(1) {
        Some(arg) => arg.clone(),
        None => return Ok(()),
    };
    let new_branch_arg = words.get(2).cloned();

    let url = match ctx.resolve_web_url(&url_arg) {
        Some(url) => url,
        None => return Ok(()),
    };
    let pull_id = match PULL_PATH.captures(url.project_path()) {
        Some(caps) => caps[1].to_string(),
        None => return Ok(()),
    };

    let api = ApiClient::new(ctx);
    let head = api
        .pull_request_head(&url.project, &pull_id)
        .map_err(|e| anyhow!("{}", forge::describe("getting pull request", &e)))?;

    if let Some(name) = &new_branch_arg {
        invocation.remove_value(name);
    }
    let (user, branch) = head
        .label
        .split_once(':')
        .ok_or_else(|| anyhow!("malformed pull request head: {}", head.label))?;
    let repository = match head.repository {
        Some(repository) => repository,
        None => bail!("Error: {}'s fork is not available anymore", user),
    };
    let new_branch_name = new_branch_arg.unwrap_or_else(|| format!("{}-{}", user, branch));

    let repo = ctx.local_repo()?;
    if repo.remote_by_name(user).is_some() {
        invocation.before_git(["remote", "set-branches", "--add", user, branch]);
        invocation.before_git([
            "fetch".to_string(),
            user.to_string(),
            format!("+refs/heads/{}:refs/remotes/{}/{}", branch, user, branch),
        ]);
    } else {
        let project = ctx.resolve_project(Some(url.project.name.as_str()), Some(user))?;
        let remote_url = project.git_url(GitUrlOptions {
            https: ctx.https_protocol(),
            private: repository.private,
        });
        invocation.before_git(["remote", "add", "-f", "-t", branch, user, remote_url.as_str()]);
    }

    if let Some(index) = invocation.position(&url_arg) {
        invocation.remove_at(index);
        invocation.insert(index, format!("{}/{}", user, branch));
        invocation.insert(index, new_branch_name);
        invocation.insert(index, "-B");
        invocation.insert(index, "--track");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::{buffer, repo_context};
    use super::*;

    #[test]
    fn plain_checkouts_pass_through() {
        let ctx = repo_context();
        let mut inv = buffer(&["checkout", "master"]);
        checkout(&mut inv, &ctx).unwrap();
        assert_eq!(inv.tokens(), &["checkout", "master"]);
    }

    #[test]
    fn non_pull_urls_pass_through() {
        let ctx = repo_context();
        let mut inv = buffer(&["checkout", "https://github.com/defunkt/hub/tree/master"]);
        checkout(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.tokens(),
            &["checkout", "https://github.com/defunkt/hub/tree/master"]
        );
    }

    #[test]
    fn unknown_host_urls_pass_through() {
        let ctx = repo_context();
        let mut inv = buffer(&["checkout", "https://example.com/defunkt/hub/pull/1"]);
        checkout(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.tokens(),
            &["checkout", "https://example.com/defunkt/hub/pull/1"]
        );
    }
}
