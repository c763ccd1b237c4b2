//! cli::commands::remote
//!
//! `remote add`/`remote set-url` with `owner` or `owner/repo` shorthand in
//! URL position. A bare `origin` means the caller's own fork of this
//! repository.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::git_url_for;
use crate::core::Context;
use crate::engine::Invocation;

static OWNER_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-zA-Z0-9-]+)$").unwrap());
static OWNER_WITH_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z0-9-]+)/(\w[\w.-]*)$").unwrap());

pub fn remote(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    if !matches!(invocation.get(1), Some("add") | Some("set-url")) {
        return Ok(());
    }
    let last = match invocation.tokens().last() {
        Some(token) => token.clone(),
        None => return Ok(()),
    };
    let (mut user, mut repo) = if let Some(caps) = OWNER_ONLY.captures(&last) {
        (caps[1].to_string(), ctx.repo_name()?)
    } else if let Some(caps) = OWNER_WITH_NAME.captures(&last) {
        (caps[1].to_string(), caps[2].to_string())
    } else {
        // Not shorthand; do not touch the arguments.
        return Ok(());
    };

    let ssh = invocation.remove_value("-p");
    let words = invocation.words();

    if words.get(2).map(String::as_str) == Some("origin") && words.get(3).is_none() {
        // `git remote add origin` with nothing else: the caller's own fork.
        user = ctx.github_user(None)?;
        repo = ctx.repo_name()?;
    } else if words.len() >= 2 && words[words.len() - 2] == words[1] {
        // The shorthand doubles as the remote name: keep the owner there.
        if let Some(last_word) = words.last() {
            if let Some(index) = invocation.position(last_word) {
                invocation.set(index, user.clone());
            }
        }
    } else {
        // Separate remote-name and shorthand arguments: the shorthand goes.
        invocation.pop();
    }

    let url = git_url_for(ctx, Some(repo.as_str()), Some(user.as_str()), ssh)?;
    invocation.push(url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::{buffer, repo_context};
    use super::*;

    #[test]
    fn owner_shorthand_becomes_remote_name_and_url() {
        let ctx = repo_context();
        let mut inv = buffer(&["remote", "add", "rtomayko"]);
        remote(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.tokens(),
            &["remote", "add", "rtomayko", "git://github.com/rtomayko/hub.git"]
        );
    }

    #[test]
    fn the_p_flag_selects_ssh_transport() {
        let ctx = repo_context();
        let mut inv = buffer(&["remote", "add", "-p", "rtomayko"]);
        remote(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.tokens(),
            &["remote", "add", "rtomayko", "git@github.com:rtomayko/hub.git"]
        );
    }

    #[test]
    fn qualified_shorthand_keeps_the_given_remote_name() {
        let ctx = repo_context();
        let mut inv = buffer(&["remote", "add", "tools", "acme/widgets"]);
        remote(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.tokens(),
            &["remote", "add", "tools", "git://github.com/acme/widgets.git"]
        );
    }

    #[test]
    fn bare_origin_means_your_own_fork() {
        let ctx = repo_context();
        ctx.reader().stub_config_value("github.user", "tycho");
        let mut inv = buffer(&["remote", "add", "origin"]);
        remote(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.tokens(),
            &["remote", "add", "origin", "git://github.com/tycho/hub.git"]
        );
    }

    #[test]
    fn set_url_replaces_the_shorthand_with_the_url() {
        let ctx = repo_context();
        let mut inv = buffer(&["remote", "set-url", "origin", "defunkt/hub"]);
        remote(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.tokens(),
            &["remote", "set-url", "origin", "git://github.com/defunkt/hub.git"]
        );
    }

    #[test]
    fn full_urls_pass_through() {
        let ctx = repo_context();
        let mut inv = buffer(&["remote", "add", "origin", "git@github.com:defunkt/hub.git"]);
        remote(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.tokens(),
            &["remote", "add", "origin", "git@github.com:defunkt/hub.git"]
        );
    }

    #[test]
    fn unrelated_remote_subcommands_pass_through() {
        let ctx = repo_context();
        let mut inv = buffer(&["remote", "rm", "mislav"]);
        remote(&mut inv, &ctx).unwrap();
        assert_eq!(inv.tokens(), &["remote", "rm", "mislav"]);
    }
}
