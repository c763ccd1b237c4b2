//! cli::commands::cherry_pick
//!
//! Cross-fork commit references: a hosted commit URL or `owner@sha` is
//! replaced with the bare sha, with a fetch of that owner's fork scheduled
//! first.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::clone_url;
use crate::core::{Context, Project};
use crate::engine::Invocation;

static COMMIT_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^commit/([a-f0-9]{7,40})").unwrap());
static OWNER_AT_SHA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z0-9-]+)@([a-f0-9]{7,40})$").unwrap());

pub fn cherry_pick(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    if invocation.position("-m").is_some() || invocation.position("--mainline").is_some() {
        return Ok(());
    }
    let ref_arg = match invocation.words().last() {
        Some(arg) => arg.clone(),
        None => return Ok(()),
    };

    let resolved: Option<(Project, String)> = if let Some(url) = ctx.resolve_web_url(&ref_arg) {
        COMMIT_PATH
            .captures(url.project_path())
            .map(|caps| (url.project.clone(), caps[1].to_string()))
    } else if let Some(caps) = OWNER_AT_SHA.captures(&ref_arg) {
        ctx.local_repo()?
            .main_project()
            .map(|main| (main.owned_by(&caps[1]), caps[2].to_string()))
    } else {
        None
    };
    let (project, sha) = match resolved {
        Some(resolved) => resolved,
        None => return Ok(()),
    };

    if let Some(index) = invocation.position(&ref_arg) {
        invocation.set(index, sha);
    }

    let repo = ctx.local_repo()?;
    match repo.remote_for(&project) {
        Some(remote) => {
            let name = remote.name().to_string();
            invocation.before_git(["fetch", name.as_str()]);
        }
        None => {
            let url = clone_url(ctx, &project, false);
            invocation.before_git(["remote", "add", "-f", project.owner.as_str(), url.as_str()]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::{buffer, repo_context};
    use super::*;

    #[test]
    fn owner_at_sha_fetches_that_fork() {
        let ctx = repo_context();
        let mut inv = buffer(&["cherry-pick", "rtomayko@deadbee1"]);
        cherry_pick(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.render_commands(),
            vec![
                "git remote add -f rtomayko git://github.com/rtomayko/hub.git",
                "git cherry-pick deadbee1",
            ]
        );
    }

    #[test]
    fn an_existing_remote_is_fetched_not_added() {
        let ctx = repo_context();
        let mut inv = buffer(&["cherry-pick", "mislav@deadbee1"]);
        cherry_pick(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.render_commands(),
            vec!["git fetch mislav", "git cherry-pick deadbee1"]
        );
    }

    #[test]
    fn commit_urls_resolve_to_project_and_sha() {
        let ctx = repo_context();
        let mut inv = buffer(&[
            "cherry-pick",
            "https://github.com/rtomayko/hub/commit/deadbee1",
        ]);
        cherry_pick(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.render_commands(),
            vec![
                "git remote add -f rtomayko git://github.com/rtomayko/hub.git",
                "git cherry-pick deadbee1",
            ]
        );
    }

    #[test]
    fn mainline_picks_pass_through() {
        let ctx = repo_context();
        let mut inv = buffer(&["cherry-pick", "-m", "1", "rtomayko@deadbee1"]);
        cherry_pick(&mut inv, &ctx).unwrap();
        assert_eq!(inv.tokens(), &["cherry-pick", "-m", "1", "rtomayko@deadbee1"]);
    }

    #[test]
    fn ordinary_refs_pass_through() {
        let ctx = repo_context();
        let mut inv = buffer(&["cherry-pick", "deadbee1"]);
        cherry_pick(&mut inv, &ctx).unwrap();
        assert_eq!(inv.tokens(), &["cherry-pick", "deadbee1"]);
        assert!(!inv.chained());
    }
}
