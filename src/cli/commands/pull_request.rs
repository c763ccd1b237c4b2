//! cli::commands::pull_request
//!
//! Creates a pull request from the current repository state.
//!
//! Resolution happens in two stages: [`resolve`] parses the flags and
//! settles base, head, and conflicts into a [`PullPlan`]; the rule then
//! composes the message (through the editor when no title was given),
//! calls the API, and swaps the main command for an echo of the created
//! pull request's URL.
//!
//! The precedence here is delicate and deliberate: the tracked branch is
//! consulted only when `-h` was absent, the head==base conflict fires at
//! that point, the head is rewritten to the caller's own account only when
//! the owner differs *and* there is no tracking branch *and* no explicit
//! owner was given, and the unpushed-commit check runs only against a
//! tracking branch and is bypassed by `-f`. Reordering any of these
//! changes which error the user sees first.

use anyhow::{anyhow, bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;

use crate::core::{Context, ContextError, Project};
use crate::engine::Invocation;
use crate::forge::{self, ApiClient, PullRequestParams};
use crate::ui::editor::{compose_pull_request_message, MessageTemplate};

static ISSUE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^issues/(\d+)").unwrap());

/// The settled shape of the pull request to create.
#[derive(Debug)]
pub(crate) struct PullPlan {
    pub base_project: Project,
    /// Base ref (short name).
    pub base: String,
    /// `owner:ref`
    pub head_label: String,
    pub title: Option<String>,
    pub issue: Option<String>,
    /// `<remote>/<head-ref>`, when the head project has a remote here.
    pub remote_branch: Option<String>,
    /// `<remote>/<base-ref>`, when the base project has a remote here.
    pub base_remote_branch: Option<String>,
}

pub fn pull_request(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let plan = resolve(invocation, ctx)?;

    if invocation.noop() {
        println!(
            "Would request a pull to {}:{} from {}",
            plan.base_project.owner, plan.base, plan.head_label
        );
        invocation.mark_skip();
        return Ok(());
    }

    let (title, body) = if plan.title.is_some() || plan.issue.is_some() {
        (plan.title.clone(), None)
    } else {
        let (title, body) = compose_message(ctx, &plan)?;
        (Some(title), body)
    };

    let api = ApiClient::new(ctx);
    let params = PullRequestParams {
        base: plan.base.clone(),
        head: plan.head_label.clone(),
        title,
        body,
        issue: plan.issue.clone(),
    };
    let url = api
        .create_pull_request(&plan.base_project, &params)
        .map_err(|e| anyhow!("{}", forge::describe("creating pull request", &e)))?;

    invocation.set_executable(vec!["echo".to_string()]);
    invocation.replace_tokens(vec![url]);
    Ok(())
}

pub(crate) fn resolve(invocation: &Invocation, ctx: &Context) -> Result<PullPlan> {
    let repo = ctx.local_repo()?;
    let no_project = || anyhow!("Error: repository under 'origin' remote is not a GitHub project");
    let mut base_project = repo.main_project().ok_or_else(no_project)?;
    let mut head_project = repo.current_project().ok_or_else(no_project)?;

    let mut force = false;
    let mut explicit_owner = false;
    let mut base: Option<String> = None;
    let mut head: Option<String> = None;
    let mut issue: Option<String> = None;
    let mut title: Option<String> = None;

    let mut rest: VecDeque<String> = invocation.tokens()[1..].iter().cloned().collect();
    while let Some(arg) = rest.pop_front() {
        match arg.as_str() {
            "-f" => force = true,
            "-b" => {
                let value = rest
                    .pop_front()
                    .ok_or_else(|| anyhow!("invalid argument: -b"))?;
                let (project, r) = from_hosted_ref(ctx, &value, &base_project)?;
                if let Some(project) = project {
                    base_project = project;
                }
                base = Some(r);
            }
            "-h" => {
                let value = rest
                    .pop_front()
                    .ok_or_else(|| anyhow!("invalid argument: -h"))?;
                explicit_owner = value.contains(':');
                let (project, r) = from_hosted_ref(ctx, &value, &head_project)?;
                if let Some(project) = project {
                    head_project = project;
                }
                head = Some(r);
            }
            "-i" => issue = rest.pop_front(),
            _ => {
                let issue_url = ctx
                    .resolve_web_url(&arg)
                    .and_then(|url| {
                        ISSUE_PATH
                            .captures(url.project_path())
                            .map(|caps| (url.project.clone(), caps[1].to_string()))
                    });
                if let Some((project, number)) = issue_url {
                    issue = Some(number);
                    base_project = project;
                } else if title.is_none() {
                    title = Some(arg);
                } else {
                    bail!("invalid argument: {}", arg);
                }
            }
        }
    }

    let base = base.unwrap_or_else(|| repo.master_branch().short_name());
    let current_branch = repo
        .current_branch()
        .ok_or(ContextError::NoCurrentBranch)?;

    // Tracked-branch discovery happens only when no explicit head was
    // given; an upstream that is not a remote-tracking ref is ignored.
    let mut tracked = None;
    if head.is_none() {
        if let Some(upstream) = current_branch.upstream() {
            if upstream.is_remote() {
                if base_project == head_project && upstream.short_name() == base {
                    bail!(
                        "Aborted: head branch is the same as base (\"{}\")\n\
                         (use `-h <branch>` to specify an explicit pull request head)",
                        base
                    );
                }
                tracked = Some(upstream);
            }
        }
    }
    let head_ref = head.unwrap_or_else(|| {
        tracked
            .as_ref()
            .map(|branch| branch.short_name())
            .unwrap_or_else(|| current_branch.short_name())
    });

    // Auto-fork-to-self: only when the head is neither explicitly owned
    // nor inferred from a tracking branch.
    let user = ctx.github_user(Some(head_project.host.as_str()))?;
    if head_project.owner != user && tracked.is_none() && !explicit_owner {
        head_project = head_project.owned_by(&user);
    }

    let remote_branch = repo
        .remote_for(&head_project)
        .map(|remote| format!("{}/{}", remote.name(), head_ref));
    let head_label = format!("{}:{}", head_project.owner, head_ref);

    if !force && tracked.is_some() {
        if let Some(remote_branch) = &remote_branch {
            if let Some(unpushed) = ctx.rev_list(remote_branch, None) {
                bail!(
                    "Aborted: {} commits are not yet pushed to {}\n\
                     (use `-f` to force submit a pull request anyway)",
                    unpushed.lines().count(),
                    remote_branch
                );
            }
        }
    }

    let base_remote_branch = repo
        .remote_for(&base_project)
        .map(|remote| format!("{}/{}", remote.name(), base));

    Ok(PullPlan {
        base_project,
        base,
        head_label,
        title,
        issue,
        remote_branch,
        base_remote_branch,
    })
}

/// `owner:ref` re-resolves the project for that owner under the same
/// repository name; a bare ref keeps the context project.
fn from_hosted_ref(
    ctx: &Context,
    value: &str,
    context_project: &Project,
) -> Result<(Option<Project>, String)> {
    match value.split_once(':') {
        Some((owner, r)) => {
            let project = ctx.resolve_project(Some(context_project.name.as_str()), Some(owner))?;
            Ok((Some(project), r.to_string()))
        }
        None => Ok((None, value.to_string())),
    }
}

/// Default message composition: one commit donates its subject and body,
/// several become commentary, none leaves the file blank.
fn compose_message(ctx: &Context, plan: &PullPlan) -> Result<(String, Option<String>)> {
    let commits: Vec<String> = match (&plan.base_remote_branch, &plan.remote_branch) {
        (Some(base), Some(head)) => ctx
            .rev_list(base, Some(head.as_str()))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let (default_message, commit_summary) = match commits.len() {
        0 => (None, None),
        1 => {
            let message = ctx
                .reader()
                .read(&format!("show -s --format='%w(78,0,0)%s%n%+b' {}", commits[0]));
            (message, None)
        }
        _ => {
            // Unwraps to 78 columns with the body indented under the hash line.
            let summary = ctx.reader().read(&format!(
                "log --no-color --format='%h (%aN, %ar)%n%w(78,3,3)%s%n%+b' --cherry {}...{}",
                plan.base_remote_branch.as_deref().unwrap_or_default(),
                plan.remote_branch.as_deref().unwrap_or_default()
            ));
            (None, summary)
        }
    };

    compose_pull_request_message(
        ctx,
        &MessageTemplate {
            default_message,
            commit_summary,
            base_label: format!("{}:{}", plan.base_project.owner, plan.base),
            head_label: plan.head_label.clone(),
        },
    )
}
