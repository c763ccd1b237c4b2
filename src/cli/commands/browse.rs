//! cli::commands::browse
//!
//! `browse` and `compare` build a project web URL and hand it to the
//! platform browser launcher as the chain's terminal command, so explain
//! mode shows exactly what would open. `-u` echoes the URL instead.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::Context;
use crate::engine::Invocation;
use crate::ui;

pub fn browse(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let url_only = take_url_flag(invocation);
    let mut rest: Vec<String> = invocation.tokens()[1..].to_vec();

    let mut dest = if rest.is_empty() {
        None
    } else {
        Some(rest.remove(0))
    };
    if dest.as_deref() == Some("--") {
        dest = None;
    }

    let (project, branch) = match dest {
        Some(dest) => {
            let project = ctx.resolve_project(Some(dest.as_str()), None)?;
            (project, "master".to_string())
        }
        None => {
            let repo = ctx.local_repo()?;
            let project = match repo.current_project() {
                Some(project) => project,
                None => bail!("Usage: hull browse [<USER>/]<REPOSITORY>"),
            };
            let branch = repo
                .current_branch()
                .and_then(|b| b.upstream())
                .map(|b| b.short_name())
                .unwrap_or_else(|| "master".to_string());
            (project, branch)
        }
    };

    let subpage = if rest.is_empty() {
        None
    } else {
        Some(rest.remove(0))
    };
    let path = match subpage.as_deref() {
        Some("commits") => format!("/commits/{}", branch),
        Some("tree") | None => {
            if branch != "master" {
                format!("/tree/{}", branch)
            } else {
                String::new()
            }
        }
        Some(other) => format!("/{}", other),
    };

    let url = project.web_url(if path.is_empty() {
        None
    } else {
        Some(path.as_str())
    });
    launch(invocation, url, url_only)
}

pub fn compare(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    static SHA_OR_TAG: &str = r"(\w{1,2}|\w[\w.-]+\w)";
    static RANGE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(r"^{SHA_OR_TAG}\.\.{SHA_OR_TAG}$")).unwrap()
    });

    let url_only = take_url_flag(invocation);
    let mut rest: Vec<String> = invocation.tokens()[1..].to_vec();

    let (project, range) = if rest.is_empty() {
        let repo = ctx.local_repo()?;
        let upstream = repo.current_branch().and_then(|b| b.upstream());
        match upstream {
            Some(branch) if !branch.is_master() => {
                let project = match repo.current_project() {
                    Some(project) => project,
                    None => bail!("Usage: hull compare [USER] [<START>...]<END>"),
                };
                (project, branch.short_name())
            }
            _ => bail!("Usage: hull compare [USER] [<START>...]<END>"),
        }
    } else {
        let range_arg = rest.pop().unwrap_or_default();
        let range = RANGE.replace(&range_arg, "${1}...${2}").into_owned();
        let project = match rest.pop() {
            Some(owner) => ctx.resolve_project(None, Some(owner.as_str()))?,
            None => match ctx.local_repo()?.current_project() {
                Some(project) => project,
                None => bail!("Usage: hull compare [USER] [<START>...]<END>"),
            },
        };
        (project, range)
    };

    let path = format!("/compare/{}", range);
    let url = project.web_url(Some(path.as_str()));
    launch(invocation, url, url_only)
}

fn take_url_flag(invocation: &mut Invocation) -> bool {
    let url_only = invocation.remove_value("-u");
    if invocation.remove_value("-p") {
        ui::warn("Warning: the `-p` flag has no effect anymore");
    }
    url_only
}

/// Swap the main command for either an echo of the URL or the platform
/// browser launcher opening it.
fn launch(invocation: &mut Invocation, url: String, url_only: bool) -> Result<()> {
    let argv = if url_only {
        vec!["echo".to_string(), url]
    } else {
        browser_argv(&url)?
    };
    invocation.set_executable(argv);
    invocation.replace_tokens(Vec::new());
    Ok(())
}

/// The launcher argv: `$BROWSER` when set, else the platform opener.
fn browser_argv(url: &str) -> Result<Vec<String>> {
    if let Ok(browser) = std::env::var("BROWSER") {
        if !browser.is_empty() {
            let mut argv =
                shlex::split(&browser).unwrap_or_else(|| vec![browser.clone()]);
            argv.push(url.to_string());
            return Ok(argv);
        }
    }
    let command = match open::commands(url).into_iter().next() {
        Some(command) => command,
        None => bail!("Please set $BROWSER to a web launcher to use this command."),
    };
    let mut argv = vec![command.get_program().to_string_lossy().into_owned()];
    argv.extend(
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned()),
    );
    Ok(argv)
}
