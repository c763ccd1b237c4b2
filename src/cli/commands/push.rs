//! cli::commands::push
//!
//! `push remote1,remote2,... [ref]` expands into one push per remote, all
//! for the same ref (defaulting to the current branch).

use anyhow::Result;

use crate::core::{Context, ContextError};
use crate::engine::Invocation;

pub fn push(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let remotes_arg = match invocation.get(1) {
        Some(arg) if arg.contains(',') => arg.to_string(),
        _ => return Ok(()),
    };

    let branch = match invocation.get(2) {
        Some(branch) => branch.to_string(),
        None => {
            let repo = ctx.local_repo()?;
            let branch = repo
                .current_branch()
                .ok_or(ContextError::NoCurrentBranch)?
                .short_name();
            invocation.push(branch.clone());
            branch
        }
    };

    let mut remotes = remotes_arg.split(',');
    if let Some(first) = remotes.next() {
        invocation.set(1, first);
    }
    for name in remotes {
        invocation.after_git(["push", name, branch.as_str()]);
    }
    Ok(())
}
