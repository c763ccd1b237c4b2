//! cli::commands::init
//!
//! `init -g` initializes the repository and then adds an `origin` remote
//! pointing at the caller's project named after the current directory.

use anyhow::Result;

use crate::core::{Context, GitUrlOptions, Project};
use crate::engine::Invocation;

pub fn init(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    if !invocation.remove_value("-g") {
        return Ok(());
    }
    let host = std::env::var("GITHUB_HOST").ok();
    let user = ctx.github_user(host.as_deref())?;
    let name = std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let project = Project::new(user, name, host);
    let url = project.git_url(GitUrlOptions {
        https: ctx.https_protocol(),
        private: true,
    });
    invocation.after_git(["remote", "add", "origin", url.as_str()]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::{bare_context, buffer};
    use super::*;

    #[test]
    fn dash_g_schedules_the_origin_remote() {
        let ctx = bare_context();
        ctx.reader().stub_config_value("github.user", "tycho");
        let mut inv = buffer(&["init", "-g"]);
        init(&mut inv, &ctx).unwrap();

        let dir = std::env::current_dir().unwrap();
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(
            inv.render_commands(),
            vec![
                "git init".to_string(),
                format!("git remote add origin git@github.com:tycho/{}.git", name),
            ]
        );
    }

    #[test]
    fn plain_init_passes_through() {
        let ctx = bare_context();
        let mut inv = buffer(&["init"]);
        init(&mut inv, &ctx).unwrap();
        assert_eq!(inv.tokens(), &["init"]);
        assert!(!inv.changed());
    }
}
