//! cli::commands::help
//!
//! `help` with no command prints an improved command listing; `help hull`
//! prints hull's own usage page. Anything else passes through to git.

use anyhow::Result;

use crate::core::Context;
use crate::engine::Invocation;

pub fn help(invocation: &mut Invocation, _ctx: &Context) -> Result<()> {
    match invocation.word_at(1).as_deref() {
        Some("hull") => {
            println!("{}", hull_usage());
            invocation.mark_skip();
        }
        None if !invocation.has_flag(&["-a", "--all"]) => {
            println!("{}", improved_help_text());
            invocation.mark_skip();
        }
        _ => {}
    }
    Ok(())
}

fn hull_usage() -> &'static str {
    "\
hull: git + hub = github

usage: hull [--noop] COMMAND OPTIONS

Expanded git commands:
   git init -g OPTIONS
   git clone [-p] OPTIONS [USER/]REPOSITORY DIRECTORY
   git remote add [-p] OPTIONS USER[/REPOSITORY]
   git remote set-url [-p] OPTIONS REMOTE-NAME USER[/REPOSITORY]
   git fetch USER-1,[USER-2,...]
   git push REMOTE-1,REMOTE-2,...,REMOTE-N REF
   git checkout PULLREQ-URL [BRANCH]
   git cherry-pick GITHUB-REF
   git am GITHUB-URL
   git apply GITHUB-URL
   git submodule add [-p] OPTIONS [USER/]REPOSITORY DIRECTORY

Custom git commands:
   git alias [-s] SHELL
   git browse [-u] [[USER/]REPOSITORY] [SUBPAGE]
   git compare [-u] [USER] [START...]END
   git create [NAME] [-p] [-d DESCRIPTION] [-h HOMEPAGE]
   git fork [--no-remote]
   git pull-request [-f] [TITLE|-i ISSUE] [-b BASE] [-h HEAD]"
}

fn improved_help_text() -> &'static str {
    "\
usage: git [--version] [--exec-path[=<path>]] [--html-path] [--man-path] [--info-path]
           [-p|--paginate|--no-pager] [--no-replace-objects] [--bare]
           [--git-dir=<path>] [--work-tree=<path>] [--namespace=<name>]
           [-c name=value] [--help]
           <command> [<args>]

Basic Commands:
   init       Create an empty git repository or reinitialize an existing one
   add        Add new or modified files to the staging area
   rm         Remove files from the working directory and staging area
   mv         Move or rename a file, a directory, or a symlink
   status     Show the status of the working directory and staging area
   commit     Record changes to the repository

History Commands:
   log        Show the commit history log
   diff       Show changes between commits, commit and working tree, etc
   show       Show information about commits, tags or files

Branching Commands:
   branch     List, create, or delete branches
   checkout   Switch the active branch to another branch
   merge      Join two or more development histories (branches) together
   tag        Create, list, delete, sign or verify a tag object

Remote Commands:
   clone      Clone a remote repository into a new directory
   fetch      Download data, tags and branches from a remote repository
   pull       Fetch from and merge with another repository or a local branch
   push       Upload data, tags and branches to a remote repository
   remote     View and manage a set of remote repositories

Advanced commands:
   reset      Reset your staging area or working directory to another point
   rebase     Re-apply a series of patches in one branch onto another
   bisect     Find by binary search the change that introduced a bug
   grep       Print files with lines matching a pattern in your codebase

See 'git help <command>' for more information on a specific command."
}

#[cfg(test)]
mod tests {
    use super::super::testing::{bare_context, buffer};
    use super::*;

    #[test]
    fn bare_help_prints_the_listing_and_stops() {
        let ctx = bare_context();
        let mut inv = buffer(&["help"]);
        help(&mut inv, &ctx).unwrap();
        assert!(inv.skip());
    }

    #[test]
    fn help_all_passes_through_to_git() {
        let ctx = bare_context();
        let mut inv = buffer(&["help", "-a"]);
        help(&mut inv, &ctx).unwrap();
        assert!(!inv.skip());
    }

    #[test]
    fn help_for_a_command_passes_through() {
        let ctx = bare_context();
        let mut inv = buffer(&["help", "rebase"]);
        help(&mut inv, &ctx).unwrap();
        assert!(!inv.skip());
        assert_eq!(inv.tokens(), &["help", "rebase"]);
    }

    #[test]
    fn help_hull_prints_our_own_page() {
        let ctx = bare_context();
        let mut inv = buffer(&["help", "hull"]);
        help(&mut inv, &ctx).unwrap();
        assert!(inv.skip());
    }
}
