//! core::repo
//!
//! The local repository and its remotes and branches.
//!
//! These are lightweight value types holding a back-reference to the owning
//! [`LocalRepo`]; traversal (current branch → upstream → remote → project)
//! is lazy and every underlying git query is memoized by the reader, so
//! walking the same edge twice is free and always consistent.

use std::path::PathBuf;
use std::rc::Rc;

use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::Regex;
use url::Url;

use crate::core::project::{default_host, Project};
use crate::git::GitReader;

/// The repository rooted at the working directory.
pub struct LocalRepo {
    reader: Rc<GitReader>,
    dir: PathBuf,
    remote_names: OnceCell<Vec<String>>,
}

impl LocalRepo {
    pub fn new(reader: Rc<GitReader>, dir: PathBuf) -> Self {
        LocalRepo {
            reader,
            dir,
            remote_names: OnceCell::new(),
        }
    }

    pub fn reader(&self) -> &GitReader {
        &self.reader
    }

    /// Repository name: the main project's name, else the directory's
    /// base name.
    pub fn name(&self) -> String {
        if let Some(project) = self.main_project() {
            return project.name;
        }
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The project behind the primary remote, if its URL is recognized.
    pub fn main_project(&self) -> Option<Project> {
        self.origin_remote()?.project()
    }

    /// The project the current branch tracks, if any.
    pub fn upstream_project(&self) -> Option<Project> {
        let branch = self.current_branch()?;
        let upstream = branch.upstream()?;
        if !upstream.is_remote() {
            return None;
        }
        let remote = self.remote_by_name(upstream.remote_name()?)?;
        remote.project()
    }

    /// Upstream project when tracked, else the main project.
    pub fn current_project(&self) -> Option<Project> {
        self.upstream_project().or_else(|| self.main_project())
    }

    /// The currently checked-out branch; `None` on a detached HEAD.
    pub fn current_branch(&self) -> Option<Branch<'_>> {
        let name = self.reader.read("symbolic-ref -q HEAD")?;
        Some(Branch::new(self, name))
    }

    /// The conventional default branch.
    pub fn master_branch(&self) -> Branch<'_> {
        Branch::new(self, "refs/heads/master".to_string())
    }

    /// Configured remotes, in git's order except that `origin` is moved to
    /// the front when present.
    pub fn remotes(&self) -> Vec<Remote<'_>> {
        let names = self.remote_names.get_or_init(|| {
            let mut list: Vec<String> = self
                .reader
                .read("remote")
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect();
            if let Some(pos) = list.iter().position(|n| n == "origin") {
                let origin = list.remove(pos);
                list.insert(0, origin);
            }
            list
        });
        names
            .iter()
            .map(|name| Remote::new(self, name.clone()))
            .collect()
    }

    /// The configured remotes-group under `remotes.<name>`, if any.
    pub fn remotes_group(&self, name: &str) -> Option<String> {
        self.reader.read_config(&format!("remotes.{}", name))
    }

    /// The primary remote (first after origin-fronting).
    pub fn origin_remote(&self) -> Option<Remote<'_>> {
        self.remotes().into_iter().next()
    }

    pub fn remote_by_name(&self, remote_name: &str) -> Option<Remote<'_>> {
        self.remotes().into_iter().find(|r| r.name() == remote_name)
    }

    /// The remote whose URL resolves to the given project.
    pub fn remote_for(&self, project: &Project) -> Option<Remote<'_>> {
        self.remotes()
            .into_iter()
            .find(|r| r.project().as_ref() == Some(project))
    }

    /// Hosts recognized as "the hosting service": every configured
    /// `hull.host` value plus the default host.
    pub fn known_hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self
            .reader
            .read_config_all("hull.host")
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect();
        hosts.push(self.default_host());
        hosts
    }

    pub fn default_host(&self) -> String {
        default_host()
    }
}

/// A configured remote, lazily resolvable to a hosted project.
pub struct Remote<'a> {
    repo: &'a LocalRepo,
    name: String,
}

impl<'a> Remote<'a> {
    fn new(repo: &'a LocalRepo, name: String) -> Self {
        Remote { repo, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first configured URL that matches a known host, as a project.
    pub fn project(&self) -> Option<Project> {
        let known_hosts = self.repo.known_hosts();
        self.urls()
            .iter()
            .find_map(|url| Project::from_url(url, &known_hosts))
    }

    /// Configured URLs, with scp-like syntax normalized to `ssh://`.
    pub fn urls(&self) -> Vec<Url> {
        static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w-]+://").unwrap());
        static SCP_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^/]+?):(.+)$").unwrap());

        self.repo
            .reader()
            .read_config_all(&format!("remote.{}.url", self.name))
            .unwrap_or_default()
            .lines()
            .filter_map(|raw| {
                if SCHEME.is_match(raw) {
                    Url::parse(raw).ok()
                } else if let Some(caps) = SCP_LIKE.captures(raw) {
                    Url::parse(&format!("ssh://{}/{}", &caps[1], &caps[2])).ok()
                } else {
                    None
                }
            })
            .collect()
    }
}

impl std::fmt::Display for Remote<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A ref name (`refs/heads/x` or `refs/remotes/origin/x`) in the context
/// of its repository.
pub struct Branch<'a> {
    repo: &'a LocalRepo,
    name: String,
}

impl<'a> Branch<'a> {
    pub fn new(repo: &'a LocalRepo, name: String) -> Self {
        Branch { repo, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name: the ref with its `refs/heads/` or remote prefix
    /// stripped.
    pub fn short_name(&self) -> String {
        static PREFIX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^refs/(remotes/)?.+?/").unwrap());
        PREFIX.replace(&self.name, "").into_owned()
    }

    pub fn is_master(&self) -> bool {
        self.short_name() == "master"
    }

    /// Whether this is a remote-tracking ref.
    pub fn is_remote(&self) -> bool {
        self.name.starts_with("refs/remotes/")
    }

    /// The remote a remote-tracking ref belongs to.
    ///
    /// Asking a non-remote ref is a caller bug; this returns `None` so the
    /// caller's is_remote check stays the single source of truth.
    pub fn remote_name(&self) -> Option<&str> {
        self.name
            .strip_prefix("refs/remotes/")?
            .split('/')
            .next()
    }

    /// The branch this one tracks, resolved through a symbolic-ref query.
    pub fn upstream(&self) -> Option<Branch<'a>> {
        let query = format!(
            "rev-parse --symbolic-full-name {}@{{upstream}}",
            self.short_name()
        );
        let name = self.repo.reader().read(&query)?;
        Some(Branch::new(self.repo, name))
    }
}

impl std::fmt::Display for Branch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
