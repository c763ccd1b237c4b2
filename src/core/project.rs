//! core::project
//!
//! Fully qualified references to hosted repositories.
//!
//! A [`Project`] is an `(owner, name, host)` triple. The host always carries
//! a value: it defaults to the public host, and a custom host marks the
//! project as private for clone-URL selection. Equality deliberately ignores
//! the host so that the same `owner/name` reached through a self-hosted
//! deployment still compares equal.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// The public hosting service.
pub const MAIN_HOST: &str = "github.com";

/// The host new projects land on: `$GITHUB_HOST` if set, else the public host.
pub fn default_host() -> String {
    std::env::var("GITHUB_HOST").unwrap_or_else(|_| MAIN_HOST.to_string())
}

/// Flags for selecting a clone URL form.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitUrlOptions {
    /// Force the HTTPS form.
    pub https: bool,
    /// Force the authenticated SSH form.
    pub private: bool,
}

/// A fully qualified `(owner, name, host)` repository reference.
#[derive(Debug, Clone, Eq)]
pub struct Project {
    pub owner: String,
    pub name: String,
    pub host: String,
}

// Host-independent equality: `owner/name` identifies the project.
impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.name_with_owner() == other.name_with_owner()
    }
}

impl Project {
    /// Create a project; a missing host defaults to [`default_host`].
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        host: Option<String>,
    ) -> Self {
        Project {
            owner: owner.into(),
            name: name.into(),
            host: host.unwrap_or_else(default_host),
        }
    }

    /// Recognize a project in a remote or web URL.
    ///
    /// Succeeds only when the URL's host is one of `known_hosts`. The path's
    /// second and third segments are the owner and name; a trailing `.git`
    /// on the name is stripped.
    pub fn from_url(url: &Url, known_hosts: &[String]) -> Option<Self> {
        let host = url.host_str()?;
        if !known_hosts.iter().any(|h| h == host) {
            return None;
        }
        let mut segments = url.path().splitn(4, '/');
        segments.next(); // leading empty segment
        let owner = segments.next()?;
        let name = segments.next()?.trim_end_matches(".git");
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Project::new(owner, name, Some(host.to_string())))
    }

    /// `owner/name`.
    pub fn name_with_owner(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// A project is private unless it lives on the public host.
    pub fn is_private(&self) -> bool {
        self.host != MAIN_HOST
    }

    /// The same project under a different owner (fork target).
    pub fn owned_by(&self, owner: &str) -> Self {
        Project {
            owner: owner.to_string(),
            ..self.clone()
        }
    }

    /// Browsable web URL, with the `*.wiki` sub-path rewrites.
    pub fn web_url(&self, path: Option<&str>) -> String {
        static FIRST_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

        let mut project_name = self.name_with_owner();
        let mut path = path.unwrap_or("").to_string();
        if let Some(stripped) = project_name.strip_suffix(".wiki") {
            project_name = stripped.to_string();
            if path != "/wiki" {
                path = if path.starts_with("/commits/") {
                    "/_history".to_string()
                } else {
                    FIRST_WORD.replace(&path, "_${0}").into_owned()
                };
                path = format!("/wiki{}", path);
            }
        }
        format!("https://{}/{}{}", self.host, project_name, path)
    }

    /// Clone URL in one of three forms: plain git protocol, authenticated
    /// SSH (forced, or implied for private projects), or HTTPS.
    pub fn git_url(&self, options: GitUrlOptions) -> String {
        let prefix = if options.https {
            format!("https://{}/", self.host)
        } else if options.private || self.is_private() {
            format!("git@{}:", self.host)
        } else {
            format!("git://{}/", self.host)
        };
        format!("{}{}.git", prefix, self.name_with_owner())
    }

    fn api_url(&self, format: &str, resource: &str, action: &str) -> String {
        format!(
            "https://{}/api/v2/{}/{}/{}",
            self.host, format, resource, action
        )
    }

    /// Endpoint for reading repository metadata (existence checks).
    pub fn api_show_url(&self, format: &str) -> String {
        self.api_url(
            format,
            "repos",
            &format!("show/{}/{}", self.owner, self.name),
        )
    }

    /// Endpoint for forking this repository.
    pub fn api_fork_url(&self, format: &str) -> String {
        self.api_url(
            format,
            "repos",
            &format!("fork/{}/{}", self.owner, self.name),
        )
    }

    /// Endpoint for creating a repository.
    pub fn api_create_url(&self, format: &str) -> String {
        self.api_url(format, "repos", "create")
    }

    /// Endpoint for reading one pull request.
    pub fn api_pullrequest_url(&self, id: &str, format: &str) -> String {
        self.api_url(
            format,
            "pulls",
            &format!("{}/{}/{}", self.owner, self.name, id),
        )
    }

    /// Endpoint for creating a pull request.
    pub fn api_create_pullrequest_url(&self, format: &str) -> String {
        self.api_url(format, "pulls", &format!("{}/{}", self.owner, self.name))
    }
}

/// A recognized hosted web URL: the project it points into plus the
/// remainder of its path (`pull/3`, `issues/9`, `commit/<sha>`, ...).
#[derive(Debug, Clone)]
pub struct HostedUrl {
    pub project: Project,
    path: String,
}

impl HostedUrl {
    /// Parse a web URL against the known-hosts list.
    ///
    /// Only `http`/`https` URLs qualify; anything unparseable or pointing
    /// at an unknown host resolves to `None`.
    pub fn resolve(url: &str, known_hosts: &[String]) -> Option<Self> {
        if !url.starts_with("http:") && !url.starts_with("https:") {
            return None;
        }
        let parsed = Url::parse(url).ok()?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return None;
        }
        let project = Project::from_url(&parsed, known_hosts)?;
        let path = parsed
            .path()
            .splitn(4, '/')
            .nth(3)
            .unwrap_or("")
            .to_string();
        Some(HostedUrl { project, path })
    }

    /// The path remainder after `owner/name`, without a leading slash.
    pub fn project_path(&self) -> &str {
        &self.path
    }
}
