//! forge
//!
//! Client for the hosting service's HTTP API.
//!
//! # Design
//!
//! Three verbs against templated URLs keyed by resource and action (see
//! [`crate::core::Project`] for the templates): read repository metadata,
//! create repositories/pull requests, fork. Authentication is HTTP basic
//! with the per-host `<user>/token` + token pair; reads attach credentials
//! opportunistically, writes require them.
//!
//! Calls are synchronous and issued one at a time, with no retry. A failed
//! call surfaces its status, reason, and any structured `error` field from
//! the body for the enclosing rule to report; nothing is rewritten on
//! failure.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use thiserror::Error;

use crate::core::{Context, ContextError, Project};

/// Errors from API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response.
    #[error("{message} (HTTP {status})")]
    Status {
        status: u16,
        message: String,
        /// Human-readable `error` field extracted from a JSON error body.
        detail: Option<String>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error(transparent)]
    Identity(#[from] ContextError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// Render an API failure the way the user should see it, with the
/// applicable remediation hints.
pub fn describe(action: &str, err: &ApiError) -> String {
    match err {
        ApiError::Status {
            status,
            message,
            detail,
        } => {
            let mut lines = vec![format!("Error {}: {} (HTTP {})", action, message, status)];
            if *status == 401 {
                lines.push("Check your token configuration (`git config github.token`)".into());
            }
            if let Some(detail) = detail {
                lines.push(detail.clone());
            }
            lines.join("\n")
        }
        other => format!("Error {}: {}", action, other),
    }
}

/// Options for creating a repository.
#[derive(Debug, Default)]
pub struct RepoOptions {
    pub private: bool,
    pub description: Option<String>,
    pub homepage: Option<String>,
}

/// Fields of a pull request to create.
#[derive(Debug, Default)]
pub struct PullRequestParams {
    pub base: String,
    pub head: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub issue: Option<String>,
}

/// One side of an existing pull request, as the API reports it.
#[derive(Debug, Deserialize)]
pub struct PullHead {
    /// `owner:branch`
    pub label: String,
    /// Absent when the contributor's fork has been deleted.
    pub repository: Option<PullRepository>,
}

#[derive(Debug, Deserialize)]
pub struct PullRepository {
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Deserialize)]
struct PullResource {
    pull: PullPayload,
}

#[derive(Debug, Deserialize)]
struct PullPayload {
    #[serde(default)]
    html_url: Option<String>,
    head: Option<PullHead>,
}

/// Blocking API client bound to the resolution context (for per-host
/// credentials).
pub struct ApiClient<'a> {
    ctx: &'a Context,
    client: Client,
}

impl<'a> ApiClient<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        ApiClient {
            ctx,
            client: Client::new(),
        }
    }

    /// Whether the project exists on its host (speculative read).
    pub fn repo_exists(&self, project: &Project) -> Result<bool, ApiError> {
        let response = self.get(&project.api_show_url("yaml"), &project.host)?;
        Ok(response.status().is_success())
    }

    /// Fork the project to the authenticated user's account.
    pub fn fork_repo(&self, project: &Project) -> Result<(), ApiError> {
        let response = self.post(&project.api_fork_url("yaml"), &project.host, &[])?;
        expect_success(response).map(|_| ())
    }

    /// Create a repository under the project's owner.
    pub fn create_repo(&self, project: &Project, options: &RepoOptions) -> Result<(), ApiError> {
        let user = self.ctx.github_user(Some(project.host.as_str()))?;
        let params = create_repo_form(project, options, project.owner != user);
        let response = self.post(&project.api_create_url("yaml"), &project.host, &params)?;
        expect_success(response).map(|_| ())
    }

    /// Create a pull request; returns the created object's web URL.
    pub fn create_pull_request(
        &self,
        project: &Project,
        params: &PullRequestParams,
    ) -> Result<String, ApiError> {
        let form = pull_request_form(params);
        let response = self.post(
            &project.api_create_pullrequest_url("json"),
            &project.host,
            &form,
        )?;
        let response = expect_success(response)?;
        let resource: PullResource = response.json()?;
        Ok(resource.pull.html_url.unwrap_or_default())
    }

    /// Read one pull request's head reference.
    pub fn pull_request_head(&self, project: &Project, id: &str) -> Result<PullHead, ApiError> {
        let response = self.get(&project.api_pullrequest_url(id, "json"), &project.host)?;
        let response = expect_success(response)?;
        let resource: PullResource = response.json()?;
        resource.pull.head.ok_or_else(|| ApiError::Status {
            status: 200,
            message: "malformed pull request payload".into(),
            detail: None,
        })
    }

    fn get(&self, url: &str, host: &str) -> Result<Response, ApiError> {
        let request = self.client.get(url);
        let request = self.authenticate(request, host, false)?;
        Ok(request.send()?)
    }

    fn post(
        &self,
        url: &str,
        host: &str,
        params: &[(String, String)],
    ) -> Result<Response, ApiError> {
        let request = self.client.post(url).form(params);
        let request = self.authenticate(request, host, true)?;
        Ok(request.send()?)
    }

    /// Attach basic auth as `<user>/token` + token. Reads proceed
    /// anonymously when no identity is configured; writes must not.
    fn authenticate(
        &self,
        request: RequestBuilder,
        host: &str,
        required: bool,
    ) -> Result<RequestBuilder, ApiError> {
        let (user, token) = if required {
            (
                Some(self.ctx.github_user(Some(host))?),
                Some(self.ctx.github_token(Some(host))?),
            )
        } else {
            (
                self.ctx.try_github_user(Some(host)),
                self.ctx.try_github_token(Some(host)),
            )
        };
        match (user, token) {
            (Some(user), Some(token)) => {
                Ok(request.basic_auth(format!("{}/token", user), Some(token)))
            }
            _ => Ok(request),
        }
    }
}

fn expect_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let json_body = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("json"))
        .unwrap_or(false);
    let body = response.text().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
        detail: extract_error_detail(json_body, &body),
    })
}

/// Pull the human-readable `error` field out of a structured error body.
fn extract_error_detail(json_body: bool, body: &str) -> Option<String> {
    if !json_body {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

fn create_repo_form(
    project: &Project,
    options: &RepoOptions,
    is_org: bool,
) -> Vec<(String, String)> {
    let name = if is_org {
        project.name_with_owner()
    } else {
        project.name.clone()
    };
    let mut params = vec![("name".to_string(), name)];
    if options.private {
        params.push(("public".to_string(), "0".to_string()));
    }
    if let Some(description) = &options.description {
        params.push(("description".to_string(), description.clone()));
    }
    if let Some(homepage) = &options.homepage {
        params.push(("homepage".to_string(), homepage.clone()));
    }
    params
}

fn pull_request_form(params: &PullRequestParams) -> Vec<(String, String)> {
    let mut form = vec![
        ("pull[base]".to_string(), params.base.clone()),
        ("pull[head]".to_string(), params.head.clone()),
    ];
    if let Some(issue) = &params.issue {
        form.push(("pull[issue]".to_string(), issue.clone()));
    }
    if let Some(title) = &params.title {
        form.push(("pull[title]".to_string(), title.clone()));
    }
    if let Some(body) = &params.body {
        form.push(("pull[body]".to_string(), body.clone()));
    }
    form
}
