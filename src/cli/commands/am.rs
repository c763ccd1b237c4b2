//! cli::commands::am
//!
//! `am`/`apply` with a hosted pull-request, commit, or gist URL: the patch
//! is downloaded to the temp directory first and the URL argument replaced
//! with the local file.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::Context;
use crate::engine::Invocation;

static HOSTED_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://(gist\.)?github\.com/").unwrap());
static PULL_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(/pull/\d+)/\w*$").unwrap());

pub fn am(invocation: &mut Invocation, _ctx: &Context) -> Result<()> {
    let found = invocation
        .tokens()
        .iter()
        .enumerate()
        .find_map(|(index, token)| {
            HOSTED_URL
                .captures(token)
                .map(|caps| (index, token.clone(), caps.get(1).is_some()))
        });
    let (index, token, gist) = match found {
        Some(found) => found,
        None => return Ok(()),
    };

    let mut url = token.split('#').next().unwrap_or(&token).to_string();
    if !gist {
        url = PULL_TAIL.replace(&url, "${1}").into_owned();
    }
    let ext = if gist { ".txt" } else { ".patch" };
    if !url.ends_with(ext) {
        url.push_str(ext);
    }

    let basename = url.rsplit('/').next().unwrap_or(&url).to_string();
    let prefix = if gist { "gist-" } else { "" };
    let patch_file = std::env::temp_dir()
        .join(format!("{}{}", prefix, basename))
        .display()
        .to_string();

    invocation.before_exec([
        "curl".to_string(),
        "-#LA".to_string(),
        format!("hull {}", crate::VERSION),
        url,
        "-o".to_string(),
        patch_file.clone(),
    ]);
    invocation.set(index, patch_file);
    Ok(())
}
