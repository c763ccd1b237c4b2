//! ui::editor
//!
//! Pull-request message composition through the user's editor.
//!
//! The message file lives at `<git-dir>/PULLREQ_EDITMSG`. It is seeded with
//! an optional default message and a commented explanation (plus a commit
//! summary as commentary when several commits are in play), handed to the
//! editor `git var GIT_EDITOR` names, and read back: `#` lines are
//! stripped, the first block of text becomes the title, the rest the body.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context as _, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::Context;

/// Inputs for seeding the message file.
#[derive(Debug, Default)]
pub struct MessageTemplate {
    /// Pre-filled message (the single commit's subject and body).
    pub default_message: Option<String>,
    /// Commented summary of the commits in the range.
    pub commit_summary: Option<String>,
    /// `owner:base`
    pub base_label: String,
    /// `owner:head`
    pub head_label: String,
}

/// Compose the pull-request title and body by editing the message file.
///
/// Fails when the editor cannot be started or exits non-zero, and when the
/// resulting title is empty.
pub fn compose_pull_request_message(
    ctx: &Context,
    template: &MessageTemplate,
) -> Result<(String, Option<String>)> {
    let git_dir = ctx
        .git_dir()
        .ok_or(crate::core::ContextError::NoRepository)?;
    let path = PathBuf::from(git_dir).join("PULLREQ_EDITMSG");
    std::fs::write(&path, render_template(template))
        .with_context(|| format!("failed to write {}", path.display()))?;

    let mut edit_cmd = editor_argv(ctx)?;
    edit_cmd.push(path.display().to_string());
    let status = Command::new(&edit_cmd[0]).args(&edit_cmd[1..]).status();
    if !status.map(|s| s.success()).unwrap_or(false) {
        bail!("can't open text editor for pull request message");
    }

    let (title, body) = read_message_file(&path)?;
    match title {
        Some(title) => Ok((title, body)),
        None => bail!("Aborting due to empty pull request title"),
    }
}

/// The seeded contents of the message file.
fn render_template(template: &MessageTemplate) -> String {
    let mut text = String::new();
    if let Some(message) = &template.default_message {
        text.push_str(message);
        text.push('\n');
    }
    text.push('\n');
    text.push_str(&format!(
        "# Requesting a pull to {} from {}\n",
        template.base_label, template.head_label
    ));
    text.push_str("#\n");
    text.push_str("# Write a message for this pull request. The first block\n");
    text.push_str("# of text is the title and the rest is description.\n");
    if let Some(summary) = &template.commit_summary {
        text.push_str("#\n# Changes:\n#\n");
        for line in summary.lines() {
            text.push_str(format!("# {}", line).trim_end());
            text.push('\n');
        }
    }
    text
}

/// The editor argv from `git var GIT_EDITOR`, with `$VAR` indirection and
/// `~` expanded, and the gitcommit filetype forced for vim flavors.
fn editor_argv(ctx: &Context) -> Result<Vec<String>> {
    static ENV_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$(\w+)$").unwrap());
    static VIM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[mg]?vim$").unwrap());

    let mut editor = ctx
        .reader()
        .read("var GIT_EDITOR")
        .unwrap_or_else(|| "vi".to_string());
    if let Some(caps) = ENV_REF.captures(&editor) {
        if let Ok(value) = std::env::var(&caps[1]) {
            editor = value;
        }
    }
    let editor = shellexpand::tilde(&editor).into_owned();
    let mut argv =
        shlex::split(&editor).unwrap_or_else(|| vec![editor.clone()]);
    if argv.is_empty() {
        bail!("can't open text editor for pull request message");
    }
    if VIM.is_match(&argv[0]) {
        argv.push("-c".to_string());
        argv.push("set ft=gitcommit".to_string());
    }
    Ok(argv)
}

/// Read the edited file back into `(title, body)`.
///
/// Comment lines are dropped; the first block of text becomes the title
/// (newlines collapsed to spaces) and everything after it the body. Either
/// may come back empty, reported as `None`.
pub fn read_message_file(path: &Path) -> Result<(Option<String>, Option<String>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut title = String::new();
    let mut body = String::new();
    for line in content.lines() {
        if line.starts_with('#') {
            continue;
        }
        if body.is_empty() && line.chars().any(|c| !c.is_whitespace()) {
            title.push_str(line);
            title.push('\n');
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }

    let title = title.replace('\n', " ").trim().to_string();
    let body = body.trim().to_string();
    Ok((
        (!title.is_empty()).then_some(title),
        (!body.is_empty()).then_some(body),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(content: &str) -> (Option<String>, Option<String>) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        read_message_file(file.path()).unwrap()
    }

    #[test]
    fn first_block_is_the_title_and_the_rest_is_body() {
        let (title, body) = parse("Fix the frobnicator\n\nIt was badly broken.\nNow it is not.\n");
        assert_eq!(title.as_deref(), Some("Fix the frobnicator"));
        assert_eq!(body.as_deref(), Some("It was badly broken.\nNow it is not."));
    }

    #[test]
    fn a_multi_line_first_block_collapses_into_one_title() {
        let (title, _) = parse("Fix the\nfrobnicator\n\ndetails\n");
        assert_eq!(title.as_deref(), Some("Fix the frobnicator"));
    }

    #[test]
    fn comment_lines_are_stripped() {
        let (title, body) = parse("Title\n# a comment\n\n# another\nBody\n");
        assert_eq!(title.as_deref(), Some("Title"));
        assert_eq!(body.as_deref(), Some("Body"));
    }

    #[test]
    fn a_file_of_comments_has_no_title() {
        let (title, body) = parse("\n# Requesting a pull to foo:master from bar:topic\n#\n");
        assert_eq!(title, None);
        assert_eq!(body, None);
    }

    #[test]
    fn the_template_seeds_default_message_and_summary() {
        let text = render_template(&MessageTemplate {
            default_message: Some("One commit subject".into()),
            commit_summary: Some("abc1234 (Jane, 2 days ago)\n   the subject\n".into()),
            base_label: "defunkt:master".into(),
            head_label: "mislav:topic".into(),
        });
        assert!(text.starts_with("One commit subject\n\n"));
        assert!(text.contains("# Requesting a pull to defunkt:master from mislav:topic"));
        assert!(text.contains("# Changes:"));
        assert!(text.contains("# abc1234 (Jane, 2 days ago)"));
        // Trailing whitespace on commentary lines is trimmed.
        assert!(!text.lines().any(|line| line.ends_with(' ')));
    }

    #[test]
    fn the_seeded_template_alone_yields_no_title() {
        let text = render_template(&MessageTemplate {
            base_label: "a:master".into(),
            head_label: "b:topic".into(),
            ..Default::default()
        });
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        let (title, _) = read_message_file(file.path()).unwrap();
        assert_eq!(title, None);
    }
}
