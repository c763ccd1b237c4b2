//! engine::invocation
//!
//! The mutable command buffer rewrite rules operate on.
//!
//! An [`Invocation`] is the ordered token list of the in-progress command,
//! plus the executable it will run through, plus a chain of extra steps
//! scheduled around it. The chain always contains exactly one `Main` slot:
//! `before` steps accumulate immediately prior to it in insertion order,
//! `after` steps accumulate following it. Inspection (`words`, `flags`,
//! `has_flag`) never mutates.

/// A deferred side effect that is not a subprocess.
pub type Callback = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// One link of the command chain.
pub enum Step {
    /// A full argv, executed as its own command.
    Exec(Vec<String>),
    /// An in-process callable with a display label for explain mode.
    Call { label: String, func: Callback },
}

impl Step {
    pub fn call(label: impl Into<String>, func: Callback) -> Self {
        Step::Call {
            label: label.into(),
            func,
        }
    }
}

enum Link {
    Main,
    Step(Step),
}

/// The in-progress invocation: tokens, executable, execution flags, and
/// the surrounding step chain.
pub struct Invocation {
    tokens: Vec<String>,
    original: Vec<String>,
    executable: Vec<String>,
    noop: bool,
    skip: bool,
    chain: Vec<Link>,
}

impl Invocation {
    /// Buffer for the given tokens, running through `$GIT` (default `git`).
    pub fn new(tokens: Vec<String>) -> Self {
        let exe = std::env::var("GIT").unwrap_or_else(|_| "git".to_string());
        Self::with_executable(tokens, vec![exe])
    }

    pub fn with_executable(tokens: Vec<String>, executable: Vec<String>) -> Self {
        Invocation {
            original: tokens.clone(),
            tokens,
            executable,
            noop: false,
            skip: false,
            chain: vec![Link::Main],
        }
    }

    // --- token access -----------------------------------------------------

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        self.tokens[index] = value.into();
    }

    pub fn insert(&mut self, index: usize, value: impl Into<String>) {
        self.tokens.insert(index, value.into());
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.tokens.push(value.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.tokens.pop()
    }

    pub fn remove_at(&mut self, index: usize) -> String {
        self.tokens.remove(index)
    }

    /// Remove every occurrence of a literal token; true if any was present.
    pub fn remove_value(&mut self, value: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != value);
        before != self.tokens.len()
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == value)
    }

    /// Replace the entire token list.
    pub fn replace_tokens(&mut self, tokens: Vec<String>) {
        self.tokens = tokens;
    }

    // --- words and flags --------------------------------------------------

    /// Positional arguments: every token not starting with `-`.
    pub fn words(&self) -> Vec<String> {
        self.tokens
            .iter()
            .filter(|t| !t.starts_with('-'))
            .cloned()
            .collect()
    }

    /// The Nth positional argument, regardless of interleaved flags.
    pub fn word_at(&self, n: usize) -> Option<String> {
        self.tokens
            .iter()
            .filter(|t| !t.starts_with('-'))
            .nth(n)
            .cloned()
    }

    pub fn flags(&self) -> Vec<String> {
        self.tokens
            .iter()
            .filter(|t| t.starts_with('-'))
            .cloned()
            .collect()
    }

    /// True if any token matches one of the names exactly or as
    /// `name=value`.
    pub fn has_flag(&self, names: &[&str]) -> bool {
        self.tokens.iter().any(|t| {
            names
                .iter()
                .any(|n| t == n || t.starts_with(&format!("{}=", n)))
        })
    }

    // --- executable and modes ---------------------------------------------

    pub fn executable(&self) -> &[String] {
        &self.executable
    }

    pub fn set_executable(&mut self, executable: Vec<String>) {
        self.executable = executable;
    }

    /// Append intercepted global flags to the executable.
    pub fn add_exec_flags(&mut self, flags: &[String]) {
        self.executable.extend_from_slice(flags);
    }

    /// The main command as a full argv.
    pub fn to_exec(&self) -> Vec<String> {
        let mut argv = self.executable.clone();
        argv.extend(self.tokens.iter().cloned());
        argv
    }

    /// Explain only; show what would run without running it.
    pub fn mark_noop(&mut self) {
        self.noop = true;
    }

    pub fn noop(&self) -> bool {
        self.noop
    }

    /// Suppress execution entirely.
    pub fn mark_skip(&mut self) {
        self.skip = true;
    }

    pub fn skip(&self) -> bool {
        self.skip
    }

    // --- the chain ---------------------------------------------------------

    /// Schedule a git subcommand to run before the main command.
    ///
    /// The executable (with any attached global flags) is resolved at
    /// insertion time.
    pub fn before_git<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = self.git_argv(args);
        self.before_step(Step::Exec(argv));
    }

    /// Schedule a git subcommand to run after the main command.
    pub fn after_git<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = self.git_argv(args);
        self.after_step(Step::Exec(argv));
    }

    /// Schedule a standalone command (its own argv) before the main one.
    pub fn before_exec<I, S>(&mut self, argv: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = argv.into_iter().map(Into::into).collect();
        self.before_step(Step::Exec(argv));
    }

    /// Schedule a standalone command (its own argv) after the main one.
    pub fn after_exec<I, S>(&mut self, argv: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = argv.into_iter().map(Into::into).collect();
        self.after_step(Step::Exec(argv));
    }

    /// Schedule an in-process callable before the main command.
    pub fn before_call(&mut self, label: impl Into<String>, func: Callback) {
        self.before_step(Step::call(label, func));
    }

    /// Schedule an in-process callable after the main command.
    pub fn after_call(&mut self, label: impl Into<String>, func: Callback) {
        self.after_step(Step::call(label, func));
    }

    fn git_argv<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = self.executable.clone();
        argv.extend(args.into_iter().map(Into::into));
        argv
    }

    fn before_step(&mut self, step: Step) {
        let main = self.main_index();
        self.chain.insert(main, Link::Step(step));
    }

    fn after_step(&mut self, step: Step) {
        self.chain.push(Link::Step(step));
    }

    fn main_index(&self) -> usize {
        self.chain
            .iter()
            .position(|link| matches!(link, Link::Main))
            .unwrap_or(self.chain.len())
    }

    /// More than one step scheduled.
    pub fn chained(&self) -> bool {
        self.chain.len() > 1
    }

    /// Whether running this still means running the original input.
    pub fn changed(&self) -> bool {
        self.chained() || self.tokens != self.original
    }

    /// The full chain with the main slot materialized, for execution.
    pub fn into_steps(self) -> Vec<Step> {
        let main = self.to_exec();
        self.chain
            .into_iter()
            .map(|link| match link {
                Link::Main => Step::Exec(main.clone()),
                Link::Step(step) => step,
            })
            .collect()
    }

    /// Shell-quoted rendering of every chain step, for explain mode.
    pub fn render_commands(&self) -> Vec<String> {
        self.chain
            .iter()
            .map(|link| match link {
                Link::Main => quote_argv(&self.to_exec()),
                Link::Step(Step::Exec(argv)) => quote_argv(argv),
                Link::Step(Step::Call { label, .. }) => label.clone(),
            })
            .collect()
    }
}

fn quote_argv(argv: &[String]) -> String {
    shlex::try_join(argv.iter().map(String::as_str))
        .unwrap_or_else(|_| argv.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(tokens: &[&str]) -> Invocation {
        Invocation::with_executable(
            tokens.iter().map(|t| t.to_string()).collect(),
            vec!["git".to_string()],
        )
    }

    #[test]
    fn words_and_flags_split_on_the_dash_prefix() {
        let inv = buffer(&["clone", "--depth", "1", "-p", "foo/bar"]);
        assert_eq!(inv.words(), vec!["clone", "1", "foo/bar"]);
        assert_eq!(inv.flags(), vec!["--depth", "-p"]);
        assert_eq!(inv.word_at(2).as_deref(), Some("foo/bar"));
    }

    #[test]
    fn inspection_does_not_mutate() {
        let inv = buffer(&["push", "-f", "origin"]);
        let before = inv.tokens().to_vec();
        let _ = inv.words();
        let _ = inv.flags();
        let _ = inv.has_flag(&["-f"]);
        let _ = inv.render_commands();
        assert_eq!(inv.tokens(), &before[..]);
        assert!(!inv.changed());
    }

    #[test]
    fn has_flag_matches_exact_and_inline_values() {
        let inv = buffer(&["log", "--format=%s"]);
        assert!(inv.has_flag(&["--format"]));
        assert!(!inv.has_flag(&["--form"]));
        assert!(inv.has_flag(&["-p", "--format"]));
    }

    #[test]
    fn before_steps_accumulate_in_insertion_order() {
        let mut inv = buffer(&["fetch", "origin"]);
        inv.before_git(["remote", "add", "a", "url-a"]);
        inv.before_git(["remote", "add", "b", "url-b"]);
        inv.after_exec(["echo", "done"]);
        let rendered = inv.render_commands();
        assert_eq!(
            rendered,
            vec![
                "git remote add a url-a",
                "git remote add b url-b",
                "git fetch origin",
                "echo done",
            ]
        );
    }

    #[test]
    fn the_main_slot_is_materialized_in_place() {
        let mut inv = buffer(&["push", "origin", "topic"]);
        inv.after_git(["push", "staging", "topic"]);
        let steps = inv.into_steps();
        assert_eq!(steps.len(), 2);
        match &steps[0] {
            Step::Exec(argv) => assert_eq!(argv, &["git", "push", "origin", "topic"]),
            _ => panic!("main step must be an exec"),
        }
    }

    #[test]
    fn exec_flags_reach_every_git_prefixed_step() {
        let mut inv = buffer(&["version"]);
        inv.add_exec_flags(&["--git-dir=/tmp/repo".to_string()]);
        inv.after_git(["log"]);
        let rendered = inv.render_commands();
        assert_eq!(rendered[0], "git --git-dir=/tmp/repo version");
        assert_eq!(rendered[1], "git --git-dir=/tmp/repo log");
    }

    #[test]
    fn changed_reflects_token_edits_and_chaining() {
        let mut inv = buffer(&["clone", "foo/bar"]);
        assert!(!inv.changed());
        inv.set(1, "git://github.com/foo/bar.git");
        assert!(inv.changed());

        let mut inv = buffer(&["version"]);
        inv.after_exec(["echo", "hull"]);
        assert!(inv.changed());
    }

    #[test]
    fn callables_render_by_label_and_stay_callable() {
        use std::cell::Cell;
        use std::rc::Rc;

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let mut inv = buffer(&["version"]);
        inv.after_call(
            "echo hull version",
            Box::new(move || {
                flag.set(true);
                Ok(())
            }),
        );
        assert_eq!(inv.render_commands()[1], "echo hull version");

        for step in inv.into_steps() {
            if let Step::Call { func, .. } = step {
                func().unwrap();
            }
        }
        assert!(fired.get());
    }

    #[test]
    fn remove_value_strips_every_occurrence() {
        let mut inv = buffer(&["remote", "-p", "add", "-p", "user"]);
        assert!(inv.remove_value("-p"));
        assert_eq!(inv.tokens(), &["remote", "add", "user"]);
        assert!(!inv.remove_value("-p"));
    }

    #[test]
    fn explain_rendering_quotes_arguments_with_spaces() {
        let mut inv = buffer(&["version"]);
        inv.after_exec(["echo", "hull version", "0.3.1"]);
        assert_eq!(inv.render_commands()[1], "echo 'hull version' 0.3.1");
    }
}
