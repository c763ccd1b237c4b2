//! cli::commands::alias
//!
//! Prints the shell text that makes `git` mean `hull`.

use anyhow::{bail, Result};

use crate::core::Context;
use crate::engine::Invocation;

const SHELLS: &[(&str, &str)] = &[
    ("bash", "alias git=hull"),
    ("csh", "alias git hull"),
    ("fish", "alias git hull"),
    ("sh", "alias git=hull"),
    ("zsh", "function git(){hull \"$@\"}"),
];

pub fn alias(invocation: &mut Invocation, _ctx: &Context) -> Result<()> {
    let silent = invocation.remove_value("-s");

    let shell = match invocation.get(1) {
        Some(shell) => shell.to_string(),
        None => {
            print_usage();
            invocation.mark_skip();
            return Ok(());
        }
    };

    match SHELLS.iter().find(|(name, _)| *name == shell) {
        Some((_, text)) => {
            if !silent {
                println!("Run this in your shell to start using `hull` as `git`:");
                print!("  ");
            }
            println!("{}", text);
        }
        None => bail!("fatal: never heard of `{}'", shell),
    }
    invocation.mark_skip();
    Ok(())
}

fn print_usage() {
    println!("usage: hull alias [-s] SHELL");
    println!();
    println!("You already have hull installed and available in your PATH,");
    println!("but to get the full experience you'll want to alias it to");
    println!("`git`.");
    println!();
    println!("To see how to accomplish this for your shell, run the alias");
    println!("command again with the name of your shell.");
    println!();
    println!("Known shells:");
    for (name, _) in SHELLS {
        println!("  {}", name);
    }
    println!();
    println!("Options:");
    println!("  -s   Silent. Useful when using the output with eval, e.g.");
    println!("       $ eval `hull alias -s bash`");
}

#[cfg(test)]
mod tests {
    use super::super::testing::{bare_context, buffer};
    use super::*;

    #[test]
    fn a_known_shell_suppresses_execution() {
        let ctx = bare_context();
        let mut inv = buffer(&["alias", "-s", "bash"]);
        alias(&mut inv, &ctx).unwrap();
        assert!(inv.skip());
    }

    #[test]
    fn an_unknown_shell_is_fatal() {
        let ctx = bare_context();
        let mut inv = buffer(&["alias", "powershell"]);
        let err = alias(&mut inv, &ctx).unwrap_err();
        assert!(err.to_string().contains("never heard of"));
    }

    #[test]
    fn no_shell_prints_usage_and_stops() {
        let ctx = bare_context();
        let mut inv = buffer(&["alias"]);
        alias(&mut inv, &ctx).unwrap();
        assert!(inv.skip());
    }
}
