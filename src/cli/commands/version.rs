//! cli::commands::version
//!
//! Chains hull's own version line after git's.

use anyhow::Result;

use crate::core::Context;
use crate::engine::Invocation;

pub fn version(invocation: &mut Invocation, _ctx: &Context) -> Result<()> {
    invocation.after_exec(["echo", "hull version", crate::VERSION]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::{bare_context, buffer};
    use super::*;

    #[test]
    fn hull_version_is_echoed_after_gits() {
        let ctx = bare_context();
        let mut inv = buffer(&["version"]);
        version(&mut inv, &ctx).unwrap();
        assert_eq!(
            inv.render_commands(),
            vec![
                "git version".to_string(),
                format!("echo 'hull version' {}", crate::VERSION),
            ]
        );
    }
}
