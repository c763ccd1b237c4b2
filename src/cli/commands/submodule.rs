//! cli::commands::submodule
//!
//! `submodule add` accepts the same shorthand as clone. The `add` word and
//! any `-b <branch>` pair are shielded from the clone scan, then restored.

use anyhow::Result;

use super::clone;
use crate::core::Context;
use crate::engine::Invocation;

pub fn submodule(invocation: &mut Invocation, ctx: &Context) -> Result<()> {
    let add_index = match invocation.position("add") {
        Some(index) => index,
        None => return Ok(()),
    };
    invocation.remove_at(add_index);

    let branch_index = invocation
        .position("-b")
        .or_else(|| invocation.position("--branch"));
    let mut branch_name = None;
    if let Some(index) = branch_index {
        invocation.remove_at(index);
        if index < invocation.len() {
            branch_name = Some(invocation.remove_at(index));
        }
    }

    clone::clone(invocation, ctx)?;

    if let (Some(index), Some(name)) = (branch_index, branch_name) {
        invocation.insert(index, name);
        invocation.insert(index, "-b");
    }
    invocation.insert(add_index, "add");
    Ok(())
}
