//! Validate every declared resource.

use super::Context;
use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

pub fn execute(ctx: &Context, resources: &Path) -> Result<()> {
    let declarations = ctx.declarations(resources)?;
    let errors = declarations.validate(ctx.project());

    for (name, decl) in &declarations.resources {
        match errors.iter().find(|(failed, _)| failed == name) {
            Some((_, e)) => eprintln!("{} {} ({}): {}", "✗".red().bold(), name, decl.kind(), e),
            None => eprintln!("{} {} ({})", "✓".green().bold(), name, decl.kind()),
        }
    }

    if !errors.is_empty() {
        bail!("{} of {} resources are invalid", errors.len(), declarations.resources.len());
    }
    Ok(())
}
