//! Compare a resource against the declaration it was created from.

use super::Context;
use anyhow::{Context as _, Result};
use colored::Colorize;
use secretgen_secrets::{plan, ChangeAction};
use std::path::Path;

pub fn execute(ctx: &Context, name: &str, prior: &Path, resources: &Path) -> Result<()> {
    let before = ctx
        .declarations(prior)?
        .resource(name, ctx.project())
        .with_context(|| format!("Invalid prior resource '{}'", name))?;
    let after = ctx
        .declarations(resources)?
        .resource(name, ctx.project())
        .with_context(|| format!("Invalid resource '{}'", name))?;

    let action = plan(&before, &after);
    let label = match action {
        ChangeAction::None => action.to_string().green(),
        ChangeAction::Update => action.to_string().yellow(),
        ChangeAction::Replace => action.to_string().red(),
    };
    eprintln!("{}: {}", name.cyan(), label.bold());
    println!("{}", serde_json::json!({ "resource": name, "action": action }));
    Ok(())
}
