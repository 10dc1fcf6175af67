//! Resource lifecycle commands.
//!
//! State is printed to stdout as JSON; progress goes to stderr.

use super::Context;
use crate::cli::TargetArgs;
use anyhow::{Context as _, Result};
use colored::Colorize;
use secretgen_secrets::SecretResource;
use secretgen_types::{ResourceState, VersionId};

fn load(ctx: &Context, name: &str, target: &TargetArgs) -> Result<SecretResource> {
    let declarations = ctx.declarations(&target.resources)?;
    declarations
        .resource(name, ctx.project())
        .with_context(|| format!("Invalid resource '{}'", name))
}

fn version_id(id: &str) -> Result<VersionId> {
    VersionId::new(id).context("Invalid version id")
}

fn print_state(state: &ResourceState) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}

pub async fn create(ctx: &Context, name: &str, target: &TargetArgs) -> Result<()> {
    let resource = load(ctx, name, target)?;
    let lifecycle = ctx.lifecycle(&target.backend())?;

    eprintln!(
        "{} {} {} in {}",
        "Creating".green().bold(),
        resource.kind(),
        name.cyan(),
        resource.settings().secret
    );

    let state = lifecycle
        .create(&resource)
        .await
        .with_context(|| format!("Failed to create '{}'", name))?;

    eprintln!("{} Stored as {}", "✓".green().bold(), state.id);
    print_state(&state)
}

pub async fn read(ctx: &Context, name: &str, id: &str, target: &TargetArgs) -> Result<()> {
    let resource = load(ctx, name, target)?;
    let id = version_id(id)?;
    let state = ctx
        .lifecycle(&target.backend())?
        .read(&resource, &id)
        .await
        .with_context(|| format!("Failed to read '{}'", name))?;
    print_state(&state)
}

pub async fn update(ctx: &Context, name: &str, id: &str, target: &TargetArgs) -> Result<()> {
    let resource = load(ctx, name, target)?;
    let id = version_id(id)?;
    let state = ctx
        .lifecycle(&target.backend())?
        .update(&resource, &id)
        .await
        .with_context(|| format!("Failed to update '{}'", name))?;
    print_state(&state)
}

pub async fn delete(ctx: &Context, name: &str, id: &str, target: &TargetArgs) -> Result<()> {
    let resource = load(ctx, name, target)?;
    let id = version_id(id)?;

    eprintln!("{} {} ({})", "Deleting".red().bold(), name.cyan(), id);

    let outcome = ctx
        .lifecycle(&target.backend())?
        .delete(&resource, &id)
        .await
        .with_context(|| format!("Failed to delete '{}'", name))?;

    eprintln!("{} Version {}", "✓".green().bold(), outcome);
    println!("{}", serde_json::json!({ "id": id, "outcome": outcome }));
    Ok(())
}
