//! CLI structure and command definitions.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use secretgen_secrets::declaration::DEFAULT_DECLARATIONS_FILE;
use secretgen_services::Backend;
use secretgen_types::LogLevel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "secretgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate passwords and RSA keys into a versioned secret store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (YAML)
    #[arg(short, long, global = true, env = "SECRETGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Where resources are declared and which store they go to.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Declarations file
    #[arg(short, long, default_value = DEFAULT_DECLARATIONS_FILE)]
    pub resources: PathBuf,

    /// Use an in-memory store instead of the Secret Manager API
    #[arg(long, conflicts_with = "memory_file")]
    pub memory: bool,

    /// Use an in-memory store kept in this JSON file between runs
    #[arg(long, value_name = "FILE")]
    pub memory_file: Option<PathBuf>,
}

impl TargetArgs {
    /// Store selected by the flags.
    pub fn backend(&self) -> Backend {
        match &self.memory_file {
            Some(path) => Backend::MemoryFile(path.clone()),
            None if self.memory => Backend::Memory,
            None => Backend::SecretManager,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate material and store it as a new version
    Create {
        /// Resource name
        resource: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show the state of a stored version
    Read {
        /// Resource name
        resource: String,

        /// Version id returned by create
        #[arg(long)]
        id: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Re-read a stored version with the current visibility settings
    Update {
        /// Resource name
        resource: String,

        /// Version id returned by create
        #[arg(long)]
        id: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Disable and destroy a stored version
    Delete {
        /// Resource name
        resource: String,

        /// Version id returned by create
        #[arg(long)]
        id: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show what changing a declaration requires
    Plan {
        /// Resource name
        resource: String,

        /// Declarations file the resource was created from
        #[arg(long)]
        prior: PathBuf,

        /// Declarations file
        #[arg(short, long, default_value = DEFAULT_DECLARATIONS_FILE)]
        resources: PathBuf,
    },

    /// Check every declaration
    Validate {
        /// Declarations file
        #[arg(short, long, default_value = DEFAULT_DECLARATIONS_FILE)]
        resources: PathBuf,
    },
}

impl Cli {
    /// Log level requested on the command line, if any.
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.quiet {
            Some(LogLevel::Error)
        } else if self.debug {
            Some(LogLevel::Trace)
        } else if self.verbose {
            Some(LogLevel::Debug)
        } else {
            None
        }
    }

    pub async fn execute(&self, ctx: &crate::commands::Context) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Create { resource, target } => {
                resource::create(ctx, resource, target).await
            }
            Commands::Read { resource, id, target } => {
                resource::read(ctx, resource, id, target).await
            }
            Commands::Update { resource, id, target } => {
                resource::update(ctx, resource, id, target).await
            }
            Commands::Delete { resource, id, target } => {
                resource::delete(ctx, resource, id, target).await
            }
            Commands::Plan { resource, prior, resources } => {
                plan::execute(ctx, resource, prior, resources)
            }
            Commands::Validate { resources } => {
                validate::execute(ctx, resources)
            }
        }
    }
}
