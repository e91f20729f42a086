//! CLI commands.

mod context;
mod order;
mod synth;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use strata_synth::TargetConfig;

use crate::config::Config;
use crate::error::CliError;
use crate::manifest::Manifest;
use crate::output::OutputFormat;

/// strata CLI - Describe deployment topologies and synthesize plans.
#[derive(Debug, Parser)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Deployment target account.
    #[arg(long, global = true, env = "STRATA_ACCOUNT")]
    account: Option<String>,

    /// Deployment target region.
    #[arg(long, global = true, env = "STRATA_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Synthesize a provisioning plan from the manifest.
    Synth(synth::SynthCommand),

    /// Validate the manifest and the stack it describes.
    Validate(validate::ValidateCommand),

    /// Show the provisioning order of the stack's resources.
    Order(order::OrderCommand),

    /// Show or change the saved default target.
    Context(context::ContextCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self) -> Result<()> {
        let format = match self.format.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        };

        let config = Config::load()?;

        let ctx = CommandContext {
            config,
            format,
            account: self.account,
            region: self.region,
        };

        match self.command {
            Commands::Synth(cmd) => cmd.run(ctx),
            Commands::Validate(cmd) => cmd.run(ctx),
            Commands::Order(cmd) => cmd.run(ctx),
            Commands::Context(cmd) => cmd.run(ctx),
            Commands::Version => {
                println!("strata {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
    pub account: Option<String>,
    pub region: Option<String>,
}

impl CommandContext {
    /// Resolve the deployment target.
    ///
    /// Precedence: flags (or their environment equivalents), then the
    /// manifest's `[target]` section, then the saved context.
    pub fn resolve_target(&self, manifest: &Manifest) -> Result<TargetConfig> {
        let section = manifest.target.as_ref();

        let account = self
            .account
            .clone()
            .or_else(|| section.map(|t| t.account.clone()))
            .or_else(|| self.config.context.account.clone())
            .ok_or(CliError::MissingTarget { field: "account" })?;

        let region = self
            .region
            .clone()
            .or_else(|| section.map(|t| t.region.clone()))
            .or_else(|| self.config.context.region.clone())
            .ok_or(CliError::MissingTarget { field: "region" })?;

        Ok(TargetConfig::new(account, region).map_err(CliError::Synth)?)
    }
}
