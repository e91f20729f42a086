//! Validate command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::error::CliError;
use crate::manifest::{self, DEFAULT_MANIFEST};
use crate::output::{print_single, print_success, print_warning, OutputFormat};

use super::CommandContext;

/// Validate the manifest and the stack it describes.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Manifest file path (TOML). Defaults to ./strata.toml.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let path = self.manifest.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
        let (manifest, manifest_hash) = manifest::load_validated(&path)?;

        let stack = manifest.build_stack()?;
        stack.validate().map_err(CliError::Topology)?;

        let advisories = stack.advisories();
        for advisory in &advisories {
            print_warning(&advisory.to_string());
        }

        match ctx.format {
            OutputFormat::Json => {
                let out = serde_json::json!({
                    "manifest": path.display().to_string(),
                    "manifest_hash": manifest_hash,
                    "stack": stack.name(),
                    "variant": manifest.stack.variant.to_string(),
                    "resources": stack.resources().len(),
                    "advisories": advisories
                        .iter()
                        .map(|a| serde_json::json!({ "code": a.code, "message": a.message }))
                        .collect::<Vec<_>>(),
                });
                print_single(&out, ctx.format);
            }
            OutputFormat::Table => {
                print_success(&format!(
                    "Manifest {} is valid: stack '{}' ({}) declares {} resources",
                    path.display(),
                    stack.name(),
                    manifest.stack.variant,
                    stack.resources().len()
                ));
            }
        }

        Ok(())
    }
}
