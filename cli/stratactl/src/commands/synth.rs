//! Synth command (manifest-first workflow).
//!
//! `strata synth` builds the manifest's stack variant, synthesizes the
//! provisioning plan, and writes it to a file or stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use strata_synth::synthesize;
use tracing::info;

use crate::error::CliError;
use crate::manifest::{self, DEFAULT_MANIFEST};
use crate::output::{print_info, print_single, print_success, print_warning, OutputFormat};

use super::CommandContext;

/// Synthesize a provisioning plan from the manifest.
#[derive(Debug, Args)]
pub struct SynthCommand {
    /// Manifest file path (TOML). Defaults to ./strata.toml.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Write the plan to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

impl SynthCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let path = self.manifest.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
        let (manifest, manifest_hash) = manifest::load_validated(&path)?;

        let stack = manifest.build_stack()?;
        let target = ctx.resolve_target(&manifest)?;
        let plan = synthesize(&stack, &target).map_err(CliError::Synth)?;

        for advisory in stack.advisories() {
            print_warning(&advisory.to_string());
        }

        info!(
            stack = plan.stack.as_str(),
            resources = plan.resources.len(),
            "plan synthesized"
        );

        let Some(out_path) = self.out else {
            match ctx.format {
                OutputFormat::Json => print_single(&plan, ctx.format),
                OutputFormat::Table => {
                    print_info("Plan:");
                    println!("- validate manifest: ok (hash {})", manifest_hash);
                    println!(
                        "- target: account={}, region={}",
                        target.account, target.region
                    );
                    for resource in &plan.resources {
                        println!("- provision {} [{}]", resource.key, resource.kind);
                    }
                    println!("- spec hash: {}", plan.spec_hash);
                }
            }
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&plan)?;
        std::fs::write(&out_path, json)
            .with_context(|| format!("failed to write plan to {}", out_path.display()))?;

        match ctx.format {
            OutputFormat::Json => {
                let receipt = serde_json::json!({
                    "stack": plan.stack,
                    "out": out_path.display().to_string(),
                    "resources": plan.resources.len(),
                    "manifest_hash": manifest_hash,
                    "spec_hash": plan.spec_hash,
                });
                print_single(&receipt, ctx.format);
            }
            OutputFormat::Table => {
                print_success(&format!(
                    "Synthesized plan for stack '{}' to {} ({} resources)",
                    plan.stack,
                    out_path.display(),
                    plan.resources.len()
                ));
                print_info(&format!("Manifest hash: {}", manifest_hash));
                print_info(&format!("Spec hash: {}", plan.spec_hash));
                print_info("Next: strata order");
            }
        }

        Ok(())
    }
}
