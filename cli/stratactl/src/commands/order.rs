//! Order command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use strata_topology::ReferenceGraph;
use tabled::Tabled;

use crate::error::CliError;
use crate::manifest::{self, DEFAULT_MANIFEST};
use crate::output::print_output;

use super::CommandContext;

/// Show the provisioning order of the stack's resources.
#[derive(Debug, Args)]
pub struct OrderCommand {
    /// Manifest file path (TOML). Defaults to ./strata.toml.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Serialize, Tabled)]
struct OrderRow {
    #[tabled(rename = "#")]
    position: usize,

    key: String,

    kind: String,

    #[tabled(rename = "depends on")]
    depends_on: String,
}

impl OrderCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let path = self.manifest.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
        let (manifest, _) = manifest::load_validated(&path)?;

        let stack = manifest.build_stack()?;
        stack.validate().map_err(CliError::Topology)?;

        let graph = ReferenceGraph::from_stack(&stack);
        let order = graph.provisioning_order().map_err(CliError::Topology)?;

        let rows: Vec<OrderRow> = order
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let kind = stack
                    .get(key)
                    .map(|r| r.kind().to_string())
                    .unwrap_or_default();
                let depends_on = graph
                    .dependencies(key)
                    .map(|deps| deps.join(", "))
                    .unwrap_or_default();
                OrderRow {
                    position: i + 1,
                    key: key.clone(),
                    kind,
                    depends_on,
                }
            })
            .collect();

        print_output(&rows, ctx.format);
        Ok(())
    }
}
