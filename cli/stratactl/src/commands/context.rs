//! Context command.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::Config;
use crate::output::{print_single, print_success};

use super::CommandContext;

/// Show or change the saved default target.
#[derive(Debug, Args)]
pub struct ContextCommand {
    #[command(subcommand)]
    action: ContextAction,
}

#[derive(Debug, Subcommand)]
enum ContextAction {
    /// Show the saved target.
    Show,

    /// Save default target fields.
    Set {
        /// Default deployment account.
        #[arg(long)]
        account: Option<String>,

        /// Default deployment region.
        #[arg(long)]
        region: Option<String>,
    },

    /// Clear the saved target.
    Clear,
}

impl ContextCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        match self.action {
            ContextAction::Show => {
                print_single(&ctx.config.context, ctx.format);
                Ok(())
            }
            ContextAction::Set { account, region } => {
                if account.is_none() && region.is_none() {
                    anyhow::bail!("provide --account and/or --region to save");
                }

                let mut config = ctx.config.clone();
                if let Some(account) = account {
                    config.context.account = Some(account);
                }
                if let Some(region) = region {
                    config.context.region = Some(region);
                }
                config.save()?;

                print_success("Saved context");
                Ok(())
            }
            ContextAction::Clear => {
                Config::delete()?;
                print_success("Cleared saved context");
                Ok(())
            }
        }
    }
}
