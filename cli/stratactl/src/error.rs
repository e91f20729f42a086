//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Manifest validation failed ({count} error(s))")]
    ManifestInvalid { count: usize },

    #[error("No deployment target {field} specified")]
    MissingTarget { field: &'static str },

    #[error(transparent)]
    Synth(#[from] strata_synth::SynthError),

    #[error(transparent)]
    Topology(#[from] strata_topology::TopologyError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Check for specific error types and provide hints
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::ManifestInvalid { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Run `strata validate` to list every manifest error.".yellow()
                );
            }
            CliError::MissingTarget { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Pass --account/--region, add a [target] section to strata.toml, or run `strata context set`."
                        .yellow()
                );
            }
            CliError::Topology(_) | CliError::Synth(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: The manifest parsed but the resulting stack is inconsistent; the message above names the resource."
                        .yellow()
                );
            }
            _ => {}
        }
    }
}
