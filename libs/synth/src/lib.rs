//! # strata-synth
//!
//! Turns a validated [`strata_topology::Stack`] into a [`Plan`]: the
//! declarative document an external provisioning platform consumes.
//! The plan lists resources in dependency order, carries the desired
//! state hash, and expands pipeline build actions into rendered build
//! specs (command phases plus the `imagedefinitions.json` image
//! manifest).
//!
//! Synthesis takes the deployment target as an explicit
//! [`TargetConfig`]; nothing here reads the process environment except
//! the [`TargetConfig::from_env`] helper intended for the CLI boundary.

mod buildspec;
mod error;
mod plan;
mod target;

pub use buildspec::{render_build_spec, BuildSpec, ImageDefinition, IMAGE_MANIFEST_FILE};
pub use error::SynthError;
pub use plan::{synthesize, Plan, PlannedResource};
pub use target::{TargetConfig, ACCOUNT_ENV, REGION_ENV};
