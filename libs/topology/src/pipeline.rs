//! Continuous-delivery pipeline descriptors.
//!
//! A pipeline is an ordered sequence of stages; each stage holds an
//! ordered sequence of actions. Stages execute strictly in declared
//! order. Actions within a stage may run concurrently on the external
//! platform, so artifact handoffs are only valid across stage
//! boundaries.

use serde::{Deserialize, Serialize};
use strata_refs::{ArtifactRef, PipelineRef, ServiceRef, TaskDefinitionRef};

/// Conventional stage names used by the built-in delivery stack.
pub mod stage_names {
    pub const SOURCE: &str = "source";
    pub const BUILD: &str = "build";
    pub const DEPLOY: &str = "deploy";
}

/// A build-and-deploy pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: PipelineRef,
    pub stages: Vec<Stage>,
}

/// An ordered step of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub actions: Vec<Action>,
}

/// A single operation inside a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Source(SourceAction),
    Build(BuildAction),
    Deploy(DeployAction),
}

impl Action {
    /// Display name of the action.
    pub fn name(&self) -> &str {
        match self {
            Action::Source(a) => &a.name,
            Action::Build(a) => &a.name,
            Action::Deploy(a) => &a.name,
        }
    }

    /// Artifacts this action consumes.
    pub fn inputs(&self) -> Vec<&ArtifactRef> {
        match self {
            Action::Source(_) => Vec::new(),
            Action::Build(a) => vec![&a.input],
            Action::Deploy(a) => vec![&a.input],
        }
    }

    /// Artifacts this action produces.
    pub fn outputs(&self) -> Vec<&ArtifactRef> {
        match self {
            Action::Source(a) => vec![&a.output],
            Action::Build(a) => vec![&a.output],
            Action::Deploy(_) => Vec::new(),
        }
    }
}

/// Fetches the repository on every push to the named branch.
///
/// The connection is a pre-established authorization reference owned by
/// the external platform; it is carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAction {
    pub name: String,
    pub connection: String,
    pub owner: String,
    pub repository: String,
    pub branch: String,
    pub output: ArtifactRef,
}

/// Builds and pushes a container image, emitting an image manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildAction {
    pub name: String,
    pub input: ArtifactRef,
    pub output: ArtifactRef,

    /// Repository the built image is pushed to. Declared independently
    /// of any `ImageRegistry` in the stack; validation raises an
    /// advisory when the two disagree instead of rewriting either.
    pub build_repository: String,

    /// Task definition whose name keys the emitted image manifest.
    pub task_definition: TaskDefinitionRef,
}

/// Triggers a rolling update of a service from the image manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployAction {
    pub name: String,
    pub input: ArtifactRef,
    pub service: ServiceRef,
    pub rollback: RollbackPolicy,
}

/// Rules determining when a failed deployment automatically reverts to
/// the previous known-good state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackPolicy {
    /// Roll back when the deployment fails.
    pub failed_deployment: bool,

    /// Roll back when the deployment is stopped.
    pub stopped_deployment: bool,

    /// Roll back when a deployment alarm fires.
    pub deployment_in_alarm: bool,
}

impl Default for RollbackPolicy {
    fn default() -> Self {
        Self {
            failed_deployment: true,
            stopped_deployment: true,
            deployment_in_alarm: false,
        }
    }
}
