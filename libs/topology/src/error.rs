//! Error types for stack construction and validation.

use thiserror::Error;

/// Errors raised while constructing or validating a topology stack.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A resource with the same canonical key was already declared.
    #[error("duplicate resource: {key}")]
    DuplicateResource { key: String },

    /// A cross-reference points at a resource that has not been declared yet.
    #[error("unknown reference from {resource} to {reference}")]
    UnknownReference { resource: String, reference: String },

    /// A resource name failed validation.
    #[error(transparent)]
    Ref(#[from] strata_refs::RefError),

    /// Ports along a listener → target group → container chain disagree.
    #[error("port mismatch at {location} for {target_group}: expected {expected}, found {found}")]
    PortMismatch {
        target_group: String,
        location: &'static str,
        expected: u16,
        found: u16,
    },

    /// Listener and target group protocols disagree.
    #[error("protocol mismatch for {target_group}: listener uses {listener_protocol}, group uses {group_protocol}")]
    ProtocolMismatch {
        target_group: String,
        listener_protocol: String,
        group_protocol: String,
    },

    /// The target group forwards to a container the service does not run.
    #[error("container mismatch for {target_group}: service runs {expected}, group targets {found}")]
    ContainerMismatch {
        target_group: String,
        expected: String,
        found: String,
    },

    /// A task definition declares a zero resource reservation.
    #[error("invalid resource reservation for {task_definition}: {field} must be non-zero")]
    InvalidReservation {
        task_definition: String,
        field: &'static str,
    },

    /// A pipeline declares no stages.
    #[error("pipeline {pipeline} has no stages")]
    EmptyPipeline { pipeline: String },

    /// A stage declares no actions.
    #[error("stage '{stage}' of {pipeline} has no actions")]
    EmptyStage { pipeline: String, stage: String },

    /// Two stages of a pipeline share a name.
    #[error("duplicate stage '{stage}' in {pipeline}")]
    DuplicateStage { pipeline: String, stage: String },

    /// An action consumes an artifact no earlier stage produced.
    #[error("artifact {artifact} consumed by '{action}' is not produced by any earlier stage")]
    ArtifactNotProduced { artifact: String, action: String },

    /// An artifact is produced by more than one action.
    #[error("artifact {artifact} produced again by '{action}'")]
    ArtifactProducedTwice { artifact: String, action: String },

    /// The build action's task definition is not the one the deploy target runs.
    #[error("pipeline {pipeline} builds for {built}, but deploy target {service} runs {deployed}")]
    TaskDefinitionMismatch {
        pipeline: String,
        built: String,
        deployed: String,
        service: String,
    },

    /// The reference graph contains a cycle.
    #[error("dependency cycle among: {}", members.join(", "))]
    DependencyCycle { members: Vec<String> },

    /// Desired state could not be serialized for hashing.
    #[error("failed to serialize desired state: {0}")]
    Serialize(String),
}

/// A non-fatal observation about a stack.
///
/// Advisories surface configuration that is suspicious but permitted,
/// such as a build repository name that matches no declared registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    /// Stable machine-readable code.
    pub code: &'static str,

    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
