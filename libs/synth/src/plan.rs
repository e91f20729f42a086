//! Plan synthesis.
//!
//! A plan is the external handoff format: every resource of a validated
//! stack, in provisioning order, with its dependency edges and
//! serialized spec. Synthesis is pure construction; equal stacks and
//! targets produce byte-equal plans.

use serde::Serialize;
use serde_json::Value;
use strata_topology::{Action, ReferenceGraph, Resource, ResourceKind, SpecHash, Stack};
use tracing::debug;

use crate::buildspec::render_build_spec;
use crate::error::SynthError;
use crate::target::TargetConfig;

/// A synthesized provisioning plan.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Name of the stack the plan was synthesized from.
    pub stack: String,

    /// Where the plan is provisioned.
    pub target: TargetConfig,

    /// Hash of the desired state the plan was derived from.
    pub spec_hash: SpecHash,

    /// Resources in provisioning order.
    pub resources: Vec<PlannedResource>,
}

/// One resource of a plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedResource {
    /// Canonical key, `{kind}/{name}`.
    pub key: String,

    pub kind: ResourceKind,

    /// Keys that must be provisioned before this resource.
    pub depends_on: Vec<String>,

    /// The resource's desired-state spec.
    pub spec: Value,
}

/// Synthesizes a plan from a stack and a deployment target.
///
/// Validates the stack, derives the provisioning order from the
/// reference graph, and renders build specs for every pipeline build
/// action against the target.
pub fn synthesize(stack: &Stack, target: &TargetConfig) -> Result<Plan, SynthError> {
    stack.validate()?;

    let graph = ReferenceGraph::from_stack(stack);
    let order = graph.provisioning_order()?;
    let spec_hash = SpecHash::of(stack)?;

    let mut resources = Vec::with_capacity(order.len());
    for key in order {
        // Keys come from the graph, which was built from this stack.
        let Some(resource) = stack.get(&key) else {
            continue;
        };
        let spec = resource_spec(resource, target).map_err(|source| SynthError::Serialize {
            key: key.clone(),
            source,
        })?;
        resources.push(PlannedResource {
            depends_on: resource.depends_on(),
            kind: resource.kind(),
            key,
            spec,
        });
    }

    debug!(
        stack = stack.name(),
        resources = resources.len(),
        spec_hash = %spec_hash,
        "synthesized plan"
    );

    Ok(Plan {
        stack: stack.name().to_string(),
        target: target.clone(),
        spec_hash,
        resources,
    })
}

/// Serializes one resource's spec, expanding build actions into
/// rendered build specs.
fn resource_spec(resource: &Resource, target: &TargetConfig) -> Result<Value, serde_json::Error> {
    match resource {
        Resource::Network(r) => serde_json::to_value(r),
        Resource::Cluster(r) => serde_json::to_value(r),
        Resource::Registry(r) => serde_json::to_value(r),
        Resource::TaskDefinition(r) => serde_json::to_value(r),
        Resource::Service(r) => serde_json::to_value(r),
        Resource::LoadBalancer(r) => serde_json::to_value(r),
        Resource::Listener(r) => serde_json::to_value(r),
        Resource::TargetGroup(r) => serde_json::to_value(r),
        Resource::Pipeline(pipeline) => {
            let mut spec = serde_json::to_value(pipeline)?;
            for (stage_idx, stage) in pipeline.stages.iter().enumerate() {
                for (action_idx, action) in stage.actions.iter().enumerate() {
                    let Action::Build(build) = action else {
                        continue;
                    };
                    let rendered = serde_json::to_value(render_build_spec(build, target))?;
                    spec["stages"][stage_idx]["actions"][action_idx]["build_spec"] = rendered;
                }
            }
            Ok(spec)
        }
    }
}
