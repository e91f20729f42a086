//! # strata-topology
//!
//! Desired-state topology descriptors and their invariants.
//!
//! A [`Stack`] is an ordered collection of resource descriptors
//! (network, cluster, registry, task definition, service, the
//! load-balancer chain, and optionally a delivery pipeline) linked
//! through typed references from [`strata_refs`]. Construction enforces
//! declare-before-use, so a finished stack has no dangling references;
//! [`Stack::validate`] checks the invariants that span resources (port
//! chains, artifact handoffs, pipeline shape); [`ReferenceGraph`]
//! derives a deterministic provisioning order from the explicit
//! dependency edges.
//!
//! Evaluation is pure: building and validating a stack performs no I/O
//! and reads no ambient environment.

mod entities;
mod error;
mod graph;
mod hash;
mod pipeline;
mod stack;
mod stacks;

pub use entities::{
    Cluster, ContainerSpec, ImageRegistry, ImageSource, Listener, LoadBalancer, Network,
    PortMapping, Protocol, Service, TargetGroup, TaskDefinition,
};
pub use error::{Advisory, TopologyError};
pub use graph::ReferenceGraph;
pub use hash::SpecHash;
pub use pipeline::{
    stage_names, Action, BuildAction, DeployAction, Pipeline, RollbackPolicy, SourceAction, Stage,
};
pub use stack::{Resource, ResourceKind, Stack};
pub use stacks::{delivery_stack, service_stack, DeliveryParams, ServiceStackParams};
