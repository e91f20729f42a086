//! Built-in stack variants.
//!
//! Two topologies ship with the library: a load-balanced container
//! service, and the same service with a source → build → deploy
//! delivery pipeline in front of it. Both are parameterized; defaults
//! describe a single web container on port 3000 behind an
//! internet-facing balancer.

use strata_refs::{
    ArtifactRef, ClusterRef, ContainerRef, ListenerRef, LoadBalancerRef, NetworkRef, PipelineRef,
    RegistryRef, ServiceRef, TargetGroupRef, TaskDefinitionRef,
};

use crate::entities::{
    Cluster, ContainerSpec, ImageRegistry, ImageSource, Listener, LoadBalancer, Network,
    PortMapping, Protocol, Service, TargetGroup, TaskDefinition,
};
use crate::error::TopologyError;
use crate::pipeline::{
    stage_names, Action, BuildAction, DeployAction, Pipeline, RollbackPolicy, SourceAction, Stage,
};
use crate::stack::Stack;

/// Parameters for the load-balanced service topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStackParams {
    /// Stack name; also the base name for every declared resource.
    pub name: String,

    /// Port the container listens on; carried unchanged through the
    /// listener and target group.
    pub port: u16,

    pub protocol: Protocol,
    pub memory_mib: u32,
    pub cpu_units: u32,
    pub desired_count: u32,
    pub internet_facing: bool,
    pub elastic_capacity: bool,
}

impl Default for ServiceStackParams {
    fn default() -> Self {
        Self {
            name: "web".to_string(),
            port: 3000,
            protocol: Protocol::Tcp,
            memory_mib: 1024,
            cpu_units: 512,
            desired_count: 1,
            internet_facing: true,
            elastic_capacity: true,
        }
    }
}

/// Parameters for the delivery pipeline in front of the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryParams {
    /// Opaque authorization reference to the version-control provider.
    pub connection: String,

    pub owner: String,
    pub repository: String,
    pub branch: String,

    /// Repository the build pushes images to. Independent of the
    /// stack's declared registry on purpose; see `Stack::advisories`.
    pub build_repository: String,

    pub rollback: RollbackPolicy,
}

/// A load-balanced container service: network, cluster, registry, task
/// definition, service, and the listener → target group chain.
pub fn service_stack(params: &ServiceStackParams) -> Result<Stack, TopologyError> {
    let name = params.name.as_str();
    let mut stack = Stack::new(name)?;

    let network = NetworkRef::new(name)?;
    let cluster = ClusterRef::new(name)?;
    let registry = RegistryRef::new(name)?;
    let task_def = TaskDefinitionRef::new(name)?;
    let container = ContainerRef::new(name)?;
    let service = ServiceRef::new(name)?;
    let balancer = LoadBalancerRef::new(name)?;
    let port_suffix = format!("{}-{}", name, params.port);
    let listener = ListenerRef::new(port_suffix.as_str())?;
    let group = TargetGroupRef::new(port_suffix.as_str())?;

    stack.add_network(Network {
        id: network.clone(),
    })?;
    stack.add_cluster(Cluster {
        id: cluster.clone(),
        network: network.clone(),
        elastic_capacity: params.elastic_capacity,
    })?;
    stack.add_registry(ImageRegistry {
        id: registry.clone(),
    })?;
    stack.add_task_definition(TaskDefinition {
        id: task_def.clone(),
        memory_mib: params.memory_mib,
        cpu_units: params.cpu_units,
        container: ContainerSpec {
            id: container.clone(),
            image: ImageSource::Registry {
                registry,
                tag: None,
            },
            ports: PortMapping::symmetric(params.port),
        },
    })?;
    stack.add_service(Service {
        id: service.clone(),
        cluster,
        task_definition: task_def,
        desired_count: params.desired_count,
    })?;
    stack.add_load_balancer(LoadBalancer {
        id: balancer.clone(),
        network,
        internet_facing: params.internet_facing,
    })?;
    stack.add_listener(Listener {
        id: listener.clone(),
        load_balancer: balancer,
        port: params.port,
        protocol: params.protocol,
    })?;
    stack.add_target_group(TargetGroup {
        id: group,
        listener,
        service,
        container,
        port: params.port,
        protocol: params.protocol,
    })?;

    Ok(stack)
}

/// The service topology plus a three-stage delivery pipeline.
///
/// Stage order is source, build, deploy; the source hands its artifact
/// to the build, the build hands its artifact to the deploy, and the
/// deploy triggers a rolling update of the service under the given
/// rollback policy.
pub fn delivery_stack(
    params: &ServiceStackParams,
    delivery: &DeliveryParams,
) -> Result<Stack, TopologyError> {
    let mut stack = service_stack(params)?;

    let name = params.name.as_str();
    let task_def = TaskDefinitionRef::new(name)?;
    let service = ServiceRef::new(name)?;
    let source_artifact = ArtifactRef::new(stage_names::SOURCE)?;
    let build_artifact = ArtifactRef::new(stage_names::BUILD)?;

    let pipeline = Pipeline {
        id: PipelineRef::new(name)?,
        stages: vec![
            Stage {
                name: stage_names::SOURCE.to_string(),
                actions: vec![Action::Source(SourceAction {
                    name: "checkout".to_string(),
                    connection: delivery.connection.clone(),
                    owner: delivery.owner.clone(),
                    repository: delivery.repository.clone(),
                    branch: delivery.branch.clone(),
                    output: source_artifact.clone(),
                })],
            },
            Stage {
                name: stage_names::BUILD.to_string(),
                actions: vec![Action::Build(BuildAction {
                    name: "image-build".to_string(),
                    input: source_artifact,
                    output: build_artifact.clone(),
                    build_repository: delivery.build_repository.clone(),
                    task_definition: task_def,
                })],
            },
            Stage {
                name: stage_names::DEPLOY.to_string(),
                actions: vec![Action::Deploy(DeployAction {
                    name: "rollout".to_string(),
                    input: build_artifact,
                    service,
                    rollback: delivery.rollback,
                })],
            },
        ],
    };

    stack.add_pipeline(pipeline)?;
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery_params() -> DeliveryParams {
        DeliveryParams {
            connection: "conn-4f2a".to_string(),
            owner: "acme".to_string(),
            repository: "web".to_string(),
            branch: "main".to_string(),
            build_repository: "acme-web-images".to_string(),
            rollback: RollbackPolicy::default(),
        }
    }

    #[test]
    fn service_stack_validates() {
        let stack = service_stack(&ServiceStackParams::default()).unwrap();
        stack.validate().unwrap();
        assert_eq!(stack.resources().len(), 8);
    }

    #[test]
    fn delivery_stack_validates() {
        let stack =
            delivery_stack(&ServiceStackParams::default(), &delivery_params()).unwrap();
        stack.validate().unwrap();
        assert_eq!(stack.resources().len(), 9);
    }

    #[test]
    fn unmatched_build_repository_is_advised() {
        let stack =
            delivery_stack(&ServiceStackParams::default(), &delivery_params()).unwrap();
        let advisories = stack.advisories();
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].code, "build-repository-unmatched");
    }

    #[test]
    fn matching_build_repository_is_quiet() {
        let mut params = delivery_params();
        // The default registry is named after the stack.
        params.build_repository = "web".to_string();
        let stack = delivery_stack(&ServiceStackParams::default(), &params).unwrap();
        assert!(stack.advisories().is_empty());
    }
}
