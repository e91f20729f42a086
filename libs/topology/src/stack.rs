//! The stack: an ordered, fully-linked collection of descriptors.
//!
//! Resources are added in dependency order; every cross-reference must
//! resolve to a resource that is already declared, so a completed stack
//! has no dangling references by construction. Cross-cutting invariants
//! that span several resources (port chains, artifact wiring) are
//! checked by [`Stack::validate`].

use std::collections::BTreeMap;

use serde::Serialize;
use strata_refs::{ListenerRef, ServiceRef, TaskDefinitionRef};

use crate::entities::{
    Cluster, ImageRegistry, ImageSource, Listener, LoadBalancer, Network, Service, TargetGroup,
    TaskDefinition,
};
use crate::error::{Advisory, TopologyError};
use crate::pipeline::{Action, Pipeline};

/// The kind of a declared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Network,
    Cluster,
    Registry,
    TaskDefinition,
    Service,
    LoadBalancer,
    Listener,
    TargetGroup,
    Pipeline,
}

impl ResourceKind {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Network => "network",
            ResourceKind::Cluster => "cluster",
            ResourceKind::Registry => "registry",
            ResourceKind::TaskDefinition => "task_definition",
            ResourceKind::Service => "service",
            ResourceKind::LoadBalancer => "load_balancer",
            ResourceKind::Listener => "listener",
            ResourceKind::TargetGroup => "target_group",
            ResourceKind::Pipeline => "pipeline",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any declared resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    Network(Network),
    Cluster(Cluster),
    Registry(ImageRegistry),
    TaskDefinition(TaskDefinition),
    Service(Service),
    LoadBalancer(LoadBalancer),
    Listener(Listener),
    TargetGroup(TargetGroup),
    Pipeline(Pipeline),
}

impl Resource {
    /// Canonical key of the resource, `{kind}/{name}`.
    pub fn key(&self) -> String {
        match self {
            Resource::Network(r) => r.id.to_string(),
            Resource::Cluster(r) => r.id.to_string(),
            Resource::Registry(r) => r.id.to_string(),
            Resource::TaskDefinition(r) => r.id.to_string(),
            Resource::Service(r) => r.id.to_string(),
            Resource::LoadBalancer(r) => r.id.to_string(),
            Resource::Listener(r) => r.id.to_string(),
            Resource::TargetGroup(r) => r.id.to_string(),
            Resource::Pipeline(r) => r.id.to_string(),
        }
    }

    /// Kind of the resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Network(_) => ResourceKind::Network,
            Resource::Cluster(_) => ResourceKind::Cluster,
            Resource::Registry(_) => ResourceKind::Registry,
            Resource::TaskDefinition(_) => ResourceKind::TaskDefinition,
            Resource::Service(_) => ResourceKind::Service,
            Resource::LoadBalancer(_) => ResourceKind::LoadBalancer,
            Resource::Listener(_) => ResourceKind::Listener,
            Resource::TargetGroup(_) => ResourceKind::TargetGroup,
            Resource::Pipeline(_) => ResourceKind::Pipeline,
        }
    }

    /// Canonical keys of the resources this one references.
    pub fn depends_on(&self) -> Vec<String> {
        match self {
            Resource::Network(_) | Resource::Registry(_) => Vec::new(),
            Resource::Cluster(r) => vec![r.network.to_string()],
            Resource::TaskDefinition(r) => match &r.container.image {
                ImageSource::Registry { registry, .. } => vec![registry.to_string()],
                ImageSource::External { .. } => Vec::new(),
            },
            Resource::Service(r) => {
                vec![r.cluster.to_string(), r.task_definition.to_string()]
            }
            Resource::LoadBalancer(r) => vec![r.network.to_string()],
            Resource::Listener(r) => vec![r.load_balancer.to_string()],
            Resource::TargetGroup(r) => {
                vec![r.listener.to_string(), r.service.to_string()]
            }
            Resource::Pipeline(r) => {
                let mut deps = Vec::new();
                for stage in &r.stages {
                    for action in &stage.actions {
                        match action {
                            Action::Build(a) => deps.push(a.task_definition.to_string()),
                            Action::Deploy(a) => deps.push(a.service.to_string()),
                            Action::Source(_) => {}
                        }
                    }
                }
                deps.sort();
                deps.dedup();
                deps
            }
        }
    }
}

/// An ordered, fully-linked topology descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct Stack {
    name: String,
    resources: Vec<Resource>,

    #[serde(skip)]
    index: BTreeMap<String, usize>,
}

impl Stack {
    /// Creates an empty stack with a validated name.
    pub fn new(name: impl Into<String>) -> Result<Self, TopologyError> {
        let name = name.into();
        strata_refs::validate_name(&name)?;
        Ok(Self {
            name,
            resources: Vec::new(),
            index: BTreeMap::new(),
        })
    }

    /// Stack name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared resources, in declaration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Looks up a resource by canonical key.
    pub fn get(&self, key: &str) -> Option<&Resource> {
        self.index.get(key).map(|&i| &self.resources[i])
    }

    pub fn add_network(&mut self, network: Network) -> Result<(), TopologyError> {
        self.insert(Resource::Network(network))
    }

    pub fn add_cluster(&mut self, cluster: Cluster) -> Result<(), TopologyError> {
        self.insert(Resource::Cluster(cluster))
    }

    pub fn add_registry(&mut self, registry: ImageRegistry) -> Result<(), TopologyError> {
        self.insert(Resource::Registry(registry))
    }

    pub fn add_task_definition(&mut self, task_def: TaskDefinition) -> Result<(), TopologyError> {
        self.insert(Resource::TaskDefinition(task_def))
    }

    pub fn add_service(&mut self, service: Service) -> Result<(), TopologyError> {
        self.insert(Resource::Service(service))
    }

    pub fn add_load_balancer(&mut self, balancer: LoadBalancer) -> Result<(), TopologyError> {
        self.insert(Resource::LoadBalancer(balancer))
    }

    pub fn add_listener(&mut self, listener: Listener) -> Result<(), TopologyError> {
        self.insert(Resource::Listener(listener))
    }

    pub fn add_target_group(&mut self, group: TargetGroup) -> Result<(), TopologyError> {
        self.insert(Resource::TargetGroup(group))
    }

    pub fn add_pipeline(&mut self, pipeline: Pipeline) -> Result<(), TopologyError> {
        self.insert(Resource::Pipeline(pipeline))
    }

    /// Inserts a resource, rejecting duplicates and forward references.
    fn insert(&mut self, resource: Resource) -> Result<(), TopologyError> {
        let key = resource.key();
        if self.index.contains_key(&key) {
            return Err(TopologyError::DuplicateResource { key });
        }

        for reference in resource.depends_on() {
            if !self.index.contains_key(&reference) {
                return Err(TopologyError::UnknownReference {
                    resource: key,
                    reference,
                });
            }
        }

        self.index.insert(key, self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    /// Checks invariants that span several resources.
    ///
    /// Reference resolution is already guaranteed by [`Stack::insert`];
    /// this pass checks port chains, resource reservations, pipeline
    /// shape, and artifact wiring.
    pub fn validate(&self) -> Result<(), TopologyError> {
        for resource in &self.resources {
            match resource {
                Resource::TaskDefinition(task_def) => self.check_reservation(task_def)?,
                Resource::TargetGroup(group) => self.check_forwarding_chain(group)?,
                Resource::Pipeline(pipeline) => self.check_pipeline(pipeline)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Non-fatal observations about suspicious but permitted configuration.
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut out = Vec::new();

        let registries: Vec<&str> = self
            .resources
            .iter()
            .filter_map(|r| match r {
                Resource::Registry(reg) => Some(reg.id.name()),
                _ => None,
            })
            .collect();

        for resource in &self.resources {
            let Resource::Pipeline(pipeline) = resource else {
                continue;
            };
            for stage in &pipeline.stages {
                for action in &stage.actions {
                    let Action::Build(build) = action else {
                        continue;
                    };
                    if !registries.contains(&build.build_repository.as_str()) {
                        out.push(Advisory {
                            code: "build-repository-unmatched",
                            message: format!(
                                "build action '{}' pushes to repository '{}', which matches no declared registry",
                                build.name, build.build_repository
                            ),
                        });
                    }
                }
            }
        }

        out
    }

    fn check_reservation(&self, task_def: &TaskDefinition) -> Result<(), TopologyError> {
        if task_def.memory_mib == 0 {
            return Err(TopologyError::InvalidReservation {
                task_definition: task_def.id.to_string(),
                field: "memory_mib",
            });
        }
        if task_def.cpu_units == 0 {
            return Err(TopologyError::InvalidReservation {
                task_definition: task_def.id.to_string(),
                field: "cpu_units",
            });
        }
        Ok(())
    }

    /// Listener port, group port, container port, and host port must all
    /// agree, the protocols must match, and the targeted container must
    /// be the one the service's task definition runs.
    fn check_forwarding_chain(&self, group: &TargetGroup) -> Result<(), TopologyError> {
        let key = group.id.to_string();

        let listener = self.listener(&group.listener).ok_or_else(|| {
            TopologyError::UnknownReference {
                resource: key.clone(),
                reference: group.listener.to_string(),
            }
        })?;
        let service =
            self.service(&group.service)
                .ok_or_else(|| TopologyError::UnknownReference {
                    resource: key.clone(),
                    reference: group.service.to_string(),
                })?;
        let task_def = self.task_definition(&service.task_definition).ok_or_else(|| {
            TopologyError::UnknownReference {
                resource: service.id.to_string(),
                reference: service.task_definition.to_string(),
            }
        })?;

        if listener.port != group.port {
            return Err(TopologyError::PortMismatch {
                target_group: key,
                location: "listener",
                expected: group.port,
                found: listener.port,
            });
        }

        if listener.protocol != group.protocol {
            return Err(TopologyError::ProtocolMismatch {
                target_group: key,
                listener_protocol: listener.protocol.to_string(),
                group_protocol: group.protocol.to_string(),
            });
        }

        let container = &task_def.container;
        if container.id != group.container {
            return Err(TopologyError::ContainerMismatch {
                target_group: key,
                expected: container.id.to_string(),
                found: group.container.to_string(),
            });
        }

        if container.ports.container_port != group.port {
            return Err(TopologyError::PortMismatch {
                target_group: key,
                location: "container port",
                expected: group.port,
                found: container.ports.container_port,
            });
        }

        if container.ports.host_port != container.ports.container_port {
            return Err(TopologyError::PortMismatch {
                target_group: key,
                location: "host port",
                expected: container.ports.container_port,
                found: container.ports.host_port,
            });
        }

        Ok(())
    }

    /// Stage shape, artifact handoffs, and build/deploy coherence.
    fn check_pipeline(&self, pipeline: &Pipeline) -> Result<(), TopologyError> {
        let key = pipeline.id.to_string();

        if pipeline.stages.is_empty() {
            return Err(TopologyError::EmptyPipeline { pipeline: key });
        }

        let mut stage_names = std::collections::BTreeSet::new();
        // Artifact name -> producing action name, filled stage by stage.
        let mut produced: BTreeMap<String, String> = BTreeMap::new();

        for stage in &pipeline.stages {
            if stage.actions.is_empty() {
                return Err(TopologyError::EmptyStage {
                    pipeline: key,
                    stage: stage.name.clone(),
                });
            }
            if !stage_names.insert(stage.name.clone()) {
                return Err(TopologyError::DuplicateStage {
                    pipeline: key,
                    stage: stage.name.clone(),
                });
            }

            // Consumption first: only artifacts from strictly earlier
            // stages are visible, since actions in one stage may run
            // concurrently.
            for action in &stage.actions {
                for input in action.inputs() {
                    if !produced.contains_key(input.name()) {
                        return Err(TopologyError::ArtifactNotProduced {
                            artifact: input.to_string(),
                            action: action.name().to_string(),
                        });
                    }
                }
            }

            for action in &stage.actions {
                for output in action.outputs() {
                    if produced
                        .insert(output.name().to_string(), action.name().to_string())
                        .is_some()
                    {
                        return Err(TopologyError::ArtifactProducedTwice {
                            artifact: output.to_string(),
                            action: action.name().to_string(),
                        });
                    }
                }
            }
        }

        self.check_build_deploy_coherence(pipeline)
    }

    /// The image the build stage produces must be keyed by the task
    /// definition the deploy target actually runs, or the emitted image
    /// manifest will not apply.
    fn check_build_deploy_coherence(&self, pipeline: &Pipeline) -> Result<(), TopologyError> {
        let mut builds: BTreeMap<&str, &TaskDefinitionRef> = BTreeMap::new();
        for stage in &pipeline.stages {
            for action in &stage.actions {
                if let Action::Build(build) = action {
                    builds.insert(build.output.name(), &build.task_definition);
                }
            }
        }

        for stage in &pipeline.stages {
            for action in &stage.actions {
                let Action::Deploy(deploy) = action else {
                    continue;
                };
                let Some(built) = builds.get(deploy.input.name()) else {
                    continue;
                };
                let Some(service) = self.service(&deploy.service) else {
                    continue;
                };
                if service.task_definition != **built {
                    return Err(TopologyError::TaskDefinitionMismatch {
                        pipeline: pipeline.id.to_string(),
                        built: built.to_string(),
                        deployed: service.task_definition.to_string(),
                        service: service.id.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    fn listener(&self, id: &ListenerRef) -> Option<&Listener> {
        match self.get(&id.to_string()) {
            Some(Resource::Listener(listener)) => Some(listener),
            _ => None,
        }
    }

    fn service(&self, id: &ServiceRef) -> Option<&Service> {
        match self.get(&id.to_string()) {
            Some(Resource::Service(service)) => Some(service),
            _ => None,
        }
    }

    fn task_definition(&self, id: &TaskDefinitionRef) -> Option<&TaskDefinition> {
        match self.get(&id.to_string()) {
            Some(Resource::TaskDefinition(task_def)) => Some(task_def),
            _ => None,
        }
    }
}
