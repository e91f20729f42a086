//! Desired-state descriptors for the runtime topology.
//!
//! Every struct here describes what should exist, not what does exist.
//! Descriptors are built once, cross-linked through typed references,
//! and never mutated; provisioning and runtime supervision belong to
//! the external platform.

use serde::{Deserialize, Serialize};
use strata_refs::{
    ClusterRef, ContainerRef, ListenerRef, LoadBalancerRef, NetworkRef, RegistryRef, ServiceRef,
    TargetGroupRef, TaskDefinitionRef,
};

// =============================================================================
// Network and Compute
// =============================================================================

/// An isolated virtual network.
///
/// Subnet layout is left to the provisioning platform's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: NetworkRef,
}

/// A logical grouping of serverless container capacity inside a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterRef,

    /// Network the cluster's capacity lives in.
    pub network: NetworkRef,

    /// Whether elastic capacity providers are enabled.
    pub elastic_capacity: bool,
}

/// A store for tagged container images, populated out-of-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRegistry {
    pub id: RegistryRef,
}

// =============================================================================
// Workload
// =============================================================================

/// Transport protocol for listeners and target groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a container image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// A registry declared in the same stack.
    Registry {
        registry: RegistryRef,

        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    },

    /// An image addressed by full URI, outside the stack.
    External { uri: String },
}

/// Container-to-host port mapping.
///
/// Traffic only flows when both sides agree, so the two ports are
/// validated equal along any load-balanced chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
}

impl PortMapping {
    /// A symmetric mapping on a single port.
    pub fn symmetric(port: u16) -> Self {
        Self {
            container_port: port,
            host_port: port,
        }
    }
}

/// One runnable container inside a task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub id: ContainerRef,
    pub image: ImageSource,
    pub ports: PortMapping,
}

/// A template describing one runnable container's resources and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: TaskDefinitionRef,

    /// Memory reservation in MiB.
    pub memory_mib: u32,

    /// CPU reservation in provider units.
    pub cpu_units: u32,

    /// The single container this template runs.
    pub container: ContainerSpec,
}

/// A supervisor keeping a desired number of task instances running.
///
/// Restarting failed tasks is delegated entirely to the external
/// orchestrator and is not modeled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceRef,
    pub cluster: ClusterRef,
    pub task_definition: TaskDefinitionRef,

    /// Number of task instances to keep running.
    pub desired_count: u32,
}

// =============================================================================
// Traffic
// =============================================================================

/// A network entry point for external traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: LoadBalancerRef,
    pub network: NetworkRef,
    pub internet_facing: bool,
}

/// One (port, protocol) pair a load balancer accepts traffic on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub id: ListenerRef,
    pub load_balancer: LoadBalancerRef,
    pub port: u16,
    pub protocol: Protocol,
}

/// The set of service containers a listener forwards traffic to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub id: TargetGroupRef,
    pub listener: ListenerRef,
    pub service: ServiceRef,

    /// Container within the service's task definition that receives
    /// the traffic.
    pub container: ContainerRef,

    pub port: u16,
    pub protocol: Protocol,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_port_mapping() {
        let ports = PortMapping::symmetric(3000);
        assert_eq!(ports.container_port, 3000);
        assert_eq!(ports.host_port, 3000);
    }

    #[test]
    fn image_source_serializes_tagged() {
        let source = ImageSource::Registry {
            registry: RegistryRef::new("web").unwrap(),
            tag: None,
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "registry");
        assert_eq!(json["registry"], "registry/web");
        assert!(json.get("tag").is_none());
    }

    #[test]
    fn protocol_display() {
        assert_eq!(Protocol::Tcp.to_string(), "tcp");
        assert_eq!(
            serde_json::to_value(Protocol::Udp).unwrap(),
            serde_json::json!("udp")
        );
    }
}
