//! Typed reference definitions for all topology resources.
//!
//! Each reference type has a unique kind prefix that identifies the
//! resource kind it may point at.

use crate::define_ref;

// =============================================================================
// Network and Compute
// =============================================================================

define_ref!(NetworkRef, "net");
define_ref!(ClusterRef, "cluster");
define_ref!(RegistryRef, "registry");

// =============================================================================
// Workload
// =============================================================================

define_ref!(TaskDefinitionRef, "taskdef");
define_ref!(ContainerRef, "container");
define_ref!(ServiceRef, "svc");

// =============================================================================
// Traffic
// =============================================================================

define_ref!(LoadBalancerRef, "lb");
define_ref!(ListenerRef, "listener");
define_ref!(TargetGroupRef, "tg");

// =============================================================================
// Delivery
// =============================================================================

define_ref!(PipelineRef, "pipe");
define_ref!(ArtifactRef, "artifact");

// =============================================================================
// Tests
// =============================================================================
