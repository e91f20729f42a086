//! Shape assertions over synthesized plans.

use strata_synth::{synthesize, TargetConfig, IMAGE_MANIFEST_FILE};
use strata_topology::{
    delivery_stack, service_stack, DeliveryParams, ReferenceGraph, RollbackPolicy,
    ServiceStackParams,
};

fn target() -> TargetConfig {
    TargetConfig::new("123456789012", "eu-west-1").unwrap()
}

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
fn dependencies_precede_dependents() {
    let stack = delivery_stack(&ServiceStackParams::default(), &delivery_params()).unwrap();
    let plan = synthesize(&stack, &target()).unwrap();

    for (position, resource) in plan.resources.iter().enumerate() {
        for dep in &resource.depends_on {
            let dep_position = plan
                .resources
                .iter()
                .position(|r| &r.key == dep)
                .expect("dependency missing from plan");
            assert!(
                dep_position < position,
                "{} planned before its dependency {}",
                resource.key,
                dep
            );
        }
    }
}

#[test]
fn plan_order_matches_reference_graph() {
    let stack = service_stack(&ServiceStackParams::default()).unwrap();
    let plan = synthesize(&stack, &target()).unwrap();

    let graph = ReferenceGraph::from_stack(&stack);
    let order = graph.provisioning_order().unwrap();
    let keys: Vec<String> = plan.resources.iter().map(|r| r.key.clone()).collect();
    assert_eq!(keys, order);
}

#[test]
fn build_action_carries_rendered_build_spec() {
    let stack = delivery_stack(&ServiceStackParams::default(), &delivery_params()).unwrap();
    let plan = synthesize(&stack, &target()).unwrap();

    let pipeline = plan
        .resources
        .iter()
        .find(|r| r.key == "pipe/web")
        .expect("pipeline missing from plan");

    let build_spec = &pipeline.spec["stages"][1]["actions"][0]["build_spec"];
    assert_eq!(
        build_spec["artifact_files"],
        serde_json::json!([IMAGE_MANIFEST_FILE])
    );

    let manifest = &build_spec["image_manifest"];
    assert_eq!(manifest.as_array().unwrap().len(), 1);
    assert_eq!(manifest[0]["name"], "web");
    assert_eq!(
        manifest[0]["imageUri"],
        "123456789012.dkr.ecr.eu-west-1.amazonaws.com/acme-web-images:latest"
    );
}

#[test]
fn rollback_triple_round_trips_into_the_plan() {
    let stack = delivery_stack(&ServiceStackParams::default(), &delivery_params()).unwrap();
    let plan = synthesize(&stack, &target()).unwrap();

    let pipeline = plan
        .resources
        .iter()
        .find(|r| r.key == "pipe/web")
        .expect("pipeline missing from plan");

    let rollback = &pipeline.spec["stages"][2]["actions"][0]["rollback"];
    assert_eq!(
        rollback,
        &serde_json::json!({
            "failed_deployment": true,
            "stopped_deployment": true,
            "deployment_in_alarm": false
        })
    );
}

#[test]
fn synthesis_is_deterministic() {
    let params = ServiceStackParams::default();
    let delivery = delivery_params();

    let plan_a = synthesize(&delivery_stack(&params, &delivery).unwrap(), &target()).unwrap();
    let plan_b = synthesize(&delivery_stack(&params, &delivery).unwrap(), &target()).unwrap();

    let json_a = serde_json::to_string(&plan_a).unwrap();
    let json_b = serde_json::to_string(&plan_b).unwrap();
    assert_eq!(json_a, json_b);
    assert_eq!(plan_a.spec_hash, plan_b.spec_hash);
}

#[test]
fn invalid_stack_does_not_synthesize() {
    use strata_refs::{ListenerRef, LoadBalancerRef, NetworkRef};
    use strata_topology::{Listener, LoadBalancer, Network, Protocol, Stack};

    let mut stack = Stack::new("demo").unwrap();
    stack
        .add_network(Network {
            id: NetworkRef::new("demo").unwrap(),
        })
        .unwrap();
    stack
        .add_load_balancer(LoadBalancer {
            id: LoadBalancerRef::new("demo").unwrap(),
            network: NetworkRef::new("demo").unwrap(),
            internet_facing: true,
        })
        .unwrap();
    stack
        .add_listener(Listener {
            id: ListenerRef::new("demo-3000").unwrap(),
            load_balancer: LoadBalancerRef::new("demo").unwrap(),
            port: 3000,
            protocol: Protocol::Tcp,
        })
        .unwrap();

    // A listener with no target group is fine; break a reservation
    // instead to exercise validation failure.
    use strata_refs::{ContainerRef, TaskDefinitionRef};
    use strata_topology::{ContainerSpec, ImageSource, PortMapping, TaskDefinition};
    stack
        .add_task_definition(TaskDefinition {
            id: TaskDefinitionRef::new("demo").unwrap(),
            memory_mib: 0,
            cpu_units: 512,
            container: ContainerSpec {
                id: ContainerRef::new("demo").unwrap(),
                image: ImageSource::External {
                    uri: "registry.example.com/demo:latest".to_string(),
                },
                ports: PortMapping::symmetric(3000),
            },
        })
        .unwrap();

    let err = synthesize(&stack, &target()).unwrap_err();
    assert!(matches!(err, strata_synth::SynthError::Topology(_)));
}
