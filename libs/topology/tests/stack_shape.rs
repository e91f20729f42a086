//! Shape assertions over the built-in stack variants.
//!
//! The descriptors have no runtime behavior, so the interesting
//! properties are structural: references resolve, ports agree along the
//! forwarding chain, and the pipeline hands artifacts from stage to
//! stage in order.

use strata_topology::{
    delivery_stack, service_stack, stage_names, Action, DeliveryParams, Protocol, Resource,
    RollbackPolicy, ServiceStackParams, Stack, TopologyError,
};

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

fn both_variants() -> Vec<Stack> {
    let params = ServiceStackParams::default();
    vec![
        service_stack(&params).unwrap(),
        delivery_stack(&params, &delivery_params()).unwrap(),
    ]
}

#[test]
fn cluster_references_the_declared_network() {
    for stack in both_variants() {
        let Some(Resource::Network(network)) = stack.get("net/web") else {
            panic!("network not declared in {}", stack.name());
        };
        let Some(Resource::Cluster(cluster)) = stack.get("cluster/web") else {
            panic!("cluster not declared in {}", stack.name());
        };
        assert_eq!(cluster.network, network.id);
    }
}

#[test]
fn ports_agree_along_the_forwarding_chain() {
    for stack in both_variants() {
        let Some(Resource::TaskDefinition(task_def)) = stack.get("taskdef/web") else {
            panic!("task definition not declared");
        };
        let Some(Resource::Listener(listener)) = stack.get("listener/web-3000") else {
            panic!("listener not declared");
        };
        let Some(Resource::TargetGroup(group)) = stack.get("tg/web-3000") else {
            panic!("target group not declared");
        };

        assert_eq!(task_def.container.ports.container_port, 3000);
        assert_eq!(task_def.container.ports.host_port, 3000);
        assert_eq!(listener.port, 3000);
        assert_eq!(group.port, 3000);
        assert_eq!(listener.protocol, Protocol::Tcp);

        stack.validate().unwrap();
    }
}

#[test]
fn unequal_port_chain_fails_validation() {
    let params = ServiceStackParams::default();
    let stack = service_stack(&params).unwrap();

    // Rebuild with a listener port that disagrees with the container.
    let mut broken = Stack::new("web").unwrap();
    for resource in stack.resources() {
        match resource.clone() {
            Resource::Network(r) => broken.add_network(r).unwrap(),
            Resource::Cluster(r) => broken.add_cluster(r).unwrap(),
            Resource::Registry(r) => broken.add_registry(r).unwrap(),
            Resource::TaskDefinition(r) => broken.add_task_definition(r).unwrap(),
            Resource::Service(r) => broken.add_service(r).unwrap(),
            Resource::LoadBalancer(r) => broken.add_load_balancer(r).unwrap(),
            Resource::Listener(mut r) => {
                r.port = 8080;
                broken.add_listener(r).unwrap();
            }
            Resource::TargetGroup(r) => broken.add_target_group(r).unwrap(),
            Resource::Pipeline(r) => broken.add_pipeline(r).unwrap(),
        }
    }

    let err = broken.validate().unwrap_err();
    assert!(matches!(err, TopologyError::PortMismatch { .. }));
}

#[test]
fn pipeline_has_three_stages_in_order() {
    let stack = delivery_stack(&ServiceStackParams::default(), &delivery_params()).unwrap();
    let Some(Resource::Pipeline(pipeline)) = stack.get("pipe/web") else {
        panic!("pipeline not declared");
    };

    let names: Vec<&str> = pipeline.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![stage_names::SOURCE, stage_names::BUILD, stage_names::DEPLOY]
    );
    for stage in &pipeline.stages {
        assert_eq!(stage.actions.len(), 1);
    }
}

#[test]
fn artifacts_chain_source_to_build_to_deploy() {
    let stack = delivery_stack(&ServiceStackParams::default(), &delivery_params()).unwrap();
    let Some(Resource::Pipeline(pipeline)) = stack.get("pipe/web") else {
        panic!("pipeline not declared");
    };

    let Action::Source(source) = &pipeline.stages[0].actions[0] else {
        panic!("first stage is not a source action");
    };
    let Action::Build(build) = &pipeline.stages[1].actions[0] else {
        panic!("second stage is not a build action");
    };
    let Action::Deploy(deploy) = &pipeline.stages[2].actions[0] else {
        panic!("third stage is not a deploy action");
    };

    assert_eq!(source.output, build.input);
    assert_eq!(source.output.name(), "source");
    assert_eq!(build.output, deploy.input);
    assert_eq!(build.output.name(), "build");
}

#[test]
fn rollback_policy_round_trips_through_construction() {
    let mut params = delivery_params();
    params.rollback = RollbackPolicy {
        failed_deployment: true,
        stopped_deployment: true,
        deployment_in_alarm: false,
    };

    let stack = delivery_stack(&ServiceStackParams::default(), &params).unwrap();
    let Some(Resource::Pipeline(pipeline)) = stack.get("pipe/web") else {
        panic!("pipeline not declared");
    };
    let Action::Deploy(deploy) = &pipeline.stages[2].actions[0] else {
        panic!("third stage is not a deploy action");
    };

    assert!(deploy.rollback.failed_deployment);
    assert!(deploy.rollback.stopped_deployment);
    assert!(!deploy.rollback.deployment_in_alarm);

    // And unchanged through serialization.
    let json = serde_json::to_value(&deploy.rollback).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "failed_deployment": true,
            "stopped_deployment": true,
            "deployment_in_alarm": false
        })
    );
}

#[test]
fn consuming_an_unproduced_artifact_fails_validation() {
    let params = ServiceStackParams::default();
    let stack = delivery_stack(&params, &delivery_params()).unwrap();

    let mut broken = Stack::new("web").unwrap();
    for resource in stack.resources() {
        match resource.clone() {
            Resource::Pipeline(mut pipeline) => {
                // Drop the source stage so the build consumes an
                // artifact nothing produces.
                pipeline.stages.remove(0);
                broken.add_pipeline(pipeline).unwrap();
            }
            Resource::Network(r) => broken.add_network(r).unwrap(),
            Resource::Cluster(r) => broken.add_cluster(r).unwrap(),
            Resource::Registry(r) => broken.add_registry(r).unwrap(),
            Resource::TaskDefinition(r) => broken.add_task_definition(r).unwrap(),
            Resource::Service(r) => broken.add_service(r).unwrap(),
            Resource::LoadBalancer(r) => broken.add_load_balancer(r).unwrap(),
            Resource::Listener(r) => broken.add_listener(r).unwrap(),
            Resource::TargetGroup(r) => broken.add_target_group(r).unwrap(),
        }
    }

    let err = broken.validate().unwrap_err();
    assert!(matches!(err, TopologyError::ArtifactNotProduced { .. }));
}

#[test]
fn provisioning_order_respects_dependencies() {
    for stack in both_variants() {
        let graph = strata_topology::ReferenceGraph::from_stack(&stack);
        let order = graph.provisioning_order().unwrap();
        assert_eq!(order.len(), stack.resources().len());

        for (position, key) in order.iter().enumerate() {
            for dep in graph.dependencies(key).unwrap() {
                let dep_position = order.iter().position(|k| k == dep).unwrap();
                assert!(
                    dep_position < position,
                    "{} provisioned before its dependency {}",
                    key,
                    dep
                );
            }
        }
    }
}
