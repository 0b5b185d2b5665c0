/*
 *
 *    Copyright (c) 2020-2022 Project CHIP Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

use core::cell::Cell;

use std::rc::Rc;

use embassy_futures::block_on;

use rs_matter_structure::dm::clusters::{identify, on_off};
use rs_matter_structure::dm::devices;
use rs_matter_structure::dm::{BridgedInfo, EndpointOptions, LifecycleState};
use rs_matter_structure::error::ErrorCode;

use crate::common::{identify_with, init_env_logger, node, plug, HookLog, RecordingHooks};

#[test]
fn overwriting_destroys_before_initializing() {
    init_env_logger();

    let log = HookLog::new();
    let mut node = node();

    let device = node.insert(
        plug(EndpointOptions::new())
            .with_cluster_server(identify_with(RecordingHooks::new("first", &log))),
    );
    block_on(node.add_device(device)).unwrap();
    assert!(log.entries().is_empty());

    block_on(node.update_structure()).unwrap();
    assert_eq!(log.entries(), vec!["init first ep1"]);

    block_on(node.add_cluster_server(
        device,
        identify_with(RecordingHooks::new("second", &log)),
    ))
    .unwrap();
    assert_eq!(
        log.entries(),
        vec!["init first ep1", "destroy first ep1", "init second ep1"]
    );

    // Replacing keeps the position of the cluster on the endpoint
    let ids = node.endpoint(device).unwrap().cluster_ids().collect::<Vec<_>>();
    assert_eq!(ids[1], identify::ID);

    block_on(node.close()).unwrap();
    assert_eq!(log.entries().last().unwrap(), "destroy second ep1");
    assert!(!node.is_live());
}

#[test]
fn servers_of_detached_endpoints_are_initialized_on_attach() {
    init_env_logger();

    let log = HookLog::new();
    let mut node = node();
    block_on(node.update_structure()).unwrap();

    let device = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_cluster_server(
        device,
        identify_with(RecordingHooks::new("identify", &log)),
    ))
    .unwrap();

    let server_state = |node: &crate::common::TestNode| {
        node.endpoint(device)
            .unwrap()
            .cluster_server(identify::ID)
            .unwrap()
            .state()
    };

    assert!(log.entries().is_empty());
    assert_eq!(server_state(&node), LifecycleState::Uninitialized);

    block_on(node.add_device(device)).unwrap();

    assert_eq!(log.entries(), vec!["init identify ep1"]);
    assert_eq!(server_state(&node), LifecycleState::Initialized);
}

#[test]
fn removal_destroys_the_subtree_before_notifying() {
    init_env_logger();

    let log = HookLog::new();
    let mut node = node();

    let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
    let composed = node.insert(devices::composed_device(&[], EndpointOptions::new()));
    let part = node.insert(
        plug(EndpointOptions::new())
            .with_cluster_server(identify_with(RecordingHooks::new("part", &log))),
    );

    block_on(async {
        node.add_child_endpoint(composed, part).await?;
        node.add_bridged_device(aggregator, composed, BridgedInfo::new())
            .await?;
        node.add_device(aggregator).await?;
        node.update_structure().await
    })
    .unwrap();

    let notifications = log.clone();
    node.set_structure_changed_callback(move |_| notifications.push("changed"));

    assert_eq!(log.entries(), vec!["init part ep3"]);

    block_on(node.remove_bridged_device(aggregator, composed)).unwrap();

    assert_eq!(
        log.entries(),
        vec!["init part ep3", "destroy part ep3", "changed"]
    );
    assert_eq!(node.find(3).unwrap(), None);
    assert_eq!(
        node.endpoint(part)
            .unwrap()
            .cluster_server(on_off::ID)
            .unwrap()
            .state(),
        LifecycleState::Destroyed
    );
}

#[test]
fn failed_initialization_is_reported_and_retried() {
    init_env_logger();

    let log = HookLog::new();
    let fail = Rc::new(Cell::new(true));
    let changes = Rc::new(Cell::new(0));

    let mut node = node();
    block_on(node.update_structure()).unwrap();

    let counter = changes.clone();
    node.set_structure_changed_callback(move |_| counter.set(counter.get() + 1));

    let device = node.insert(plug(EndpointOptions::new()).with_cluster_server(identify_with(
        RecordingHooks::new("flaky", &log).failing_init(&fail),
    )));

    assert_eq!(
        block_on(node.add_device(device)).map_err(|e| e.code()),
        Err(ErrorCode::HookFailed)
    );

    let endpoint = node.endpoint(device).unwrap();
    assert_eq!(endpoint.id(), Some(1));
    assert_eq!(
        endpoint.cluster_server(identify::ID).unwrap().state(),
        LifecycleState::InitFailed
    );
    assert_eq!(
        endpoint.cluster_server(on_off::ID).unwrap().state(),
        LifecycleState::Initialized
    );
    assert_eq!(changes.get(), 1);

    // A later structural change does not retry it
    let other = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(other)).unwrap();
    assert_eq!(log.entries(), vec!["init flaky ep1"]);
    assert_eq!(changes.get(), 2);

    fail.set(false);
    block_on(node.update_structure()).unwrap();

    assert_eq!(log.entries(), vec!["init flaky ep1", "init flaky ep1"]);
    assert_eq!(
        node.endpoint(device)
            .unwrap()
            .cluster_server(identify::ID)
            .unwrap()
            .state(),
        LifecycleState::Initialized
    );
}

#[test]
fn failed_destroy_still_detaches() {
    init_env_logger();

    let log = HookLog::new();
    let mut node = node();

    let device = node.insert(plug(EndpointOptions::new()).with_cluster_server(identify_with(
        RecordingHooks::new("stubborn", &log).failing_destroy(),
    )));
    let other = node.insert(
        plug(EndpointOptions::new())
            .with_cluster_server(identify_with(RecordingHooks::new("other", &log))),
    );

    block_on(async {
        node.add_device(device).await?;
        node.add_device(other).await?;
        node.update_structure().await
    })
    .unwrap();

    assert_eq!(
        block_on(node.remove_child_endpoint(node.root(), device)).map_err(|e| e.code()),
        Err(ErrorCode::HookFailed)
    );
    assert_eq!(node.tree().parent(device).unwrap(), None);
    assert_eq!(node.find(1).unwrap(), None);

    log.clear();
    block_on(node.close()).unwrap();
    assert_eq!(log.entries(), vec!["destroy other ep2"]);
}

#[test]
fn removing_a_cluster_server() {
    init_env_logger();

    let log = HookLog::new();
    let mut node = node();

    let device = node.insert(
        plug(EndpointOptions::new())
            .with_cluster_server(identify_with(RecordingHooks::new("identify", &log))),
    );
    block_on(node.add_device(device)).unwrap();
    block_on(node.update_structure()).unwrap();

    block_on(node.remove_cluster_server(device, identify::ID)).unwrap();
    assert_eq!(log.entries(), vec!["init identify ep1", "destroy identify ep1"]);
    assert!(!node
        .endpoint(device)
        .unwrap()
        .has_cluster_server(identify::ID));

    assert_eq!(
        block_on(node.remove_cluster_server(device, identify::ID)).map_err(|e| e.code()),
        Err(ErrorCode::ClusterNotFound)
    );
}

#[test]
fn close_destroys_in_tree_order() {
    init_env_logger();

    let log = HookLog::new();
    let mut node = node();

    let first = node.insert(
        plug(EndpointOptions::new())
            .with_cluster_server(identify_with(RecordingHooks::new("a", &log))),
    );
    let second = node.insert(
        plug(EndpointOptions::new())
            .with_cluster_server(identify_with(RecordingHooks::new("b", &log))),
    );

    block_on(async {
        node.add_device(first).await?;
        node.add_device(second).await?;
        node.update_structure().await?;
        node.close().await
    })
    .unwrap();

    assert_eq!(
        log.entries(),
        vec!["init a ep1", "init b ep2", "destroy a ep1", "destroy b ep2"]
    );

    // Closing again has nothing left to destroy
    log.clear();
    block_on(node.close()).unwrap();
    assert!(log.entries().is_empty());
}
