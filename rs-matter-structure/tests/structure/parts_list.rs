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

use embassy_futures::block_on;

use rs_matter_structure::dm::clusters::{desc, on_off};
use rs_matter_structure::dm::devices::{
    self, DEV_TYPE_AGGREGATOR, DEV_TYPE_BRIDGED_NODE, DEV_TYPE_ON_OFF_PLUGIN_UNIT,
    DEV_TYPE_ROOT_NODE,
};
use rs_matter_structure::dm::{AttrPath, AttrValue, BridgedInfo, EndpointOptions, EndpointRef};
use rs_matter_structure::error::ErrorCode;

use crate::common::{init_env_logger, node, parts_list, plug, TestNode};

/// root
/// ├── aggregator (1)
/// │   ├── plug (2)
/// │   └── composed (3)
/// │       ├── plug (4)
/// │       └── plug (5)
/// └── plug (6)
fn nested() -> (TestNode, [EndpointRef; 6]) {
    let mut node = node();

    let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
    let bridged = node.insert(plug(EndpointOptions::new()));
    let composed = node.insert(devices::composed_device(
        &[DEV_TYPE_ON_OFF_PLUGIN_UNIT],
        EndpointOptions::new(),
    ));
    let part1 = node.insert(plug(EndpointOptions::new()));
    let part2 = node.insert(plug(EndpointOptions::new()));
    let standalone = node.insert(plug(EndpointOptions::new()));

    block_on(async {
        node.add_child_endpoint(composed, part1).await?;
        node.add_child_endpoint(composed, part2).await?;
        node.add_bridged_device(aggregator, bridged, BridgedInfo::new())
            .await?;
        node.add_bridged_device(
            aggregator,
            composed,
            BridgedInfo::new().with_unique_id("COMPOSED"),
        )
        .await?;
        node.add_device(aggregator).await?;
        node.add_device(standalone).await
    })
    .unwrap();

    node.assign_endpoint_ids().unwrap();

    (
        node,
        [aggregator, bridged, composed, part1, part2, standalone],
    )
}

#[test]
fn parts_lists_enumerate_descendants_in_preorder() {
    init_env_logger();

    let (node, refs) = nested();

    let ids = refs.map(|ep| node.endpoint(ep).unwrap().id().unwrap());
    assert_eq!(ids, [1, 2, 3, 4, 5, 6]);

    node.update_parts_list().unwrap();

    let structure = node.structure().unwrap();
    assert_eq!(parts_list(&structure, 0), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(parts_list(&structure, 1), vec![2, 3, 4, 5]);
    assert_eq!(parts_list(&structure, 3), vec![4, 5]);
    assert!(parts_list(&structure, 4).is_empty());
    assert!(parts_list(&structure, 6).is_empty());
}

#[test]
fn update_is_idempotent() {
    init_env_logger();

    let (node, _) = nested();

    node.update_parts_list().unwrap();

    let structure = node.structure().unwrap();
    let snapshot = |structure: &rs_matter_structure::dm::EndpointStructure<'_>| {
        structure
            .endpoints()
            .map(|ep| {
                let descriptor = ep.cluster_server(desc::ID).unwrap();
                (
                    descriptor.dataver(),
                    descriptor.get(desc::Attributes::PartsList as _).unwrap(),
                    descriptor
                        .get(desc::Attributes::DeviceTypeList as _)
                        .unwrap(),
                )
            })
            .collect::<Vec<_>>()
    };

    let before = snapshot(&structure);
    node.update_parts_list().unwrap();
    node.update_parts_list().unwrap();
    let after = snapshot(&structure);

    assert_eq!(before, after);
}

#[test]
fn device_type_lists() {
    init_env_logger();

    let (node, refs) = nested();
    node.update_parts_list().unwrap();

    let device_types = |id| {
        desc::parse_device_type_list(
            &node
                .structure()
                .unwrap()
                .read(&AttrPath::new(
                    id,
                    desc::ID,
                    desc::Attributes::DeviceTypeList as _,
                ))
                .unwrap(),
        )
    };

    assert_eq!(device_types(0), vec![DEV_TYPE_ROOT_NODE]);
    assert_eq!(device_types(1), vec![DEV_TYPE_AGGREGATOR]);
    assert_eq!(
        device_types(2),
        vec![DEV_TYPE_ON_OFF_PLUGIN_UNIT, DEV_TYPE_BRIDGED_NODE]
    );
    assert_eq!(
        device_types(3),
        vec![DEV_TYPE_ON_OFF_PLUGIN_UNIT, DEV_TYPE_BRIDGED_NODE]
    );
    assert_eq!(device_types(4), vec![DEV_TYPE_ON_OFF_PLUGIN_UNIT]);

    assert!(node.endpoint(refs[1]).unwrap().is_bridged());
    assert!(!node.endpoint(refs[3]).unwrap().is_bridged());
}

#[test]
fn unbridged_devices_drop_the_bridged_node_type() {
    init_env_logger();

    let (mut node, refs) = nested();
    let [aggregator, bridged, ..] = refs;

    block_on(node.update_structure()).unwrap();
    block_on(node.remove_bridged_device(aggregator, bridged)).unwrap();
    assert!(!node.endpoint(bridged).unwrap().is_bridged());

    block_on(node.add_device(bridged)).unwrap();

    let device_types = desc::parse_device_type_list(
        &node
            .structure()
            .unwrap()
            .read(&AttrPath::new(
                2,
                desc::ID,
                desc::Attributes::DeviceTypeList as _,
            ))
            .unwrap(),
    );
    assert_eq!(device_types, vec![DEV_TYPE_ON_OFF_PLUGIN_UNIT]);
    assert_eq!(parts_list(&node.structure().unwrap(), 0), vec![1, 3, 4, 5, 6, 2]);
}

#[test]
fn server_and_client_lists() {
    init_env_logger();

    let (node, refs) = nested();
    node.update_parts_list().unwrap();

    let structure = node.structure().unwrap();
    let read = |attr: desc::Attributes| {
        structure
            .read(&AttrPath::new(6, desc::ID, attr as _))
            .unwrap()
    };

    let expected = node
        .endpoint(refs[5])
        .unwrap()
        .cluster_ids()
        .map(u64::from)
        .collect::<Vec<_>>();

    assert_eq!(read(desc::Attributes::ServerList).to_uint_vec(), Some(expected));
    assert!(read(desc::Attributes::ServerList)
        .to_uint_vec()
        .unwrap()
        .contains(&(on_off::ID as u64)));
    assert_eq!(read(desc::Attributes::ClientList), AttrValue::empty_list());
}

#[test]
fn unassigned_ids_are_reported() {
    init_env_logger();

    let mut node = node();

    let device = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(device)).unwrap();

    assert_eq!(
        node.update_parts_list().map_err(|e| e.code()),
        Err(ErrorCode::InvalidState)
    );
}

#[test]
fn live_nodes_follow_changes() {
    init_env_logger();

    let (mut node, refs) = nested();
    let [aggregator, bridged, ..] = refs;

    block_on(node.update_structure()).unwrap();
    assert_eq!(
        parts_list(&node.structure().unwrap(), 0),
        vec![1, 2, 3, 4, 5, 6]
    );

    block_on(node.remove_bridged_device(aggregator, bridged)).unwrap();
    assert_eq!(
        parts_list(&node.structure().unwrap(), 0),
        vec![1, 3, 4, 5, 6]
    );
    assert_eq!(parts_list(&node.structure().unwrap(), 1), vec![3, 4, 5]);

    let late = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_bridged_device(aggregator, late, BridgedInfo::new())).unwrap();

    // The removed device keeps its id reserved
    assert_eq!(node.endpoint(late).unwrap().id(), Some(7));
    assert_eq!(parts_list(&node.structure().unwrap(), 1), vec![3, 4, 5, 7]);
}
