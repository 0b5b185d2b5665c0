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

//! End-to-end bridge setups, from a bare root node to partially pre-numbered trees.

use core::cell::Cell;

use std::rc::Rc;

use embassy_futures::block_on;

use rs_matter_structure::dm::clusters::desc;
use rs_matter_structure::dm::devices::{self, DEV_TYPE_ON_OFF_PLUGIN_UNIT};
use rs_matter_structure::dm::{AttrPath, BridgedInfo, EndpointOptions};
use rs_matter_structure::error::ErrorCode;

use crate::common::{
    init_env_logger, labelled_aggregator, node, node_with_store, parts_list, plug, seeded_store,
    stored,
};

#[test]
fn root_only() {
    init_env_logger();

    let mut node = node();

    assert!(node.assign_endpoint_ids().unwrap().is_empty());
    block_on(node.update_structure()).unwrap();
    node.verify_required_clusters().unwrap();

    let structure = node.structure().unwrap();
    assert_eq!(structure.endpoint_ids().collect::<Vec<_>>(), vec![0]);
    assert_eq!(structure.endpoint(0).unwrap().cluster_servers().count(), 9);
    assert!(parts_list(&structure, 0).is_empty());

    let attributes = structure.get_attributes(&[AttrPath::new(
        0,
        desc::ID,
        desc::Attributes::PartsList as _,
    )]);
    assert_eq!(attributes.len(), 1);
}

#[test]
fn device_gets_its_id_back_after_replacement() {
    init_env_logger();

    let mut node = node();

    let device = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(device)).unwrap();
    block_on(node.update_structure()).unwrap();
    assert_eq!(node.endpoint(device).unwrap().id(), Some(1));

    block_on(node.remove_child_endpoint(node.root(), device)).unwrap();
    node.delete_endpoint(device).unwrap();
    assert_eq!(node.structure().unwrap().endpoint_ids().count(), 1);

    let replacement = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(replacement)).unwrap();

    assert_eq!(node.endpoint(replacement).unwrap().id(), Some(1));
    assert_eq!(parts_list(&node.structure().unwrap(), 0), vec![1]);
}

#[test]
fn same_device_cannot_be_bridged_twice() {
    init_env_logger();

    let mut node = node();
    let changes = Rc::new(Cell::new(0));
    let counter = changes.clone();
    node.set_structure_changed_callback(move |_| counter.set(counter.get() + 1));

    let aggregator = node.insert(devices::aggregator(EndpointOptions::new().with_endpoint_id(1)));
    let device = node.insert(plug(EndpointOptions::new().with_endpoint_id(11)));

    block_on(node.add_bridged_device(aggregator, device, BridgedInfo::new())).unwrap();

    let err = block_on(node.add_bridged_device(aggregator, device, BridgedInfo::new()))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Duplicate);
    assert_eq!(
        err.details(),
        Some("Endpoint with id 11 already exists as child from 1.")
    );

    // Nothing detached is visible from the root
    assert_eq!(changes.get(), 0);
}

#[test]
fn two_aggregators_fully_automatic() {
    init_env_logger();

    let mut node = node();

    let mut refs = Vec::new();
    for label in ["first", "second"] {
        let aggregator = node.insert(labelled_aggregator(EndpointOptions::new(), label));
        refs.push(aggregator);

        for _ in 0..2 {
            let device = node.insert(plug(EndpointOptions::new()));
            block_on(node.add_bridged_device(aggregator, device, BridgedInfo::new())).unwrap();
            refs.push(device);
        }

        block_on(node.add_device(aggregator)).unwrap();
    }

    block_on(node.update_structure()).unwrap();

    let ids = refs
        .iter()
        .map(|ep| node.endpoint(*ep).unwrap().id().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    let structure = node.structure().unwrap();
    assert_eq!(parts_list(&structure, 0), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(parts_list(&structure, 1), vec![2, 3]);
    assert_eq!(parts_list(&structure, 4), vec![5, 6]);

    assert_eq!(stored(&node, "index_1-index_1"), Some(6));
    node.verify_required_clusters().unwrap();
}

#[test]
fn partly_preassigned_ids() {
    init_env_logger();

    let mut node = node();

    let aggregator1 = node.insert(labelled_aggregator(
        EndpointOptions::new().with_endpoint_id(37),
        "first",
    ));
    let device11 = node.insert(plug(EndpointOptions::new().with_endpoint_id(3)));
    let device12 = node.insert(plug(EndpointOptions::new()));

    let aggregator2 = node.insert(labelled_aggregator(EndpointOptions::new(), "second"));
    let device21 = node.insert(plug(EndpointOptions::new()));
    let device22 = node.insert(plug(EndpointOptions::new().with_endpoint_id(18)));
    let composed = node.insert(devices::composed_device(
        &[DEV_TYPE_ON_OFF_PLUGIN_UNIT],
        EndpointOptions::new(),
    ));
    let sub1 = node.insert(plug(
        EndpointOptions::new().with_unique_storage_key("COMPOSED.SUB1"),
    ));
    let sub2 = node.insert(plug(EndpointOptions::new()));

    block_on(async {
        node.add_bridged_device(aggregator1, device11, BridgedInfo::new())
            .await?;
        node.add_bridged_device(aggregator1, device12, BridgedInfo::new())
            .await?;

        node.add_child_endpoint(composed, sub1).await?;
        node.add_child_endpoint(composed, sub2).await?;

        node.add_bridged_device(
            aggregator2,
            device21,
            BridgedInfo::new().with_serial_number("12345678"),
        )
        .await?;
        node.add_bridged_device(aggregator2, device22, BridgedInfo::new())
            .await?;
        node.add_bridged_device(
            aggregator2,
            composed,
            BridgedInfo::new().with_unique_id("COMPOSED2"),
        )
        .await?;

        node.add_device(aggregator1).await?;
        node.add_device(aggregator2).await?;
        node.update_structure().await
    })
    .unwrap();

    let ids = [
        aggregator1,
        device11,
        device12,
        aggregator2,
        device21,
        device22,
        composed,
        sub1,
        sub2,
    ]
    .map(|ep| node.endpoint(ep).unwrap().id().unwrap());
    assert_eq!(ids, [37, 3, 38, 39, 40, 18, 41, 42, 43]);

    assert_eq!(node.next_endpoint_id(true).unwrap(), 44);

    let structure = node.structure().unwrap();
    assert_eq!(structure.endpoint_ids().count(), 10);
    assert_eq!(parts_list(&structure, 37), vec![3, 38]);
    assert_eq!(parts_list(&structure, 39), vec![40, 18, 41, 42, 43]);
    assert_eq!(parts_list(&structure, 41), vec![42, 43]);

    assert_eq!(
        stored(&node, "index_1-unique_COMPOSED2-custom_COMPOSED.SUB1"),
        Some(42)
    );
    assert_eq!(stored(&node, "index_1-serial_12345678"), Some(40));
    assert_eq!(stored(&node, "index_0"), None);
}

#[test]
fn bridged_devices_come_and_go() {
    init_env_logger();

    let mut node = node_with_store(seeded_store("index_0-custom_3333", 3));

    let aggregator = node.insert(labelled_aggregator(EndpointOptions::new(), "bridge"));
    let kept = node.insert(plug(EndpointOptions::new()));
    let leaving = node.insert(plug(EndpointOptions::new().with_unique_storage_key("3333")));

    block_on(async {
        node.add_bridged_device(aggregator, leaving, BridgedInfo::new())
            .await?;
        node.add_bridged_device(aggregator, kept, BridgedInfo::new().with_unique_id("B"))
            .await?;
        node.add_device(aggregator).await?;
        node.update_structure().await
    })
    .unwrap();

    assert_eq!(node.endpoint(aggregator).unwrap().id(), Some(1));
    assert_eq!(node.endpoint(leaving).unwrap().id(), Some(3));
    // The recovered id pushes new allocations past it
    assert_eq!(node.endpoint(kept).unwrap().id(), Some(4));

    let changes = Rc::new(Cell::new(0));
    let counter = changes.clone();
    node.set_structure_changed_callback(move |_| counter.set(counter.get() + 1));

    let added = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_bridged_device(aggregator, added, BridgedInfo::new())).unwrap();

    assert_eq!(changes.get(), 1);
    assert_eq!(node.endpoint(added).unwrap().id(), Some(5));
    assert_eq!(stored(&node, "index_0-index_2"), Some(5));

    block_on(node.remove_bridged_device(aggregator, leaving)).unwrap();
    node.delete_endpoint(leaving).unwrap();

    assert_eq!(changes.get(), 2);
    assert_eq!(node.next_endpoint_id(true).unwrap(), 6);

    {
        let structure = node.structure().unwrap();
        assert_eq!(structure.endpoint_ids().count(), 4);
        assert!(structure.endpoint(3).is_none());
        assert_eq!(structure.endpoint(4).unwrap().cluster_servers().count(), 5);
        assert_eq!(parts_list(&structure, 1), vec![4, 5]);
    }

    let returning = node.insert(plug(EndpointOptions::new().with_unique_storage_key("3333")));
    block_on(node.add_bridged_device(aggregator, returning, BridgedInfo::new())).unwrap();

    assert_eq!(changes.get(), 3);
    assert_eq!(node.endpoint(returning).unwrap().id(), Some(3));
    assert_eq!(node.next_endpoint_id(true).unwrap(), 6);

    let structure = node.structure().unwrap();
    assert_eq!(structure.endpoint_ids().count(), 5);
    assert_eq!(parts_list(&structure, 1), vec![4, 5, 3]);
}
