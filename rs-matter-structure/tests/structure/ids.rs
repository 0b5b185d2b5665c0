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
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use rstest::rstest;

use rs_matter_structure::dm::devices::{self, BasicInfoConfig};
use rs_matter_structure::dm::{BridgedInfo, Catalog, EndpointOptions, IdPolicy, Node};
use rs_matter_structure::error::ErrorCode;
use rs_matter_structure::persist::{KvScope, KvStore, MemKvStore};

use crate::common::{
    init_env_logger, node, node_with_store, parts_list, plug, seeded_store, stored, NAMESPACE,
};

#[test]
fn preseeded_id_is_reused() {
    init_env_logger();

    let mut node = node_with_store(seeded_store("index_0", 10));

    let device = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(device)).unwrap();

    assert_eq!(node.assign_endpoint_ids().unwrap(), vec![10]);
    assert_eq!(node.next_endpoint_id(true).unwrap(), 11);
}

#[rstest]
#[case::custom_key(
    EndpointOptions::new().with_unique_storage_key("K1"),
    BridgedInfo::new().with_unique_id("U1"),
    "custom_K1"
)]
#[case::unique_id(
    EndpointOptions::new(),
    BridgedInfo::new().with_unique_id("U1").with_serial_number("S1"),
    "unique_U1"
)]
#[case::serial_number(
    EndpointOptions::new(),
    BridgedInfo::new().with_serial_number("S1"),
    "serial_S1"
)]
#[case::position(EndpointOptions::new(), BridgedInfo::new(), "index_0")]
fn bridged_device_key_segments(
    #[case] options: EndpointOptions,
    #[case] info: BridgedInfo,
    #[case] segment: &str,
) {
    init_env_logger();

    let mut node = node();

    let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
    let device = node.insert(plug(options));

    block_on(node.add_bridged_device(aggregator, device, info)).unwrap();
    block_on(node.add_device(aggregator)).unwrap();

    assert_eq!(node.assign_endpoint_ids().unwrap(), vec![1, 2]);
    assert_eq!(stored(&node, "index_0"), Some(1));
    assert_eq!(stored(&node, &format!("index_0-{}", segment)), Some(2));
}

#[test]
fn ids_survive_a_restart() {
    init_env_logger();

    let build = |store: MemKvStore, reversed: bool| {
        let mut node = node_with_store(store);

        let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
        let a = node.insert(plug(EndpointOptions::new()));
        let b = node.insert(plug(EndpointOptions::new()));

        let mut devices = vec![
            (a, BridgedInfo::new().with_unique_id("A")),
            (b, BridgedInfo::new().with_serial_number("B")),
        ];
        if reversed {
            devices.reverse();
        }

        for (device, info) in devices {
            block_on(node.add_bridged_device(aggregator, device, info)).unwrap();
        }
        block_on(node.add_device(aggregator)).unwrap();
        block_on(node.update_structure()).unwrap();

        let ids = [aggregator, a, b].map(|ep| node.endpoint(ep).unwrap().id().unwrap());

        (ids, node.into_store().into_inner())
    };

    let (first, store) = build(MemKvStore::new(), false);
    assert_eq!(first, [1, 2, 3]);

    let (second, store) = build(store, true);
    assert_eq!(second, first);

    assert_eq!(
        store
            .get(&format!("{}.serial_node-matter-0000-index_0-unique_A", NAMESPACE))
            .unwrap(),
        Some(2)
    );
}

#[test]
fn explicit_ids_raise_the_floor() {
    init_env_logger();

    let mut node = node();

    let explicit = node.insert(plug(EndpointOptions::new().with_endpoint_id(37)));
    let auto = node.insert(plug(EndpointOptions::new()));

    block_on(node.add_device(explicit)).unwrap();
    block_on(node.add_device(auto)).unwrap();

    assert_eq!(node.assign_endpoint_ids().unwrap(), vec![38]);
    assert_eq!(stored(&node, "index_0"), None);
    assert_eq!(stored(&node, "index_1"), Some(38));

    // Ids are never reassigned
    assert!(node.assign_endpoint_ids().unwrap().is_empty());
}

#[test]
fn next_endpoint_id_reserves_unless_probing() {
    init_env_logger();

    let mut node = node();

    assert_eq!(node.next_endpoint_id(true).unwrap(), 1);
    assert_eq!(node.next_endpoint_id(true).unwrap(), 1);
    assert_eq!(node.next_endpoint_id(false).unwrap(), 1);
    assert_eq!(node.next_endpoint_id(true).unwrap(), 2);

    let device = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(device)).unwrap();

    assert_eq!(node.assign_endpoint_ids().unwrap(), vec![2]);
}

#[test]
fn removed_ids_are_not_given_to_other_devices() {
    init_env_logger();

    let mut node = node();

    let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
    let first = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(aggregator)).unwrap();
    block_on(node.add_bridged_device(
        aggregator,
        first,
        BridgedInfo::new().with_unique_id("first"),
    ))
    .unwrap();
    block_on(node.update_structure()).unwrap();
    assert_eq!(node.endpoint(first).unwrap().id(), Some(2));

    block_on(node.remove_bridged_device(aggregator, first)).unwrap();
    node.delete_endpoint(first).unwrap();

    let second = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_bridged_device(
        aggregator,
        second,
        BridgedInfo::new().with_unique_id("second"),
    ))
    .unwrap();

    assert_eq!(node.endpoint(second).unwrap().id(), Some(3));
}

#[test]
fn stored_id_held_by_another_endpoint_is_replaced() {
    init_env_logger();

    let mut node = node_with_store(seeded_store("index_1", 5));

    let explicit = node.insert(plug(EndpointOptions::new().with_endpoint_id(5)));
    let auto = node.insert(plug(EndpointOptions::new()));

    block_on(node.add_device(explicit)).unwrap();
    block_on(node.add_device(auto)).unwrap();

    assert_eq!(node.assign_endpoint_ids().unwrap(), vec![6]);
    assert_eq!(stored(&node, "index_1"), Some(6));
}

#[test]
fn positional_keys_shift_after_a_removal() {
    init_env_logger();

    let mut node = node();

    let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
    let a = node.insert(plug(EndpointOptions::new()));
    let b = node.insert(plug(EndpointOptions::new()));

    block_on(async {
        node.add_bridged_device(aggregator, a, BridgedInfo::new())
            .await?;
        node.add_bridged_device(aggregator, b, BridgedInfo::new())
            .await?;
        node.add_device(aggregator).await?;
        node.update_structure().await
    })
    .unwrap();

    assert_eq!(node.endpoint(b).unwrap().id(), Some(3));

    block_on(node.remove_bridged_device(aggregator, a)).unwrap();
    node.delete_endpoint(a).unwrap();

    // `c` now sits where `b` was when `b` got its id
    let c = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_bridged_device(aggregator, c, BridgedInfo::new())).unwrap();

    assert_eq!(node.endpoint(c).unwrap().id(), Some(4));
    assert_eq!(stored(&node, "index_0-index_1"), Some(4));
    assert_eq!(parts_list(&node.structure().unwrap(), 1), vec![3, 4]);

    let d = node.insert(plug(EndpointOptions::new().with_endpoint_id(50)));
    block_on(node.add_device(d)).unwrap();
    node.update_parts_list().unwrap();
    assert_eq!(parts_list(&node.structure().unwrap(), 0), vec![1, 3, 4, 50]);
}

#[test]
fn failed_allocation_leaves_a_live_node_consistent() {
    init_env_logger();

    let mut node = Node::<_, NoopRawMutex>::new_with_policy(
        Catalog::standard(),
        crate::common::root(),
        MemKvStore::new(),
        IdPolicy {
            first_dynamic_id: 1,
            max_id: 2,
        },
    );
    block_on(node.update_structure()).unwrap();

    let changes = Rc::new(Cell::new(0));
    let counter = changes.clone();
    node.set_structure_changed_callback(move |_| counter.set(counter.get() + 1));

    let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
    let first = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(aggregator)).unwrap();
    block_on(node.add_bridged_device(aggregator, first, BridgedInfo::new())).unwrap();
    assert_eq!(changes.get(), 2);

    let second = node.insert(plug(EndpointOptions::new()));
    assert_eq!(
        block_on(node.add_bridged_device(aggregator, second, BridgedInfo::new()))
            .map_err(|e| e.code()),
        Err(ErrorCode::ResourceExhausted)
    );

    assert_eq!(changes.get(), 2);
    assert_eq!(node.tree().parent(second).unwrap(), None);
    let rejected = node.endpoint(second).unwrap();
    assert_eq!(rejected.id(), None);
    assert!(!rejected.is_bridged());

    assert_eq!(
        node.structure()
            .unwrap()
            .endpoint_ids()
            .collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    node.update_parts_list().unwrap();

    // Explicit ids still fit
    let explicit = node.insert(plug(EndpointOptions::new().with_endpoint_id(2)));
    block_on(node.remove_bridged_device(aggregator, first)).unwrap();
    block_on(node.add_bridged_device(aggregator, explicit, BridgedInfo::new())).unwrap();
    assert_eq!(parts_list(&node.structure().unwrap(), 1), vec![2]);
}

#[test]
fn keys_need_an_identified_root() {
    init_env_logger();

    let root = devices::root_endpoint(&BasicInfoConfig::default()).unwrap();
    let mut node = Node::new(
        Catalog::standard(),
        root,
        KvScope::new(MemKvStore::new(), NAMESPACE),
    );

    let explicit = node.insert(plug(EndpointOptions::new().with_endpoint_id(1)));
    block_on(node.add_device(explicit)).unwrap();
    assert!(node.assign_endpoint_ids().unwrap().is_empty());

    let auto = node.insert(plug(EndpointOptions::new()));
    block_on(node.add_device(auto)).unwrap();
    assert_eq!(
        node.assign_endpoint_ids().map_err(|e| e.code()),
        Err(ErrorCode::InvalidState)
    );
}

#[test]
fn id_space_exhaustion() {
    init_env_logger();

    let mut node = Node::<_, NoopRawMutex>::new_with_policy(
        Catalog::standard(),
        crate::common::root(),
        MemKvStore::new(),
        IdPolicy {
            first_dynamic_id: 1,
            max_id: 2,
        },
    );

    for _ in 0..3 {
        let device = node.insert(plug(EndpointOptions::new()));
        block_on(node.add_device(device)).unwrap();
    }

    assert_eq!(
        node.assign_endpoint_ids().map_err(|e| e.code()),
        Err(ErrorCode::ResourceExhausted)
    );
}
