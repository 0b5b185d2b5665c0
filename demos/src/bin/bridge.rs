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

//! A bridge which exposes a changing set of fictitious non-Matter plugs as Matter On/Off
//! Plug-in Units below a single aggregator, logging the resulting endpoint structure.

use log::info;

use rand::RngCore;

use rs_matter_structure::dm::clusters::{desc, on_off};
use rs_matter_structure::dm::devices::{self, BasicInfoConfig};
use rs_matter_structure::dm::{
    AttrPath, AttrValue, BridgedInfo, Catalog, CmdPath, EndpointOptions, EndpointRef, Node,
};
use rs_matter_structure::error::Error;
use rs_matter_structure::persist::{KvScope, KvStore, MemKvStore};

fn main() -> Result<(), Error> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let mut rand = rand::thread_rng();
    let serial = format!("bridge-{:08x}", rand.next_u32());

    let root = devices::root_endpoint(&BasicInfoConfig {
        serial_no: &serial,
        device_name: "Demo Bridge",
        ..Default::default()
    })?;

    // Endpoint ids are persisted here; a real bridge would use flash or a file
    let store = KvScope::new(MemKvStore::new(), "EndpointStructure");
    let mut node = Node::new(Catalog::standard(), root, store);

    node.set_structure_changed_callback(|change| info!("Structure changed: {:?}", change));

    futures_lite::future::block_on(async {
        let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
        node.add_device(aggregator).await?;

        let mut plugs = Vec::new();
        for name in ["Kitchen", "Hallway", "Garage"] {
            plugs.push(bridge_plug(&mut node, aggregator, name, rand.next_u32()).await?);
        }

        node.verify_required_clusters()?;
        node.update_structure().await?;
        dump(&node)?;

        // Pretend the hallway plug was switched on from the Matter side
        let hallway = node.endpoint(plugs[1])?.id().unwrap_or_default();
        node.structure()?.invoke(
            &CmdPath::new(hallway, on_off::ID, on_off::Commands::On as _),
            &AttrValue::Null,
        )?;

        // ... and then the garage plug went away, and a new one showed up
        node.remove_bridged_device(aggregator, plugs[2]).await?;
        node.delete_endpoint(plugs[2])?;

        bridge_plug(&mut node, aggregator, "Porch", rand.next_u32()).await?;
        dump(&node)?;

        node.close().await
    })?;

    let store = node.into_store().into_inner();
    for (key, id) in store.iter() {
        info!("Persisted {} = {}", key, id);
    }

    Ok(())
}

async fn bridge_plug<S: KvStore>(
    node: &mut Node<S>,
    aggregator: EndpointRef,
    name: &str,
    serial: u32,
) -> Result<EndpointRef, Error> {
    let plug = node.insert(devices::on_off_plugin_unit(EndpointOptions::new())?);

    node.add_bridged_device(
        aggregator,
        plug,
        BridgedInfo::new()
            .with_node_label(name)
            .with_serial_number(&format!("{:08x}", serial)),
    )
    .await?;

    Ok(plug)
}

fn dump<S: KvStore>(node: &Node<S>) -> Result<(), Error> {
    let structure = node.structure()?;

    for id in structure.endpoint_ids() {
        let parts = structure.read(&AttrPath::new(
            id,
            desc::ID,
            desc::Attributes::PartsList as _,
        ))?;
        let clusters = structure
            .endpoint(id)
            .map(|ep| ep.cluster_servers().map(|c| c.name()).collect::<Vec<_>>())
            .unwrap_or_default();

        info!("Endpoint {}: parts {:?}, clusters {:?}", id, parts, clusters);
    }

    Ok(())
}
