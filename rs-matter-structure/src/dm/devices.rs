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

use crate::error::Error;

use super::clusters::{
    acl, adm_comm, basic_info, bridged_info, desc, gen_comm, gen_diag, groups, grp_key_mgmt,
    identify, net_comm, noc, on_off,
};
use super::types::{ClusterId, DeviceType};
use super::{Endpoint, EndpointKind, EndpointOptions, ROOT_ENDPOINT_ID};

pub use super::clusters::basic_info::BasicInfoConfig;

/// A constant representing the device type for the root (ep0) endpoint in Matter.
pub const DEV_TYPE_ROOT_NODE: DeviceType = DeviceType {
    dtype: 0x0016,
    drev: 1,
};

/// A constant representing the device type for a bridged device endpoint in the node.
pub const DEV_TYPE_BRIDGED_NODE: DeviceType = DeviceType {
    dtype: 0x0013,
    drev: 1,
};

/// A constant representing the device type for an aggregator endpoint in the node
///  when the Node contains bridged endpoints.
pub const DEV_TYPE_AGGREGATOR: DeviceType = DeviceType {
    dtype: 0x000e,
    drev: 1,
};

/// A constant representing the On/Off Light device in Matter.
pub const DEV_TYPE_ON_OFF_LIGHT: DeviceType = DeviceType {
    dtype: 0x0100,
    drev: 2,
};

pub const DEV_TYPE_ON_OFF_PLUGIN_UNIT: DeviceType = DeviceType {
    dtype: 0x010A,
    drev: 2,
};

/// Catalog data of a device type: its diagnostic name and the cluster servers
/// an endpoint of that type must host.
#[derive(Debug, Clone)]
pub struct DeviceTypeDef {
    pub device_type: DeviceType,
    pub name: &'static str,
    pub required_servers: &'static [ClusterId],
}

pub const ROOT_NODE: DeviceTypeDef = DeviceTypeDef {
    device_type: DEV_TYPE_ROOT_NODE,
    name: "MA-rootdevice",
    required_servers: &[
        desc::ID,
        basic_info::ID,
        acl::ID,
        grp_key_mgmt::ID,
        gen_comm::ID,
        adm_comm::ID,
        noc::ID,
        gen_diag::ID,
    ],
};

pub const AGGREGATOR: DeviceTypeDef = DeviceTypeDef {
    device_type: DEV_TYPE_AGGREGATOR,
    name: "MA-aggregator",
    required_servers: &[desc::ID],
};

pub const BRIDGED_NODE: DeviceTypeDef = DeviceTypeDef {
    device_type: DEV_TYPE_BRIDGED_NODE,
    name: "MA-bridgednode",
    required_servers: &[desc::ID, bridged_info::ID],
};

pub const ON_OFF_LIGHT: DeviceTypeDef = DeviceTypeDef {
    device_type: DEV_TYPE_ON_OFF_LIGHT,
    name: "MA-onofflight",
    required_servers: &[desc::ID, identify::ID, groups::ID, on_off::ID],
};

pub const ON_OFF_PLUGIN_UNIT: DeviceTypeDef = DeviceTypeDef {
    device_type: DEV_TYPE_ON_OFF_PLUGIN_UNIT,
    name: "MA-onoffpluginunit",
    required_servers: &[desc::ID, identify::ID, groups::ID, on_off::ID],
};

/// Create the root endpoint of a node, with all cluster servers its device type requires
/// plus an Ethernet Network Commissioning server.
///
/// The root endpoint always has id 0.
pub fn root_endpoint(config: &BasicInfoConfig<'_>) -> Result<Endpoint, Error> {
    Ok(Endpoint::new(
        EndpointKind::Root,
        &[DEV_TYPE_ROOT_NODE],
        EndpointOptions::new().with_endpoint_id(ROOT_ENDPOINT_ID),
    )
    .with_cluster_server(desc::server())
    .with_cluster_server(basic_info::server(config)?)
    .with_cluster_server(acl::server())
    .with_cluster_server(grp_key_mgmt::server())
    .with_cluster_server(gen_comm::server())
    .with_cluster_server(net_comm::ethernet_server())
    .with_cluster_server(adm_comm::server())
    .with_cluster_server(noc::server())
    .with_cluster_server(gen_diag::server()))
}

/// An aggregator endpoint; bridged devices are added below it with `Node::add_bridged_device`.
pub fn aggregator(options: EndpointOptions) -> Endpoint {
    Endpoint::new(EndpointKind::Aggregator, &[DEV_TYPE_AGGREGATOR], options)
        .with_cluster_server(desc::server())
}

pub fn on_off_light(options: EndpointOptions) -> Result<Endpoint, Error> {
    on_off_device(DEV_TYPE_ON_OFF_LIGHT, options)
}

pub fn on_off_plugin_unit(options: EndpointOptions) -> Result<Endpoint, Error> {
    on_off_device(DEV_TYPE_ON_OFF_PLUGIN_UNIT, options)
}

/// The parent endpoint of a composed device. Its parts are added as children of it.
pub fn composed_device(device_types: &[DeviceType], options: EndpointOptions) -> Endpoint {
    Endpoint::new(EndpointKind::Composed, device_types, options)
        .with_cluster_server(desc::server())
}

fn on_off_device(device_type: DeviceType, options: EndpointOptions) -> Result<Endpoint, Error> {
    Ok(Endpoint::new(EndpointKind::Device, &[device_type], options)
        .with_cluster_server(desc::server())
        .with_cluster_server(identify::server(identify::IdentifyType::LightOutput)?)
        .with_cluster_server(groups::server())
        .with_cluster_server(on_off::server()?))
}
