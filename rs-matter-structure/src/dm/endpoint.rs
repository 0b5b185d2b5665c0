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

use core::fmt;

use indexmap::IndexMap;

use crate::error::{Error, ErrorCode};

use super::clusters::{basic_info, bridged_info};
use super::devices::DEV_TYPE_BRIDGED_NODE;
use super::{ClusterId, ClusterServer, DeviceType, EndptId};

/// What role an endpoint plays in the tree.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EndpointKind {
    /// The root (ep0) endpoint of a node
    Root,
    /// A plain device endpoint
    Device,
    /// An endpoint exposing bridged devices as its children
    Aggregator,
    /// A device made of several child endpoints
    Composed,
}

/// Identity options of an endpoint.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EndpointOptions {
    /// A fixed endpoint id; when absent, the id is allocated (and persisted) by the node
    pub endpoint_id: Option<EndptId>,
    /// A stable key identifying the endpoint among its siblings, used instead of its position
    pub unique_storage_key: Option<String>,
}

impl EndpointOptions {
    pub const fn new() -> Self {
        Self {
            endpoint_id: None,
            unique_storage_key: None,
        }
    }

    pub fn with_endpoint_id(mut self, endpoint_id: EndptId) -> Self {
        self.endpoint_id = Some(endpoint_id);
        self
    }

    pub fn with_unique_storage_key(mut self, key: &str) -> Self {
        self.unique_storage_key = Some(key.into());
        self
    }
}

/// The information published by the Bridged Device Basic Information cluster of a bridged endpoint.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BridgedInfo {
    pub node_label: Option<String>,
    pub vendor_name: Option<String>,
    pub product_name: Option<String>,
    pub serial_number: Option<String>,
    pub unique_id: Option<String>,
    pub reachable: bool,
}

impl BridgedInfo {
    pub const fn new() -> Self {
        Self {
            node_label: None,
            vendor_name: None,
            product_name: None,
            serial_number: None,
            unique_id: None,
            reachable: true,
        }
    }

    pub fn with_node_label(mut self, label: &str) -> Self {
        self.node_label = Some(label.into());
        self
    }

    pub fn with_serial_number(mut self, serial: &str) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_unique_id(mut self, unique_id: &str) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }
}

impl Default for BridgedInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the device tree: its identity, device types and the cluster servers it hosts.
///
/// The tree relations (parent, children) are not kept here but in the `EndpointTree`
/// the endpoint is inserted into.
pub struct Endpoint {
    id: Option<EndptId>,
    kind: EndpointKind,
    device_types: Vec<DeviceType>,
    unique_storage_key: Option<String>,
    bridged: bool,
    servers: IndexMap<ClusterId, ClusterServer>,
}

impl Endpoint {
    pub fn new(kind: EndpointKind, device_types: &[DeviceType], options: EndpointOptions) -> Self {
        Self {
            id: options.endpoint_id,
            kind,
            device_types: device_types.to_vec(),
            unique_storage_key: options.unique_storage_key,
            bridged: false,
            servers: IndexMap::new(),
        }
    }

    /// Attach a cluster server before the endpoint is part of a tree.
    ///
    /// A server already present for the same cluster id is replaced without running any hooks,
    /// as nothing has been initialized yet at this point.
    pub fn with_cluster_server(mut self, server: ClusterServer) -> Self {
        self.servers.insert(server.id(), server);
        self
    }

    pub fn id(&self) -> Option<EndptId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EndptId) {
        self.id = Some(id);
    }

    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    pub fn unique_storage_key(&self) -> Option<&str> {
        self.unique_storage_key.as_deref()
    }

    pub fn is_bridged(&self) -> bool {
        self.bridged
    }

    pub(crate) fn set_bridged(&mut self, bridged: bool) {
        self.bridged = bridged;
    }

    /// The device types as declared when creating the endpoint.
    pub fn declared_device_types(&self) -> &[DeviceType] {
        &self.device_types
    }

    /// The device types as published in the DeviceTypeList attribute:
    /// the declared ones, followed by the bridged node type if the endpoint is bridged.
    pub fn device_types(&self) -> Vec<DeviceType> {
        let mut device_types = self.device_types.clone();
        if self.bridged && !device_types.contains(&DEV_TYPE_BRIDGED_NODE) {
            device_types.push(DEV_TYPE_BRIDGED_NODE);
        }

        device_types
    }

    pub fn cluster_server(&self, cluster: ClusterId) -> Option<&ClusterServer> {
        self.servers.get(&cluster)
    }

    pub fn has_cluster_server(&self, cluster: ClusterId) -> bool {
        self.servers.contains_key(&cluster)
    }

    /// All cluster servers, in the order they were added.
    pub fn cluster_servers(&self) -> impl Iterator<Item = &ClusterServer> + '_ {
        self.servers.values()
    }

    pub fn cluster_ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.servers.keys().copied()
    }

    pub(crate) fn insert_server(&mut self, server: ClusterServer) -> Option<ClusterServer> {
        self.servers.insert(server.id(), server)
    }

    pub(crate) fn remove_server(&mut self, cluster: ClusterId) -> Option<ClusterServer> {
        self.servers.shift_remove(&cluster)
    }

    /// The segment this endpoint contributes to the storage key of its own id
    /// (and to those of its descendants).
    ///
    /// In priority order: the explicit unique storage key, the UniqueID and then the
    /// SerialNumber from the (bridged) basic information cluster, and finally the
    /// position of the endpoint among its siblings.
    pub fn unique_segment(&self, position: Option<usize>) -> Result<String, Error> {
        if let Some(key) = self.unique_storage_key() {
            if key.is_empty() {
                return Err(Error::new_with_details(
                    ErrorCode::InvalidData,
                    "Empty unique storage key",
                ));
            }

            return Ok(format!("custom_{}", key));
        }

        if let Some(unique_id) = self.basic_info_string(
            basic_info::Attributes::UniqueId as _,
            bridged_info::Attributes::UniqueId as _,
        ) {
            return Ok(format!("unique_{}", unique_id));
        }

        if let Some(serial) = self.basic_info_string(
            basic_info::Attributes::SerialNumber as _,
            bridged_info::Attributes::SerialNumber as _,
        ) {
            return Ok(format!("serial_{}", serial));
        }

        position.map(|index| format!("index_{}", index)).ok_or_else(|| {
            Error::new_with_details(
                ErrorCode::InvalidState,
                "The root endpoint has no unique id or serial number to derive storage keys from",
            )
        })
    }

    fn basic_info_string(&self, basic_attr: u32, bridged_attr: u32) -> Option<String> {
        [
            (basic_info::ID, basic_attr),
            (bridged_info::ID, bridged_attr),
        ]
        .into_iter()
        .filter_map(|(cluster, attr)| self.cluster_server(cluster)?.get(attr).ok())
        .filter_map(|value| value.as_str().map(str::to_string))
        .find(|value| !value.is_empty())
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("device_types", &self.device_types())
            .field("clusters", &self.servers.values().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "endpoint {}", id)?,
            None => write!(f, "endpoint <unassigned>")?,
        }

        write!(f, " {:?} clusters:[", self.kind)?;
        let mut comma = "";
        for server in self.servers.values() {
            write!(f, "{}{}(0x{:x})", comma, server.name(), server.id())?;
            comma = ", ";
        }
        write!(f, "]")
    }
}
