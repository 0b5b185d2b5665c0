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

use indexmap::IndexMap;

use super::clusters::{
    acl, adm_comm, basic_info, bridged_info, desc, fixed_label, gen_comm, gen_diag, groups,
    grp_key_mgmt, identify, net_comm, noc, on_off,
};
use super::devices::{self, DeviceTypeDef};
use super::types::{ClusterId, ClusterSchema};

/// The cluster schemas and device types known to a node.
///
/// Passed explicitly to the `Node` on construction; there is no process-wide registry.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    clusters: IndexMap<ClusterId, &'static ClusterSchema>,
    device_types: IndexMap<u16, DeviceTypeDef>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog with all the clusters and device types this crate ships with.
    pub fn standard() -> Self {
        [
            &desc::CLUSTER,
            &basic_info::CLUSTER,
            &bridged_info::CLUSTER,
            &acl::CLUSTER,
            &grp_key_mgmt::CLUSTER,
            &gen_comm::CLUSTER,
            &net_comm::CLUSTER,
            &adm_comm::CLUSTER,
            &noc::CLUSTER,
            &gen_diag::CLUSTER,
            &identify::CLUSTER,
            &groups::CLUSTER,
            &on_off::CLUSTER,
            &fixed_label::CLUSTER,
        ]
        .into_iter()
        .fold(Self::new(), Self::with_cluster)
        .with_device_type(devices::ROOT_NODE)
        .with_device_type(devices::AGGREGATOR)
        .with_device_type(devices::BRIDGED_NODE)
        .with_device_type(devices::ON_OFF_LIGHT)
        .with_device_type(devices::ON_OFF_PLUGIN_UNIT)
    }

    pub fn with_cluster(mut self, schema: &'static ClusterSchema) -> Self {
        self.clusters.insert(schema.id, schema);
        self
    }

    pub fn with_device_type(mut self, def: DeviceTypeDef) -> Self {
        self.device_types.insert(def.device_type.dtype, def);
        self
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&'static ClusterSchema> {
        self.clusters.get(&id).copied()
    }

    pub fn device_type(&self, dtype: u16) -> Option<&DeviceTypeDef> {
        self.device_types.get(&dtype)
    }

    /// The name of the cluster for diagnostics, `Unknown` if not in the catalog.
    pub fn cluster_name(&self, id: ClusterId) -> &'static str {
        self.cluster(id).map(|schema| schema.name).unwrap_or("Unknown")
    }
}
