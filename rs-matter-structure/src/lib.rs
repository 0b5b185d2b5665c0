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

//! Endpoint and cluster structure engine for Matter nodes.
//!
//! This crate assembles the endpoint tree of a Matter node (root endpoint, aggregators,
//! bridged and composed devices), hands out stable endpoint ids that survive restarts,
//! keeps the Descriptor cluster of every endpoint in sync with the tree and drives the
//! initialize/destroy lifecycle of the cluster servers hosted on the endpoints.
//!
//! The tree is then flattened into an [`dm::EndpointStructure`] which resolves
//! attribute and command paths for an interaction layer.
//!
//! # Example
//!
//! ```ignore
//! use rs_matter_structure::dm::devices::{self, BasicInfoConfig};
//! use rs_matter_structure::dm::{BridgedInfo, Catalog, EndpointOptions, Node};
//! use rs_matter_structure::persist::{KvScope, MemKvStore};
//!
//! let root = devices::root_endpoint(&BasicInfoConfig {
//!     serial_no: "node-matter-0000",
//!     ..Default::default()
//! })?;
//!
//! let store = KvScope::new(MemKvStore::new(), "EndpointStructure");
//! let mut node = Node::new(Catalog::standard(), root, store);
//!
//! let aggregator = node.insert(devices::aggregator(EndpointOptions::new()));
//! node.add_device(aggregator).await?;
//! node.update_structure().await?;
//!
//! let plug = node.insert(devices::on_off_plugin_unit(EndpointOptions::new())?);
//! node.add_bridged_device(aggregator, plug, BridgedInfo::new().with_node_label("Plug"))
//!     .await?;
//!
//! let structure = node.structure()?;
//! ```

pub mod dm;
pub mod error;
pub mod persist;
