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

//! The owner of an endpoint tree.
//!
//! A `Node` keeps the tree of a Matter node consistent: it assigns (and persists) endpoint
//! ids, keeps the Descriptor cluster of every endpoint in sync with the tree and runs the
//! lifecycle hooks of the cluster servers as they become reachable from the root, or stop
//! being so.
//!
//! Every mutating operation records at most one pending `StructureChange`. Before the
//! operation returns, the change is drained: if the node is live, ids are assigned,
//! descriptors recomputed and new cluster servers initialized, and only then is the
//! structure-changed callback invoked, exactly once.

use std::collections::BTreeSet;

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use log::{debug, info};

use crate::error::{Error, ErrorCode};
use crate::persist::KvStore;

use super::clusters::{bridged_info, desc};
use super::ids::{storage_key, EndpointIdAllocator, IdPolicy};
use super::{
    AttrValue, BridgedInfo, Catalog, ClusterId, ClusterServer, Endpoint, EndpointKind,
    EndpointRef, EndpointStructure, EndpointTree, EndptId, LifecycleState, ROOT_ENDPOINT_ID,
};

/// A structural change of the tree reachable from the root of a node.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StructureChange {
    EndpointAdded {
        parent: EndpointRef,
        endpoint: EndpointRef,
    },
    EndpointRemoved {
        parent: EndpointRef,
        endpoint: EndpointRef,
    },
    ClusterAdded {
        endpoint: EndpointRef,
        cluster: ClusterId,
    },
    ClusterRemoved {
        endpoint: EndpointRef,
        cluster: ClusterId,
    },
}

type StructureChangedCallback = Box<dyn FnMut(StructureChange)>;

/// An endpoint tree together with the id allocator persisting its endpoint ids.
pub struct Node<S, M = NoopRawMutex>
where
    M: RawMutex,
{
    catalog: Catalog,
    tree: EndpointTree,
    root: EndpointRef,
    allocator: EndpointIdAllocator<M, S>,
    live: bool,
    pending: Option<StructureChange>,
    callback: Option<StructureChangedCallback>,
}

impl<S> Node<S>
where
    S: KvStore,
{
    /// Create a node with the default id policy.
    ///
    /// `store` is where endpoint ids are persisted; usually a `KvScope` dedicated to the node.
    pub fn new(catalog: Catalog, root: Endpoint, store: S) -> Self {
        Self::new_with_policy(catalog, root, store, IdPolicy::new())
    }
}

impl<S, M> Node<S, M>
where
    S: KvStore,
    M: RawMutex,
{
    /// Create a node. The root endpoint gets id 0 unless it already has one.
    pub fn new_with_policy(catalog: Catalog, mut root: Endpoint, store: S, policy: IdPolicy) -> Self {
        if root.id().is_none() {
            root.set_id(ROOT_ENDPOINT_ID);
        }

        let mut tree = EndpointTree::new();
        let root = tree.insert(root);

        Self {
            catalog,
            tree,
            root,
            allocator: EndpointIdAllocator::new(store, policy),
            live: false,
            pending: None,
            callback: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tree(&self) -> &EndpointTree {
        &self.tree
    }

    pub fn root(&self) -> EndpointRef {
        self.root
    }

    pub fn allocator(&self) -> &EndpointIdAllocator<M, S> {
        &self.allocator
    }

    pub fn into_store(self) -> S {
        self.allocator.into_store()
    }

    /// Whether `update_structure` ran (and `close` did not run since).
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Hand a new, detached endpoint over to the node.
    ///
    /// Detached endpoints can be assembled into subtrees with `add_child_endpoint` and
    /// `add_bridged_device` before the subtree is attached to the root.
    pub fn insert(&mut self, endpoint: Endpoint) -> EndpointRef {
        self.tree.insert(endpoint)
    }

    pub fn endpoint(&self, endpoint: EndpointRef) -> Result<&Endpoint, Error> {
        self.tree.get(endpoint)
    }

    /// Find the endpoint with id `id` among the endpoints reachable from the root.
    pub fn find(&self, id: EndptId) -> Result<Option<EndpointRef>, Error> {
        self.tree.find(self.root, id)
    }

    pub fn set_structure_changed_callback<F>(&mut self, callback: F)
    where
        F: FnMut(StructureChange) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Attach `child` (with its subtree) as the last child of `parent`.
    ///
    /// Fails with `Duplicate` if an endpoint of the child subtree has an id which is
    /// already used in the tree `parent` belongs to. On a live node, the child is detached
    /// again if ids cannot be assigned to its subtree.
    pub async fn add_child_endpoint(
        &mut self,
        parent: EndpointRef,
        child: EndpointRef,
    ) -> Result<(), Error> {
        self.tree.attach(parent, child)?;

        if self.is_reachable(parent)? {
            if self.live {
                // A live node never exposes an endpoint without an id
                if let Err(e) = self.assign_endpoint_ids() {
                    self.tree.detach(child)?;
                    return Err(e);
                }
            }

            self.mark(StructureChange::EndpointAdded {
                parent,
                endpoint: child,
            });
        }

        self.finish().await
    }

    /// Attach `device` directly below the root endpoint.
    pub async fn add_device(&mut self, device: EndpointRef) -> Result<(), Error> {
        self.add_child_endpoint(self.root, device).await
    }

    /// Attach `device` below `aggregator` as a bridged device.
    ///
    /// The Bridged Device Basic Information server of the device is created from `info`,
    /// or updated from it if the device already has one.
    pub async fn add_bridged_device(
        &mut self,
        aggregator: EndpointRef,
        device: EndpointRef,
        info: BridgedInfo,
    ) -> Result<(), Error> {
        if self.tree.get(aggregator)?.kind() != EndpointKind::Aggregator {
            return Err(Error::new_with_details(
                ErrorCode::InvalidAction,
                "Bridged devices can only be added to aggregators",
            ));
        }

        self.tree.check_attach(aggregator, device)?;

        let endpoint = self.tree.get_mut(device)?;
        match endpoint.cluster_server(bridged_info::ID) {
            Some(server) => bridged_info::update(server, &info)?,
            None => {
                endpoint.insert_server(bridged_info::server(&info)?);
            }
        }
        endpoint.set_bridged(true);

        let result = self.add_child_endpoint(aggregator, device).await;

        if result.is_err() && self.tree.parent(device)?.is_none() {
            self.tree.get_mut(device)?.set_bridged(false);
        }

        result
    }

    /// Detach the bridged `device` from `aggregator`, destroying its cluster servers.
    ///
    /// The detached endpoint is no longer a bridged node.
    pub async fn remove_bridged_device(
        &mut self,
        aggregator: EndpointRef,
        device: EndpointRef,
    ) -> Result<(), Error> {
        if !self.tree.get(device)?.is_bridged() {
            return Err(Error::new_with_details(
                ErrorCode::InvalidAction,
                "Endpoint is not a bridged device",
            ));
        }

        let result = self.remove_child_endpoint(aggregator, device).await;

        if self.tree.parent(device)?.is_none() {
            self.tree.get_mut(device)?.set_bridged(false);
        }

        result
    }

    /// Detach `child` from `parent`.
    ///
    /// If the child was reachable from the root, the cluster servers of the child and of
    /// all its descendants are destroyed before it is detached. The child subtree stays
    /// with the node (keeping its ids) and can be attached again, or dropped with
    /// `delete_endpoint`.
    pub async fn remove_child_endpoint(
        &mut self,
        parent: EndpointRef,
        child: EndpointRef,
    ) -> Result<(), Error> {
        if self.tree.parent(child)? != Some(parent) {
            return Err(Error::new_with_details(
                ErrorCode::EndpointNotFound,
                "Endpoint is not a child of the given parent",
            ));
        }

        let reachable = self.is_reachable(parent)?;

        let destroyed = if reachable {
            self.destroy_servers(child).await
        } else {
            Ok(())
        };

        self.tree.detach(child)?;

        if reachable {
            self.mark(StructureChange::EndpointRemoved {
                parent,
                endpoint: child,
            });
        }

        let finished = self.finish().await;

        destroyed.and(finished)
    }

    /// Drop a detached endpoint and its subtree for good.
    ///
    /// Ids persisted for the dropped endpoints stay reserved for their storage keys.
    pub fn delete_endpoint(&mut self, endpoint: EndpointRef) -> Result<Vec<Endpoint>, Error> {
        if endpoint == self.root {
            return Err(Error::new_with_details(
                ErrorCode::InvalidAction,
                "The root endpoint cannot be deleted",
            ));
        }

        self.tree.delete(endpoint)
    }

    /// Install `server` on `endpoint`, replacing the server of the same cluster, if any.
    ///
    /// If the endpoint is reachable from the root of a live node, the replaced server is
    /// destroyed before the new one is initialized. A failing initialization leaves the
    /// new server installed in the `InitFailed` state; `update_structure` retries it.
    pub async fn add_cluster_server(
        &mut self,
        endpoint: EndpointRef,
        server: ClusterServer,
    ) -> Result<(), Error> {
        let reachable = self.is_reachable(endpoint)?;
        let active = reachable && self.live;
        let cluster = server.id();

        let replaced = self.tree.get_mut(endpoint)?.insert_server(server);

        let mut result = Ok(());

        if active {
            let id = self.assigned_id(endpoint)?;

            if let Some(replaced) = replaced {
                result = replaced.destroy(id).await;
            }

            if let Some(server) = self.tree.get(endpoint)?.cluster_server(cluster) {
                result = result.and(server.initialize(id).await);
            }
        }

        if reachable {
            self.mark(StructureChange::ClusterAdded { endpoint, cluster });
        }

        let finished = self.finish().await;

        result.and(finished)
    }

    /// Remove the server of `cluster` from `endpoint`, destroying it if it was initialized.
    pub async fn remove_cluster_server(
        &mut self,
        endpoint: EndpointRef,
        cluster: ClusterId,
    ) -> Result<(), Error> {
        let reachable = self.is_reachable(endpoint)?;
        let id = self.tree.get(endpoint)?.id();

        let server = self
            .tree
            .get_mut(endpoint)?
            .remove_server(cluster)
            .ok_or_else(|| {
                Error::new_with_details(
                    ErrorCode::ClusterNotFound,
                    format!("No cluster server 0x{:x} on the endpoint", cluster),
                )
            })?;

        let destroyed = match id {
            Some(id) => server.destroy(id).await,
            None => Ok(()),
        };

        if reachable {
            self.mark(StructureChange::ClusterRemoved { endpoint, cluster });
        }

        let finished = self.finish().await;

        destroyed.and(finished)
    }

    /// Assign ids to all endpoints reachable from the root which do not have one yet.
    ///
    /// Endpoints are visited in pre-order. Each gets the id persisted for its storage key,
    /// or a new one. Returns the ids assigned by this call, in visiting order.
    ///
    /// Either all missing ids are assigned or, on error, none is.
    pub fn assign_endpoint_ids(&mut self) -> Result<Vec<EndptId>, Error> {
        let mut in_use = self.ids_in_use()?;
        let floor = Self::floor(&in_use);

        let mut assigned = Vec::new();

        for ep in self.tree.preorder(self.root)? {
            if self.tree.get(ep)?.id().is_some() {
                continue;
            }

            let key = storage_key(&self.tree, ep)?;
            let id = self
                .allocator
                .allocate(&key, floor, |id| in_use.contains(&id))?;

            in_use.insert(id);
            assigned.push((ep, id));
        }

        for (ep, id) in &assigned {
            self.tree.get_mut(*ep)?.set_id(*id);
        }

        Ok(assigned.into_iter().map(|(_, id)| id).collect())
    }

    /// The id the next new endpoint would get.
    ///
    /// Unless `probe_only` is set, the id is reserved and not handed out to any endpoint.
    pub fn next_endpoint_id(&self, probe_only: bool) -> Result<EndptId, Error> {
        let in_use = self.ids_in_use()?;

        self.allocator
            .next_free(Self::floor(&in_use), !probe_only, |id| in_use.contains(&id))
    }

    /// Recompute the Descriptor attributes of every endpoint reachable from the root.
    ///
    /// The parts list of an endpoint is the ids of all its descendants in pre-order.
    /// Values which did not change are not written, so repeated calls are no-ops.
    pub fn update_parts_list(&self) -> Result<(), Error> {
        for ep in self.tree.preorder(self.root)? {
            let endpoint = self.tree.get(ep)?;
            let id = self.assigned_id(ep)?;

            let Some(descriptor) = endpoint.cluster_server(desc::ID) else {
                debug!("Endpoint {} has no descriptor", id);
                continue;
            };

            let parts = self
                .tree
                .descendants(ep)?
                .into_iter()
                .map(|descendant| self.assigned_id(descendant))
                .collect::<Result<Vec<_>, _>>()?;

            let mut changed = descriptor.set(
                desc::Attributes::DeviceTypeList as _,
                desc::device_type_list(&endpoint.device_types()),
            )?;
            changed |= descriptor.set(
                desc::Attributes::ServerList as _,
                AttrValue::uint_list(endpoint.cluster_ids()),
            )?;
            changed |= descriptor.set(desc::Attributes::ClientList as _, AttrValue::empty_list())?;
            changed |= descriptor.set(desc::Attributes::PartsList as _, desc::parts_list(&parts))?;

            if changed {
                debug!("Descriptor of endpoint {} updated, parts: {:?}", id, parts);
            }
        }

        Ok(())
    }

    /// Bring the whole tree up to date and make the node live.
    ///
    /// Assigns missing ids, recomputes all descriptors and initializes every reachable
    /// cluster server which is not initialized, including those whose initialization
    /// failed before.
    pub async fn update_structure(&mut self) -> Result<(), Error> {
        self.assign_endpoint_ids()?;
        self.update_parts_list()?;

        if !self.live {
            info!("Node going live with {} endpoints", self.ids_in_use()?.len());
            self.live = true;
        }

        self.initialize_servers(true).await
    }

    /// Destroy all cluster servers reachable from the root. The node is no longer live.
    pub async fn close(&mut self) -> Result<(), Error> {
        self.live = false;

        self.destroy_servers(self.root).await
    }

    /// Check every endpoint reachable from the root against the cluster servers its
    /// device types require. Device types missing from the catalog are not checked.
    pub fn verify_required_clusters(&self) -> Result<(), Error> {
        for ep in self.tree.preorder(self.root)? {
            let endpoint = self.tree.get(ep)?;

            for device_type in endpoint.device_types() {
                let Some(def) = self.catalog.device_type(device_type.dtype) else {
                    debug!(
                        "Device type 0x{:x} is not in the catalog, not verifying",
                        device_type.dtype
                    );
                    continue;
                };

                if let Some(missing) = def
                    .required_servers
                    .iter()
                    .find(|cluster| !endpoint.has_cluster_server(**cluster))
                {
                    let id = endpoint
                        .id()
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "<unassigned>".into());

                    return Err(Error::new_with_details(
                        ErrorCode::InvalidState,
                        format!(
                            "Device type {} (0x{:x}) requires cluster server {}(0x{:x}) but it is not present on endpoint {}",
                            def.name,
                            device_type.dtype,
                            self.catalog.cluster_name(*missing),
                            missing,
                            id
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    /// A snapshot of the tree reachable from the root.
    pub fn structure(&self) -> Result<EndpointStructure<'_>, Error> {
        EndpointStructure::new(&self.tree, self.root)
    }

    fn is_reachable(&self, endpoint: EndpointRef) -> Result<bool, Error> {
        Ok(self.tree.root_of(endpoint)? == self.root)
    }

    fn assigned_id(&self, endpoint: EndpointRef) -> Result<EndptId, Error> {
        self.tree.get(endpoint)?.id().ok_or_else(|| {
            Error::new_with_details(
                ErrorCode::InvalidState,
                "Endpoint has no id assigned yet",
            )
        })
    }

    fn ids_in_use(&self) -> Result<BTreeSet<EndptId>, Error> {
        Ok(self.tree.ids(self.root)?.into_keys().collect())
    }

    fn floor(in_use: &BTreeSet<EndptId>) -> EndptId {
        in_use
            .last()
            .map(|id| id.saturating_add(1))
            .unwrap_or(ROOT_ENDPOINT_ID)
    }

    fn mark(&mut self, change: StructureChange) {
        if self.pending.is_none() {
            self.pending = Some(change);
        }
    }

    async fn finish(&mut self) -> Result<(), Error> {
        let Some(change) = self.pending.take() else {
            return Ok(());
        };

        debug!("Structure changed: {:?}", change);

        let result = if self.live { self.refresh().await } else { Ok(()) };

        if let Some(callback) = self.callback.as_mut() {
            callback(change);
        }

        result
    }

    async fn refresh(&mut self) -> Result<(), Error> {
        self.assign_endpoint_ids()?;
        self.update_parts_list()?;

        self.initialize_servers(false).await
    }

    /// Initialize the servers reachable from the root in pre-order, continuing past
    /// failures. Returns the first failure.
    async fn initialize_servers(&self, retry_failed: bool) -> Result<(), Error> {
        let mut result = Ok(());

        for ep in self.tree.preorder(self.root)? {
            let id = self.assigned_id(ep)?;

            for server in self.tree.get(ep)?.cluster_servers() {
                let pending = match server.state() {
                    LifecycleState::Uninitialized | LifecycleState::Destroyed => true,
                    LifecycleState::InitFailed => retry_failed,
                    LifecycleState::Initialized => false,
                };

                if pending {
                    result = result.and(server.initialize(id).await);
                }
            }
        }

        result
    }

    /// Destroy the servers of `endpoint` and its descendants in pre-order, continuing past
    /// failures. Returns the first failure.
    async fn destroy_servers(&self, endpoint: EndpointRef) -> Result<(), Error> {
        let mut result = Ok(());

        for ep in self.tree.preorder(endpoint)? {
            let current = self.tree.get(ep)?;
            let Some(id) = current.id() else {
                continue;
            };

            for server in current.cluster_servers() {
                result = result.and(server.destroy(id).await);
            }
        }

        result
    }
}
