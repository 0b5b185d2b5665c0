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

use crate::error::{Error, ErrorCode};

use super::{
    AttrPath, AttrValue, AttributeServer, ClusterId, ClusterServer, CmdPath, CommandServer,
    Endpoint, EndpointRef, EndpointTree, EndptId, GenericPath,
};

/// A flattened, read-only snapshot of an endpoint tree, indexed by path.
///
/// The snapshot is what an interaction layer resolves read, write and invoke requests
/// against. Endpoints and paths are enumerated in depth-first pre-order of the tree
/// (children in insertion order), so the order is reproducible from the tree alone.
///
/// A snapshot is never patched: after a structural change of the tree, build a new one.
pub struct EndpointStructure<'a> {
    endpoints: IndexMap<EndptId, &'a Endpoint>,
    clusters: IndexMap<(EndptId, ClusterId), &'a ClusterServer>,
    attribute_paths: Vec<AttrPath>,
    command_paths: Vec<CmdPath>,
    attributes: IndexMap<AttrPath, &'a AttributeServer>,
    commands: IndexMap<CmdPath, &'a CommandServer>,
}

impl<'a> EndpointStructure<'a> {
    /// Flatten the subtree of `tree` rooted at `root`.
    ///
    /// All endpoints need an assigned id, and ids must be unique.
    pub fn new(tree: &'a EndpointTree, root: EndpointRef) -> Result<Self, Error> {
        let mut structure = Self {
            endpoints: IndexMap::new(),
            clusters: IndexMap::new(),
            attribute_paths: Vec::new(),
            command_paths: Vec::new(),
            attributes: IndexMap::new(),
            commands: IndexMap::new(),
        };

        for ep in tree.preorder(root)? {
            let endpoint = tree.get(ep)?;
            let id = endpoint.id().ok_or_else(|| {
                Error::new_with_details(
                    ErrorCode::InvalidState,
                    "Cannot index an endpoint without an assigned id",
                )
            })?;

            if structure.endpoints.insert(id, endpoint).is_some() {
                return Err(Error::new_with_details(
                    ErrorCode::Duplicate,
                    format!("Endpoint id {} is used more than once", id),
                ));
            }

            for server in endpoint.cluster_servers() {
                structure.clusters.insert((id, server.id()), server);

                for attribute in server.attributes() {
                    let path = AttrPath::new(id, server.id(), attribute.id());

                    structure.attribute_paths.push(path);
                    structure.attributes.insert(path, attribute);
                }

                for command in server.commands() {
                    let path = CmdPath::new(id, server.id(), command.id());

                    structure.command_paths.push(path);
                    structure.commands.insert(path, command);
                }
            }
        }

        Ok(structure)
    }

    pub fn endpoint(&self, id: EndptId) -> Option<&'a Endpoint> {
        self.endpoints.get(&id).copied()
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &'a Endpoint> + '_ {
        self.endpoints.values().copied()
    }

    pub fn endpoint_ids(&self) -> impl Iterator<Item = EndptId> + '_ {
        self.endpoints.keys().copied()
    }

    pub fn cluster(&self, endpoint: EndptId, cluster: ClusterId) -> Option<&'a ClusterServer> {
        self.clusters.get(&(endpoint, cluster)).copied()
    }

    pub fn attribute(&self, path: &AttrPath) -> Option<&'a AttributeServer> {
        self.attributes.get(path).copied()
    }

    pub fn command(&self, path: &CmdPath) -> Option<&'a CommandServer> {
        self.commands.get(path).copied()
    }

    /// Resolve `paths` to attribute servers, in input order.
    ///
    /// Paths which do not resolve are skipped, so the result may be shorter than `paths`.
    pub fn get_attributes(&self, paths: &[AttrPath]) -> Vec<&'a AttributeServer> {
        paths.iter().filter_map(|path| self.attribute(path)).collect()
    }

    /// Resolve `paths` to command servers, in input order, skipping unknown paths.
    pub fn get_commands(&self, paths: &[CmdPath]) -> Vec<&'a CommandServer> {
        paths.iter().filter_map(|path| self.command(path)).collect()
    }

    pub fn attribute_paths(&self) -> &[AttrPath] {
        &self.attribute_paths
    }

    pub fn command_paths(&self) -> &[CmdPath] {
        &self.command_paths
    }

    /// Expand a (possibly wildcard) path into the concrete attribute paths it covers.
    pub fn attribute_paths_matching<'s>(
        &'s self,
        path: &'s GenericPath,
    ) -> impl Iterator<Item = &'s AttrPath> + 's {
        self.attribute_paths
            .iter()
            .filter(move |candidate| path.matches_attr(candidate))
    }

    pub fn command_paths_matching<'s>(
        &'s self,
        path: &'s GenericPath,
    ) -> impl Iterator<Item = &'s CmdPath> + 's {
        self.command_paths
            .iter()
            .filter(move |candidate| path.matches_cmd(candidate))
    }

    pub fn read(&self, path: &AttrPath) -> Result<AttrValue, Error> {
        self.cluster_for(path.endpoint, path.cluster)?.get(path.attr)
    }

    /// Write an attribute on behalf of a client. Returns whether the value changed.
    pub fn write(&self, path: &AttrPath, value: AttrValue) -> Result<bool, Error> {
        self.cluster_for(path.endpoint, path.cluster)?
            .write(path.attr, value)
    }

    pub fn invoke(&self, path: &CmdPath, request: &AttrValue) -> Result<Option<AttrValue>, Error> {
        self.cluster_for(path.endpoint, path.cluster)?
            .invoke(path.endpoint, path.cmd, request)
    }

    fn cluster_for(&self, endpoint: EndptId, cluster: ClusterId) -> Result<&'a ClusterServer, Error> {
        if !self.endpoints.contains_key(&endpoint) {
            return Err(Error::new_with_details(
                ErrorCode::EndpointNotFound,
                format!("No endpoint {}", endpoint),
            ));
        }

        self.cluster(endpoint, cluster).ok_or_else(|| {
            Error::new_with_details(
                ErrorCode::ClusterNotFound,
                format!("No cluster 0x{:x} on endpoint {}", cluster, endpoint),
            )
        })
    }
}
