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

use super::{AttrId, ClusterId, CmdId, EndptId, EventId};

/// A fully-qualified (concrete) attribute path.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AttrPath {
    pub endpoint: EndptId,
    pub cluster: ClusterId,
    pub attr: AttrId,
}

impl AttrPath {
    pub const fn new(endpoint: EndptId, cluster: ClusterId, attr: AttrId) -> Self {
        Self {
            endpoint,
            cluster,
            attr,
        }
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/0x{:04x}/0x{:04x}",
            self.endpoint, self.cluster, self.attr
        )
    }
}

/// A fully-qualified (concrete) command path.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CmdPath {
    pub endpoint: EndptId,
    pub cluster: ClusterId,
    pub cmd: CmdId,
}

impl CmdPath {
    pub const fn new(endpoint: EndptId, cluster: ClusterId, cmd: CmdId) -> Self {
        Self {
            endpoint,
            cluster,
            cmd,
        }
    }
}

impl fmt::Display for CmdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/0x{:04x}/0x{:04x}", self.endpoint, self.cluster, self.cmd)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EventPath {
    pub endpoint: EndptId,
    pub cluster: ClusterId,
    pub event: EventId,
}

/// A path where any of the components might be a wildcard (`None`).
///
/// `leaf` is an attribute id or a command id, depending on what the path is matched against.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GenericPath {
    pub endpoint: Option<EndptId>,
    pub cluster: Option<ClusterId>,
    pub leaf: Option<u32>,
}

impl GenericPath {
    pub const fn new(endpoint: Option<EndptId>, cluster: Option<ClusterId>, leaf: Option<u32>) -> Self {
        Self {
            endpoint,
            cluster,
            leaf,
        }
    }

    /// Returns true if any of the components is a wildcard
    pub fn is_wildcard(&self) -> bool {
        self.endpoint.is_none() || self.cluster.is_none() || self.leaf.is_none()
    }

    pub fn matches(&self, endpoint: EndptId, cluster: ClusterId, leaf: u32) -> bool {
        self.endpoint.map(|e| e == endpoint).unwrap_or(true)
            && self.cluster.map(|c| c == cluster).unwrap_or(true)
            && self.leaf.map(|l| l == leaf).unwrap_or(true)
    }

    pub fn matches_attr(&self, path: &AttrPath) -> bool {
        self.matches(path.endpoint, path.cluster, path.attr)
    }

    pub fn matches_cmd(&self, path: &CmdPath) -> bool {
        self.matches(path.endpoint, path.cluster, path.cmd)
    }
}

impl From<AttrPath> for GenericPath {
    fn from(path: AttrPath) -> Self {
        Self::new(Some(path.endpoint), Some(path.cluster), Some(path.attr))
    }
}

impl From<CmdPath> for GenericPath {
    fn from(path: CmdPath) -> Self {
        Self::new(Some(path.endpoint), Some(path.cluster), Some(path.cmd))
    }
}
