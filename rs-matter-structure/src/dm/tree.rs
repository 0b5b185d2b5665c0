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

//! An arena of endpoints with index-based parent/child links.
//!
//! Endpoints are owned by the arena; the tree relations are plain `EndpointRef` handles.
//! A handle carries the generation of its slot, so a handle to a deleted endpoint never
//! resolves to an endpoint inserted later into the same slot.

use std::collections::BTreeMap;

use crate::error::{Error, ErrorCode};

use super::{Endpoint, EndptId};

/// A handle to an endpoint inserted into an `EndpointTree`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EndpointRef {
    index: u32,
    generation: u32,
}

impl EndpointRef {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

struct Entry {
    endpoint: Endpoint,
    parent: Option<EndpointRef>,
    children: Vec<EndpointRef>,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Default)]
pub struct EndpointTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl EndpointTree {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Insert a detached endpoint.
    pub fn insert(&mut self, endpoint: Endpoint) -> EndpointRef {
        let entry = Entry {
            endpoint,
            parent: None,
            children: Vec::new(),
        };

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);

            EndpointRef {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });

            EndpointRef {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    pub fn contains(&self, endpoint: EndpointRef) -> bool {
        self.entry(endpoint).is_ok()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, endpoint: EndpointRef) -> Result<&Endpoint, Error> {
        Ok(&self.entry(endpoint)?.endpoint)
    }

    pub fn get_mut(&mut self, endpoint: EndpointRef) -> Result<&mut Endpoint, Error> {
        Ok(&mut self.entry_mut(endpoint)?.endpoint)
    }

    pub fn parent(&self, endpoint: EndpointRef) -> Result<Option<EndpointRef>, Error> {
        Ok(self.entry(endpoint)?.parent)
    }

    pub fn children(&self, endpoint: EndpointRef) -> Result<&[EndpointRef], Error> {
        Ok(&self.entry(endpoint)?.children)
    }

    /// The position of the endpoint among the children of its parent.
    pub fn position(&self, endpoint: EndpointRef) -> Result<Option<usize>, Error> {
        let Some(parent) = self.parent(endpoint)? else {
            return Ok(None);
        };

        Ok(self
            .children(parent)?
            .iter()
            .position(|child| *child == endpoint))
    }

    /// The topmost ancestor of the endpoint (the endpoint itself if it is detached).
    pub fn root_of(&self, endpoint: EndpointRef) -> Result<EndpointRef, Error> {
        let mut current = endpoint;
        while let Some(parent) = self.parent(current)? {
            current = parent;
        }

        Ok(current)
    }

    /// The endpoint itself, followed by all its descendants in depth-first pre-order
    /// (children in insertion order).
    pub fn preorder(&self, endpoint: EndpointRef) -> Result<Vec<EndpointRef>, Error> {
        let mut result = Vec::new();
        let mut stack = vec![endpoint];

        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current)?.iter().rev().copied());
        }

        Ok(result)
    }

    /// All descendants of the endpoint in depth-first pre-order.
    pub fn descendants(&self, endpoint: EndpointRef) -> Result<Vec<EndpointRef>, Error> {
        let mut descendants = self.preorder(endpoint)?;
        descendants.remove(0);

        Ok(descendants)
    }

    /// The assigned ids in the subtree rooted at `endpoint`.
    pub fn ids(&self, endpoint: EndpointRef) -> Result<BTreeMap<EndptId, EndpointRef>, Error> {
        let mut ids = BTreeMap::new();
        for current in self.preorder(endpoint)? {
            if let Some(id) = self.get(current)?.id() {
                ids.insert(id, current);
            }
        }

        Ok(ids)
    }

    /// Find the endpoint with the given id in the subtree rooted at `endpoint`.
    pub fn find(&self, endpoint: EndpointRef, id: EndptId) -> Result<Option<EndpointRef>, Error> {
        for current in self.preorder(endpoint)? {
            if self.get(current)?.id() == Some(id) {
                return Ok(Some(current));
            }
        }

        Ok(None)
    }

    /// Check whether `child` could be attached under `parent`, without changing anything.
    pub fn check_attach(&self, parent: EndpointRef, child: EndpointRef) -> Result<(), Error> {
        self.entry(parent)?;
        self.entry(child)?;

        let root = self.root_of(parent)?;
        let existing = self.ids(root)?;

        for candidate in self.preorder(child)? {
            let Some(id) = self.get(candidate)?.id() else {
                continue;
            };

            if let Some(other) = existing.get(&id) {
                let details = match self.parent(*other)? {
                    Some(other_parent) => format!(
                        "Endpoint with id {} already exists as child from {}.",
                        id,
                        self.display_id(other_parent)?
                    ),
                    None => format!("Endpoint with id {} already exists as root.", id),
                };

                return Err(Error::new_with_details(ErrorCode::Duplicate, details));
            }
        }

        if self.parent(child)?.is_some() {
            return Err(Error::new_with_details(
                ErrorCode::InvalidAction,
                format!(
                    "Endpoint {} is already attached to another parent",
                    self.display_id(child)?
                ),
            ));
        }

        if root == child {
            return Err(Error::new_with_details(
                ErrorCode::InvalidAction,
                "An endpoint cannot be attached below itself",
            ));
        }

        Ok(())
    }

    /// Attach the detached endpoint `child` (and its subtree) as the last child of `parent`.
    pub fn attach(&mut self, parent: EndpointRef, child: EndpointRef) -> Result<(), Error> {
        self.check_attach(parent, child)?;

        self.entry_mut(child)?.parent = Some(parent);
        self.entry_mut(parent)?.children.push(child);

        Ok(())
    }

    /// Detach `child` from its parent. The subtree stays in the arena.
    pub fn detach(&mut self, child: EndpointRef) -> Result<EndpointRef, Error> {
        let parent = self.parent(child)?.ok_or_else(|| {
            Error::new_with_details(ErrorCode::InvalidAction, "Endpoint is not attached")
        })?;

        self.entry_mut(parent)?.children.retain(|c| *c != child);
        self.entry_mut(child)?.parent = None;

        Ok(parent)
    }

    /// Remove the detached endpoint and its whole subtree from the arena.
    pub fn delete(&mut self, endpoint: EndpointRef) -> Result<Vec<Endpoint>, Error> {
        if self.parent(endpoint)?.is_some() {
            return Err(Error::new_with_details(
                ErrorCode::InvalidAction,
                "Only detached endpoints can be deleted",
            ));
        }

        let mut deleted = Vec::new();
        for current in self.preorder(endpoint)? {
            let slot = &mut self.slots[current.index as usize];
            if let Some(entry) = slot.entry.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                deleted.push(entry.endpoint);
            }
        }

        Ok(deleted)
    }

    fn display_id(&self, endpoint: EndpointRef) -> Result<String, Error> {
        Ok(match self.get(endpoint)?.id() {
            Some(id) => id.to_string(),
            None => "<unassigned>".into(),
        })
    }

    fn entry(&self, endpoint: EndpointRef) -> Result<&Entry, Error> {
        self.slots
            .get(endpoint.index as usize)
            .filter(|slot| slot.generation == endpoint.generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or_else(|| ErrorCode::EndpointNotFound.into())
    }

    fn entry_mut(&mut self, endpoint: EndpointRef) -> Result<&mut Entry, Error> {
        self.slots
            .get_mut(endpoint.index as usize)
            .filter(|slot| slot.generation == endpoint.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or_else(|| ErrorCode::EndpointNotFound.into())
    }
}
