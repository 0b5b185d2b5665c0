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

//! Persistent endpoint-id allocation.
//!
//! Every endpoint without an explicit id gets one from the `EndpointIdAllocator`, keyed by a
//! storage key derived from the endpoint's position and identity in the tree. Once a key has
//! an id, the same id is returned for that key forever, which is what keeps endpoint ids
//! stable across restarts and across removal and re-addition of bridged devices.

use core::cell::RefCell;
use core::cmp::max;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use log::{info, warn};

use crate::error::{Error, ErrorCode};
use crate::persist::KvStore;

use super::{EndpointRef, EndpointTree, EndptId};

/// The reserved storage key under which the allocator keeps its high-water mark
/// (the lowest id never handed out so far).
pub const NEXT_ENDPOINT_ID_KEY: &str = "__next_endpoint_id";

/// The range dynamic endpoint ids are allocated from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IdPolicy {
    pub first_dynamic_id: EndptId,
    pub max_id: EndptId,
}

impl IdPolicy {
    pub const fn new() -> Self {
        Self {
            first_dynamic_id: 1,
            max_id: 0xFFFE,
        }
    }
}

impl Default for IdPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the storage key of an endpoint: the unique segments of the endpoint and all its
/// ancestors, root first, joined with `-`.
///
/// E.g. `serial_node-matter-0000-index_1-unique_COMPOSED2-custom_COMPOSED.SUB1`.
pub fn storage_key(tree: &EndpointTree, endpoint: EndpointRef) -> Result<String, Error> {
    let mut segments = Vec::new();
    let mut current = Some(endpoint);

    while let Some(ep) = current {
        segments.push(tree.get(ep)?.unique_segment(tree.position(ep)?)?);
        current = tree.parent(ep)?;
    }

    segments.reverse();

    Ok(segments.join("-"))
}

/// Maps storage keys to endpoint ids, allocating (and persisting) new ids on demand.
///
/// All operations run under a blocking mutex, so concurrent allocations for different keys
/// cannot hand out the same id and a key never gets two ids.
pub struct EndpointIdAllocator<M, S>
where
    M: RawMutex,
{
    policy: IdPolicy,
    store: Mutex<M, RefCell<S>>,
}

impl<M, S> EndpointIdAllocator<M, S>
where
    M: RawMutex,
    S: KvStore,
{
    pub const fn new(store: S, policy: IdPolicy) -> Self {
        Self {
            policy,
            store: Mutex::new(RefCell::new(store)),
        }
    }

    pub fn policy(&self) -> &IdPolicy {
        &self.policy
    }

    /// Run `f` with shared access to the underlying store.
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        self.store.lock(|store| f(&store.borrow()))
    }

    pub fn into_store(self) -> S {
        self.store.into_inner().into_inner()
    }

    /// The id stored for `key`, if any.
    pub fn stored_id(&self, key: &str) -> Result<Option<EndptId>, Error> {
        self.store
            .lock(|store| self.load(&*store.borrow(), key))
    }

    /// The lowest id which has never been handed out.
    pub fn high_water(&self) -> Result<EndptId, Error> {
        self.store.lock(|store| self.load_high_water(&*store.borrow()))
    }

    /// Return the id stored for `key`, or allocate, persist and return a new one.
    ///
    /// A stored id which is already `in_use` by another endpoint is not reused; the key
    /// gets a new id instead.
    ///
    /// A new id is the first id not `in_use`, starting at the largest of `floor`, the
    /// high-water mark and the first dynamic id of the policy.
    pub fn allocate<F>(&self, key: &str, floor: EndptId, in_use: F) -> Result<EndptId, Error>
    where
        F: Fn(EndptId) -> bool,
    {
        self.store.lock(|store| {
            let mut store = store.borrow_mut();

            match self.load(&*store, key)? {
                Some(id) if in_use(id) => {
                    // Positional keys move when earlier siblings go away
                    warn!(
                        "Endpoint id {} stored for {} is used by another endpoint, reallocating",
                        id, key
                    );
                }
                Some(id) => {
                    self.raise_high_water(&mut *store, id)?;
                    info!("Restored endpoint id {} for {}", id, key);

                    return Ok(id);
                }
                None => (),
            }

            let start = self.start(&*store, floor)?;
            let id = self.first_free(start, &in_use)?;

            store.set(key, id as u32)?;
            self.raise_high_water(&mut *store, id)?;
            info!("Allocated endpoint id {} for {}", id, key);

            Ok(id)
        })
    }

    /// The id the next allocation for a new key would return.
    ///
    /// With `reserve` the id is also taken out of circulation, so it is never handed out
    /// by `allocate` afterwards.
    pub fn next_free<F>(&self, floor: EndptId, reserve: bool, in_use: F) -> Result<EndptId, Error>
    where
        F: Fn(EndptId) -> bool,
    {
        self.store.lock(|store| {
            let mut store = store.borrow_mut();

            let start = self.start(&*store, floor)?;
            let id = self.first_free(start, &in_use)?;

            if reserve {
                self.raise_high_water(&mut *store, id)?;
            }

            Ok(id)
        })
    }

    fn load(&self, store: &S, key: &str) -> Result<Option<EndptId>, Error> {
        let Some(value) = store.get(key)? else {
            return Ok(None);
        };

        EndptId::try_from(value)
            .ok()
            .filter(|id| *id <= self.policy.max_id)
            .map(Some)
            .ok_or_else(|| {
                Error::new_with_details(
                    ErrorCode::InvalidData,
                    format!("Stored endpoint id {} for {} is out of range", value, key),
                )
            })
    }

    fn load_high_water(&self, store: &S) -> Result<EndptId, Error> {
        let stored = store.get(NEXT_ENDPOINT_ID_KEY)?.unwrap_or(0);

        Ok(max(
            EndptId::try_from(stored).unwrap_or(EndptId::MAX),
            self.policy.first_dynamic_id,
        ))
    }

    fn raise_high_water(&self, store: &mut S, id: EndptId) -> Result<(), Error> {
        let next = id as u32 + 1;

        if next > self.load_high_water(store)? as u32 {
            store.set(NEXT_ENDPOINT_ID_KEY, next)?;
        }

        Ok(())
    }

    fn start(&self, store: &S, floor: EndptId) -> Result<u32, Error> {
        Ok(max(floor, self.load_high_water(store)?) as u32)
    }

    fn first_free<F>(&self, start: u32, in_use: &F) -> Result<EndptId, Error>
    where
        F: Fn(EndptId) -> bool,
    {
        (start..=self.policy.max_id as u32)
            .map(|id| id as EndptId)
            .find(|id| !in_use(*id))
            .ok_or_else(|| {
                Error::new_with_details(
                    ErrorCode::ResourceExhausted,
                    format!(
                        "No free endpoint id left (searched from {} to {})",
                        start, self.policy.max_id
                    ),
                )
            })
    }
}
