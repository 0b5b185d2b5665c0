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

//! The key-value persistence contract used by the endpoint structure engine.
//!
//! The engine only ever persists endpoint-id allocation records (string key -> number),
//! so the contract is intentionally narrow. Backends (flash, files, databases) implement
//! `KvStore`; `MemKvStore` is an in-memory implementation suitable for tests and for
//! nodes that do not need their endpoint ids to survive a restart.

use std::collections::BTreeMap;

use crate::error::Error;

/// A synchronous key-value store mapping string keys to numeric values.
pub trait KvStore {
    /// Return the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<u32>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: u32) -> Result<(), Error>;
}

impl<T> KvStore for &mut T
where
    T: KvStore,
{
    fn get(&self, key: &str) -> Result<Option<u32>, Error> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), Error> {
        (**self).set(key, value)
    }
}

/// An in-memory `KvStore`.
#[derive(Debug, Default, Clone)]
pub struct MemKvStore {
    entries: BTreeMap<String, u32>,
}

impl MemKvStore {
    /// Create a new, empty store.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Return the store pre-seeded with the given entry.
    pub fn with_entry(mut self, key: &str, value: u32) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl KvStore for MemKvStore {
    fn get(&self, key: &str) -> Result<Option<u32>, Error> {
        Ok(self.entries.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), Error> {
        self.entries.insert(key.into(), value);
        Ok(())
    }
}

/// A view on a `KvStore` where all keys live under a common namespace.
///
/// Several nodes can therefore share a single backend without their
/// endpoint allocation records clashing.
#[derive(Debug)]
pub struct KvScope<S> {
    store: S,
    namespace: String,
}

impl<S> KvScope<S>
where
    S: KvStore,
{
    pub fn new(store: S, namespace: &str) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Return the wrapped store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}.{}", self.namespace, key)
    }
}

impl<S> KvStore for KvScope<S>
where
    S: KvStore,
{
    fn get(&self, key: &str) -> Result<Option<u32>, Error> {
        self.store.get(&self.scoped(key))
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), Error> {
        let key = self.scoped(key);
        self.store.set(&key, value)
    }
}
