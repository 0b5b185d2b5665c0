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

use core::cell::Cell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;

use indexmap::IndexMap;
use log::{error, warn};

use crate::error::{Error, ErrorCode};

use super::{
    Access, AttrId, AttrValue, AttributeServer, ClusterId, ClusterSchema, CmdId, CmdPath,
    CommandHandler, CommandServer, Dataver, EndptId, GlobalElements, InvokeContext,
};

/// The future returned by the lifecycle hooks of a cluster server.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), Error>> + 'a>>;

/// What a lifecycle hook gets to see when it runs.
pub struct HookContext<'a> {
    endpoint_id: EndptId,
    cluster: &'a ClusterServer,
}

impl<'a> HookContext<'a> {
    pub fn endpoint_id(&self) -> EndptId {
        self.endpoint_id
    }

    pub fn cluster_id(&self) -> ClusterId {
        self.cluster.id()
    }

    pub fn cluster(&self) -> &'a ClusterServer {
        self.cluster
    }
}

/// Lifecycle hooks of a cluster server implementation.
///
/// `initialize` runs once the server becomes reachable from the root of a live node,
/// `destroy` runs when the server is overwritten, removed, or its endpoint is detached.
/// Both may suspend; the node awaits them before considering the structural change final.
pub trait ClusterHooks {
    fn initialize<'a>(&'a self, ctx: HookContext<'a>) -> HookFuture<'a> {
        let _ = ctx;
        Box::pin(core::future::ready(Ok(())))
    }

    fn destroy<'a>(&'a self, ctx: HookContext<'a>) -> HookFuture<'a> {
        let _ = ctx;
        Box::pin(core::future::ready(Ok(())))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecycleState {
    /// Installed, but never initialized
    Uninitialized,
    Initialized,
    /// The initialize hook failed; the server stays installed until initialization is re-attempted
    InitFailed,
    Destroyed,
}

/// One configured cluster implementation attached to an endpoint.
///
/// A cluster server is created from a static `ClusterSchema`: all mandatory attributes
/// and commands are present from the start, optional ones are enabled with `with_attr`
/// and `with_command`. The global attributes (revision, feature map and the attribute and
/// command lists) are kept in sync by the server itself.
pub struct ClusterServer {
    schema: &'static ClusterSchema,
    attributes: IndexMap<AttrId, AttributeServer>,
    commands: IndexMap<CmdId, CommandServer>,
    dataver: Dataver,
    hooks: Option<Box<dyn ClusterHooks>>,
    state: Cell<LifecycleState>,
}

impl ClusterServer {
    pub fn new(schema: &'static ClusterSchema) -> Self {
        let mut attributes = IndexMap::new();
        for attr in schema.attributes.iter().filter(|attr| attr.mandatory) {
            attributes.insert(attr.id, AttributeServer::new(attr, attr.default.to_value()));
        }

        for global in GlobalElements::ALL {
            let attr = global.schema();
            attributes.insert(attr.id, AttributeServer::new(&attr, attr.default.to_value()));
        }

        // Ascending ids, which also keeps the globals last
        attributes.sort_keys();

        let commands = schema
            .commands
            .iter()
            .filter(|cmd| cmd.mandatory)
            .map(|cmd| (cmd.id, CommandServer::new(cmd)))
            .collect();

        let this = Self {
            schema,
            attributes,
            commands,
            dataver: Dataver::default(),
            hooks: None,
            state: Cell::new(LifecycleState::Uninitialized),
        };

        this.refresh_globals(schema.feature_map);

        this
    }

    /// Enable an (optional) attribute and/or set its value.
    pub fn with_attr<V>(mut self, attr: AttrId, value: V) -> Result<Self, Error>
    where
        V: Into<AttrValue>,
    {
        let value = value.into();

        if let Some(existing) = self.attributes.get(&attr) {
            existing.set(value)?;
            return Ok(self);
        }

        let schema = self.schema.attribute(attr).ok_or_else(|| {
            Error::new_with_details(
                ErrorCode::AttributeNotFound,
                format!("Cluster {} has no attribute 0x{:x}", self.schema.name, attr),
            )
        })?;

        let server = AttributeServer::new(schema, schema.default.to_value());
        server.set(value)?;

        self.attributes.insert(attr, server);
        self.attributes.sort_keys();

        self.refresh_globals(self.feature_map());

        Ok(self)
    }

    /// Enable an optional command.
    pub fn with_command(mut self, cmd: CmdId) -> Result<Self, Error> {
        self.enable_command(cmd)?;

        Ok(self)
    }

    /// Enable the command (if optional) and install a handler for it.
    pub fn with_handler<F>(mut self, cmd: CmdId, handler: F) -> Result<Self, Error>
    where
        F: Fn(&InvokeContext<'_>, &AttrValue) -> Result<Option<AttrValue>, Error> + 'static,
    {
        self.with_command_handler(cmd, Box::new(handler))?;

        Ok(self)
    }

    pub fn with_command_handler(
        &mut self,
        cmd: CmdId,
        handler: Box<dyn CommandHandler>,
    ) -> Result<(), Error> {
        self.enable_command(cmd)?;

        if let Some(command) = self.commands.get_mut(&cmd) {
            command.set_handler(handler);
        }

        Ok(())
    }

    pub fn with_feature_map(self, feature_map: u32) -> Self {
        self.refresh_globals(feature_map);
        self
    }

    pub fn with_hooks<H>(mut self, hooks: H) -> Self
    where
        H: ClusterHooks + 'static,
    {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn id(&self) -> ClusterId {
        self.schema.id
    }

    pub fn name(&self) -> &'static str {
        self.schema.name
    }

    pub fn schema(&self) -> &'static ClusterSchema {
        self.schema
    }

    pub fn revision(&self) -> u16 {
        self.schema.revision
    }

    pub fn feature_map(&self) -> u32 {
        self.attributes
            .get(&GlobalElements::FeatureMap.id())
            .and_then(|attr| attr.value().as_uint())
            .unwrap_or(0) as u32
    }

    pub fn dataver(&self) -> u32 {
        self.dataver.get()
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub fn attribute(&self, attr: AttrId) -> Option<&AttributeServer> {
        self.attributes.get(&attr)
    }

    /// All enabled attributes in ascending id order (globals last).
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeServer> + '_ {
        self.attributes.values()
    }

    pub fn command(&self, cmd: CmdId) -> Option<&CommandServer> {
        self.commands.get(&cmd)
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandServer> + '_ {
        self.commands.values()
    }

    pub fn get(&self, attr: AttrId) -> Result<AttrValue, Error> {
        Ok(self.attribute_or_err(attr)?.value())
    }

    /// Set the value of an attribute from the server side (no access checks).
    ///
    /// Returns whether the value changed; the data version is only bumped if it did.
    pub fn set<V>(&self, attr: AttrId, value: V) -> Result<bool, Error>
    where
        V: Into<AttrValue>,
    {
        let changed = self.attribute_or_err(attr)?.set(value.into())?;
        if changed {
            self.dataver.changed();
        }

        Ok(changed)
    }

    /// Write an attribute on behalf of a client: only writable attributes can be changed.
    pub fn write(&self, attr: AttrId, value: AttrValue) -> Result<bool, Error> {
        let attribute = self.attribute_or_err(attr)?;
        if !attribute.access().contains(Access::WRITE) {
            return Err(ErrorCode::UnsupportedWrite.into());
        }

        if !attribute.is_writable() {
            return Err(ErrorCode::UnsupportedAccess.into());
        }

        self.set(attr, value)
    }

    pub fn invoke(
        &self,
        endpoint_id: EndptId,
        cmd: CmdId,
        request: &AttrValue,
    ) -> Result<Option<AttrValue>, Error> {
        let command = self.commands.get(&cmd).ok_or_else(|| {
            Error::new_with_details(
                ErrorCode::CommandNotFound,
                format!("Cluster {} has no command 0x{:x}", self.name(), cmd),
            )
        })?;

        let ctx = InvokeContext::new(CmdPath::new(endpoint_id, self.id(), cmd), self);

        command.invoke(&ctx, request)
    }

    /// Run the initialize hook (if any) and track the outcome.
    pub(crate) async fn initialize(&self, endpoint_id: EndptId) -> Result<(), Error> {
        let result = match &self.hooks {
            Some(hooks) => {
                hooks
                    .initialize(HookContext {
                        endpoint_id,
                        cluster: self,
                    })
                    .await
            }
            None => Ok(()),
        };

        match result {
            Ok(()) => {
                self.state.set(LifecycleState::Initialized);
                Ok(())
            }
            Err(e) => {
                error!(
                    "Initializing cluster {} on endpoint {} failed: {}",
                    self.name(),
                    endpoint_id,
                    e
                );
                self.state.set(LifecycleState::InitFailed);
                Err(e)
            }
        }
    }

    /// Run the destroy hook, if the server was successfully initialized before.
    pub(crate) async fn destroy(&self, endpoint_id: EndptId) -> Result<(), Error> {
        let was_initialized = self.state.get() == LifecycleState::Initialized;
        self.state.set(LifecycleState::Destroyed);

        if !was_initialized {
            return Ok(());
        }

        let Some(hooks) = &self.hooks else {
            return Ok(());
        };

        hooks
            .destroy(HookContext {
                endpoint_id,
                cluster: self,
            })
            .await
            .inspect_err(|e| {
                warn!(
                    "Destroying cluster {} on endpoint {} failed: {}",
                    self.name(),
                    endpoint_id,
                    e
                )
            })
    }

    fn attribute_or_err(&self, attr: AttrId) -> Result<&AttributeServer, Error> {
        self.attributes.get(&attr).ok_or_else(|| {
            Error::new_with_details(
                ErrorCode::AttributeNotFound,
                format!("Cluster {} has no attribute 0x{:x}", self.name(), attr),
            )
        })
    }

    fn enable_command(&mut self, cmd: CmdId) -> Result<(), Error> {
        if !self.commands.contains_key(&cmd) {
            let schema = self.schema.command(cmd).ok_or_else(|| {
                Error::new_with_details(
                    ErrorCode::CommandNotFound,
                    format!("Cluster {} has no command 0x{:x}", self.schema.name, cmd),
                )
            })?;

            self.commands.insert(cmd, CommandServer::new(schema));
            self.commands.sort_keys();
            self.refresh_globals(self.feature_map());
        }

        Ok(())
    }

    fn refresh_globals(&self, feature_map: u32) {
        let attribute_list = AttrValue::uint_list(self.attributes.keys().copied());
        let accepted = AttrValue::uint_list(self.commands.keys().copied());

        let mut generated: Vec<CmdId> = self
            .commands
            .values()
            .filter_map(|cmd| cmd.response())
            .collect();
        generated.sort_unstable();
        generated.dedup();

        let updates = [
            (GlobalElements::ClusterRevision, AttrValue::from(self.schema.revision)),
            (GlobalElements::FeatureMap, AttrValue::from(feature_map)),
            (GlobalElements::AttributeList, attribute_list),
            (GlobalElements::AcceptedCommandList, accepted),
            (GlobalElements::GeneratedCommandList, AttrValue::uint_list(generated)),
        ];

        for (global, value) in updates {
            if let Some(attr) = self.attributes.get(&global.id()) {
                if matches!(attr.set(value), Ok(true)) {
                    self.dataver.changed();
                }
            }
        }
    }
}

impl fmt::Debug for ClusterServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterServer")
            .field("id", &format_args!("0x{:x}", self.id()))
            .field("name", &self.name())
            .field("state", &self.state())
            .field("dataver", &self.dataver())
            .field("attributes", &self.attributes.values().collect::<Vec<_>>())
            .field("commands", &self.commands.values().collect::<Vec<_>>())
            .finish()
    }
}
