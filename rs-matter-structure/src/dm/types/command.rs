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

use crate::error::{Error, ErrorCode};

use super::{AttrValue, ClusterServer, CmdId, CmdPath, CommandSchema};

/// The context a command handler is invoked with.
pub struct InvokeContext<'a> {
    path: CmdPath,
    cluster: &'a ClusterServer,
}

impl<'a> InvokeContext<'a> {
    pub const fn new(path: CmdPath, cluster: &'a ClusterServer) -> Self {
        Self { path, cluster }
    }

    pub fn path(&self) -> &CmdPath {
        &self.path
    }

    /// The cluster server instance the command is dispatched to.
    pub fn cluster(&self) -> &'a ClusterServer {
        self.cluster
    }
}

/// A handler for a single command of a cluster server.
pub trait CommandHandler {
    /// Handle the request; `Ok(Some(..))` carries the payload of the response command.
    fn invoke(
        &self,
        ctx: &InvokeContext<'_>,
        request: &AttrValue,
    ) -> Result<Option<AttrValue>, Error>;
}

impl<F> CommandHandler for F
where
    F: Fn(&InvokeContext<'_>, &AttrValue) -> Result<Option<AttrValue>, Error>,
{
    fn invoke(
        &self,
        ctx: &InvokeContext<'_>,
        request: &AttrValue,
    ) -> Result<Option<AttrValue>, Error> {
        self(ctx, request)
    }
}

/// The server-side instance of a command.
pub struct CommandServer {
    id: CmdId,
    name: &'static str,
    response: Option<CmdId>,
    handler: Option<Box<dyn CommandHandler>>,
}

impl CommandServer {
    pub fn new(schema: &CommandSchema) -> Self {
        Self {
            id: schema.id,
            name: schema.name,
            response: schema.response,
            handler: None,
        }
    }

    pub fn id(&self) -> CmdId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn response(&self) -> Option<CmdId> {
        self.response
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub(crate) fn set_handler(&mut self, handler: Box<dyn CommandHandler>) {
        self.handler = Some(handler);
    }

    pub fn invoke(
        &self,
        ctx: &InvokeContext<'_>,
        request: &AttrValue,
    ) -> Result<Option<AttrValue>, Error> {
        let handler = self.handler.as_ref().ok_or_else(|| {
            Error::new_with_details(
                ErrorCode::NoHandler,
                format!("No handler for command {} on {}", self.name, ctx.path()),
            )
        })?;

        handler.invoke(ctx, request)
    }
}

impl fmt::Debug for CommandServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:x})", self.name, self.id)?;
        if self.handler.is_none() {
            write!(f, " [no handler]")?;
        }

        Ok(())
    }
}
