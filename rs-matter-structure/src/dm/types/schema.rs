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

//! Static cluster metadata: which attributes, commands and events a cluster defines.
//!
//! Schemas are plain `const` data. The structure engine never validates values against
//! them beyond existence and access checks; it only uses them to instantiate cluster
//! servers and to name things in diagnostics.

use super::{Access, AttrId, AttrValue, ClusterId, CmdId, EventId, Quality};

/// The default value of an attribute, in a form that can live in `const` schema tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttrDefault {
    Null,
    Bool(bool),
    Uint(u64),
    Int(i64),
    Str(&'static str),
    EmptyList,
}

impl AttrDefault {
    pub fn to_value(&self) -> AttrValue {
        match self {
            Self::Null => AttrValue::Null,
            Self::Bool(v) => AttrValue::Bool(*v),
            Self::Uint(v) => AttrValue::Uint(*v),
            Self::Int(v) => AttrValue::Int(*v),
            Self::Str(v) => AttrValue::Utf8((*v).into()),
            Self::EmptyList => AttrValue::empty_list(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub id: AttrId,
    pub name: &'static str,
    pub access: Access,
    pub quality: Quality,
    pub mandatory: bool,
    pub default: AttrDefault,
}

impl AttributeSchema {
    pub const fn mandatory(
        id: AttrId,
        name: &'static str,
        access: Access,
        default: AttrDefault,
    ) -> Self {
        Self {
            id,
            name,
            access,
            quality: Quality::empty(),
            mandatory: true,
            default,
        }
    }

    pub const fn optional(
        id: AttrId,
        name: &'static str,
        access: Access,
        default: AttrDefault,
    ) -> Self {
        Self {
            mandatory: false,
            ..Self::mandatory(id, name, access, default)
        }
    }

    pub const fn with_quality(self, quality: Quality) -> Self {
        Self { quality, ..self }
    }
}

#[derive(Debug, Clone)]
pub struct CommandSchema {
    pub id: CmdId,
    pub name: &'static str,
    /// The id of the response command generated by the server, if any
    pub response: Option<CmdId>,
    pub mandatory: bool,
}

impl CommandSchema {
    pub const fn mandatory(id: CmdId, name: &'static str, response: Option<CmdId>) -> Self {
        Self {
            id,
            name,
            response,
            mandatory: true,
        }
    }

    pub const fn optional(id: CmdId, name: &'static str, response: Option<CmdId>) -> Self {
        Self {
            id,
            name,
            response,
            mandatory: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSchema {
    pub id: EventId,
    pub name: &'static str,
}

impl EventSchema {
    pub const fn new(id: EventId, name: &'static str) -> Self {
        Self { id, name }
    }
}

#[derive(Debug, Clone)]
pub struct ClusterSchema {
    pub id: ClusterId,
    pub name: &'static str,
    pub revision: u16,
    pub feature_map: u32,
    pub attributes: &'static [AttributeSchema],
    pub commands: &'static [CommandSchema],
    pub events: &'static [EventSchema],
}

impl ClusterSchema {
    pub fn attribute(&self, id: AttrId) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|attr| attr.id == id)
    }

    pub fn command(&self, id: CmdId) -> Option<&CommandSchema> {
        self.commands.iter().find(|cmd| cmd.id == id)
    }

    pub fn event(&self, id: EventId) -> Option<&EventSchema> {
        self.events.iter().find(|event| event.id == id)
    }
}
