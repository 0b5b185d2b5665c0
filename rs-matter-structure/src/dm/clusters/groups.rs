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

use strum::FromRepr;

use crate::dm::{
    Access, AttrDefault, AttributeSchema, ClusterId, ClusterSchema, ClusterServer, CommandSchema,
};

pub const ID: ClusterId = 0x0004;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    NameSupport = 0x0,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Commands {
    AddGroup = 0x0,
    ViewGroup = 0x1,
    GetGroupMembership = 0x2,
    RemoveGroup = 0x3,
    RemoveAllGroups = 0x4,
    AddGroupIfIdentifying = 0x5,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "Groups",
    revision: 4,
    feature_map: 0,
    attributes: &[AttributeSchema::mandatory(
        Attributes::NameSupport as _,
        "NameSupport",
        Access::RV,
        AttrDefault::Uint(0),
    )],
    commands: &[
        CommandSchema::mandatory(Commands::AddGroup as _, "AddGroup", Some(0x0)),
        CommandSchema::mandatory(Commands::ViewGroup as _, "ViewGroup", Some(0x1)),
        CommandSchema::mandatory(
            Commands::GetGroupMembership as _,
            "GetGroupMembership",
            Some(0x2),
        ),
        CommandSchema::mandatory(Commands::RemoveGroup as _, "RemoveGroup", Some(0x3)),
        CommandSchema::mandatory(Commands::RemoveAllGroups as _, "RemoveAllGroups", None),
        CommandSchema::mandatory(
            Commands::AddGroupIfIdentifying as _,
            "AddGroupIfIdentifying",
            None,
        ),
    ],
    events: &[],
};

pub fn server() -> ClusterServer {
    ClusterServer::new(&CLUSTER)
}
