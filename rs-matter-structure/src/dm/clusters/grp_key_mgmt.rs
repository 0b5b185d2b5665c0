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
    Quality,
};

pub const ID: ClusterId = 0x003F;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    GroupKeyMap = 0x0,
    GroupTable = 0x1,
    MaxGroupsPerFabric = 0x2,
    MaxGroupKeysPerFabric = 0x3,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Commands {
    KeySetWrite = 0x0,
    KeySetRead = 0x1,
    KeySetRemove = 0x3,
    KeySetReadAllIndices = 0x4,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "GroupKeyManagement",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::GroupKeyMap as _,
            "GroupKeyMap",
            Access::RWVM.union(Access::FAB_SCOPED),
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::GroupTable as _,
            "GroupTable",
            Access::RV.union(Access::FAB_SCOPED),
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::MaxGroupsPerFabric as _,
            "MaxGroupsPerFabric",
            Access::RV,
            AttrDefault::Uint(1),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::mandatory(
            Attributes::MaxGroupKeysPerFabric as _,
            "MaxGroupKeysPerFabric",
            Access::RV,
            AttrDefault::Uint(1),
        )
        .with_quality(Quality::FIXED),
    ],
    commands: &[
        CommandSchema::mandatory(Commands::KeySetWrite as _, "KeySetWrite", None),
        CommandSchema::mandatory(Commands::KeySetRead as _, "KeySetRead", Some(0x2)),
        CommandSchema::mandatory(Commands::KeySetRemove as _, "KeySetRemove", None),
        CommandSchema::mandatory(
            Commands::KeySetReadAllIndices as _,
            "KeySetReadAllIndices",
            Some(0x5),
        ),
    ],
    events: &[],
};

pub fn server() -> ClusterServer {
    ClusterServer::new(&CLUSTER)
}
