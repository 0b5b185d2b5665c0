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
    Access, AttrDefault, AttributeSchema, ClusterId, ClusterSchema, ClusterServer, EventSchema,
};

pub const ID: ClusterId = 0x001F;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    Acl = 0x0,
    Extension = 0x1,
    SubjectsPerEntry = 0x2,
    TargetsPerEntry = 0x3,
    EntriesPerFabric = 0x4,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "AccessControl",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::Acl as _,
            "ACL",
            Access::RWFA,
            AttrDefault::EmptyList,
        ),
        AttributeSchema::optional(
            Attributes::Extension as _,
            "Extension",
            Access::RWFA,
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::SubjectsPerEntry as _,
            "SubjectsPerAccessControlEntry",
            Access::RV,
            AttrDefault::Uint(4),
        ),
        AttributeSchema::mandatory(
            Attributes::TargetsPerEntry as _,
            "TargetsPerAccessControlEntry",
            Access::RV,
            AttrDefault::Uint(3),
        ),
        AttributeSchema::mandatory(
            Attributes::EntriesPerFabric as _,
            "AccessControlEntriesPerFabric",
            Access::RV,
            AttrDefault::Uint(4),
        ),
    ],
    commands: &[],
    events: &[
        EventSchema::new(0x00, "AccessControlEntryChanged"),
        EventSchema::new(0x01, "AccessControlExtensionChanged"),
    ],
};

pub fn server() -> ClusterServer {
    ClusterServer::new(&CLUSTER)
}
