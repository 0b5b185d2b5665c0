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

pub const ID: ClusterId = 0x003C;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    WindowStatus = 0x0,
    AdminFabricIndex = 0x1,
    AdminVendorId = 0x2,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Commands {
    OpenCommWindow = 0x0,
    OpenBasicCommWindow = 0x1,
    RevokeComm = 0x2,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "AdministratorCommissioning",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::WindowStatus as _,
            "WindowStatus",
            Access::RV,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::mandatory(
            Attributes::AdminFabricIndex as _,
            "AdminFabricIndex",
            Access::RV,
            AttrDefault::Null,
        )
        .with_quality(Quality::NULLABLE),
        AttributeSchema::mandatory(
            Attributes::AdminVendorId as _,
            "AdminVendorId",
            Access::RV,
            AttrDefault::Null,
        )
        .with_quality(Quality::NULLABLE),
    ],
    commands: &[
        CommandSchema::mandatory(
            Commands::OpenCommWindow as _,
            "OpenCommissioningWindow",
            None,
        ),
        CommandSchema::optional(
            Commands::OpenBasicCommWindow as _,
            "OpenBasicCommissioningWindow",
            None,
        ),
        CommandSchema::mandatory(Commands::RevokeComm as _, "RevokeCommissioning", None),
    ],
    events: &[],
};

pub fn server() -> ClusterServer {
    ClusterServer::new(&CLUSTER)
}
