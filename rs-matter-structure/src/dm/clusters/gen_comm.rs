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

pub const ID: ClusterId = 0x0030;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    BreadCrumb = 0x0,
    BasicCommissioningInfo = 0x1,
    RegConfig = 0x2,
    LocationCapability = 0x3,
    SupportsConcurrentConnection = 0x4,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Commands {
    ArmFailsafe = 0x0,
    SetRegulatoryConfig = 0x2,
    CommissioningComplete = 0x4,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "GeneralCommissioning",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::BreadCrumb as _,
            "Breadcrumb",
            Access::RWVA,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::mandatory(
            Attributes::BasicCommissioningInfo as _,
            "BasicCommissioningInfo",
            Access::RV,
            AttrDefault::Null,
        )
        .with_quality(Quality::FIXED.union(Quality::NULLABLE)),
        AttributeSchema::mandatory(
            Attributes::RegConfig as _,
            "RegulatoryConfig",
            Access::RV,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::mandatory(
            Attributes::LocationCapability as _,
            "LocationCapability",
            Access::RV,
            AttrDefault::Uint(2),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::mandatory(
            Attributes::SupportsConcurrentConnection as _,
            "SupportsConcurrentConnection",
            Access::RV,
            AttrDefault::Bool(true),
        )
        .with_quality(Quality::FIXED),
    ],
    commands: &[
        CommandSchema::mandatory(Commands::ArmFailsafe as _, "ArmFailSafe", Some(0x1)),
        CommandSchema::mandatory(
            Commands::SetRegulatoryConfig as _,
            "SetRegulatoryConfig",
            Some(0x3),
        ),
        CommandSchema::mandatory(
            Commands::CommissioningComplete as _,
            "CommissioningComplete",
            Some(0x5),
        ),
    ],
    events: &[],
};

pub fn server() -> ClusterServer {
    ClusterServer::new(&CLUSTER)
}
