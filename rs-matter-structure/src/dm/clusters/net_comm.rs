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

//! The Network Commissioning cluster, in its Ethernet flavour.

use strum::FromRepr;

use crate::dm::{
    Access, AttrDefault, AttributeSchema, ClusterId, ClusterSchema, ClusterServer, Quality,
};

pub const ID: ClusterId = 0x0031;

pub const FEATURE_ETHERNET: u32 = 0x04;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    MaxNetworks = 0x00,
    Networks = 0x01,
    InterfaceEnabled = 0x04,
    LastNetworkingStatus = 0x05,
    LastNetworkID = 0x06,
    LastConnectErrorValue = 0x07,
}

const NULLABLE: Quality = Quality::NULLABLE;

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "NetworkCommissioning",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::MaxNetworks as _,
            "MaxNetworks",
            Access::READ.union(Access::NEED_ADMIN),
            AttrDefault::Uint(1),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::mandatory(
            Attributes::Networks as _,
            "Networks",
            Access::READ.union(Access::NEED_ADMIN),
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::InterfaceEnabled as _,
            "InterfaceEnabled",
            Access::RWVA,
            AttrDefault::Bool(true),
        )
        .with_quality(Quality::PERSISTENT),
        AttributeSchema::mandatory(
            Attributes::LastNetworkingStatus as _,
            "LastNetworkingStatus",
            Access::READ.union(Access::NEED_ADMIN),
            AttrDefault::Null,
        )
        .with_quality(NULLABLE),
        AttributeSchema::mandatory(
            Attributes::LastNetworkID as _,
            "LastNetworkID",
            Access::READ.union(Access::NEED_ADMIN),
            AttrDefault::Null,
        )
        .with_quality(NULLABLE),
        AttributeSchema::mandatory(
            Attributes::LastConnectErrorValue as _,
            "LastConnectErrorValue",
            Access::READ.union(Access::NEED_ADMIN),
            AttrDefault::Null,
        )
        .with_quality(NULLABLE),
    ],
    commands: &[],
    events: &[],
};

pub fn ethernet_server() -> ClusterServer {
    ClusterServer::new(&CLUSTER).with_feature_map(FEATURE_ETHERNET)
}
