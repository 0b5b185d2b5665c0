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
    EventSchema,
};

pub const ID: ClusterId = 0x0033;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    NetworkInterfaces = 0x00,
    RebootCount = 0x01,
    UpTime = 0x02,
    TestEventTriggersEnabled = 0x08,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Commands {
    TestEventTrigger = 0x0,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "GeneralDiagnostics",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::NetworkInterfaces as _,
            "NetworkInterfaces",
            Access::RV,
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::RebootCount as _,
            "RebootCount",
            Access::RV,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::optional(
            Attributes::UpTime as _,
            "UpTime",
            Access::RV,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::mandatory(
            Attributes::TestEventTriggersEnabled as _,
            "TestEventTriggersEnabled",
            Access::RV,
            AttrDefault::Bool(false),
        ),
    ],
    commands: &[CommandSchema::mandatory(
        Commands::TestEventTrigger as _,
        "TestEventTrigger",
        None,
    )],
    events: &[EventSchema::new(0x03, "BootReason")],
};

pub fn server() -> ClusterServer {
    ClusterServer::new(&CLUSTER)
}
