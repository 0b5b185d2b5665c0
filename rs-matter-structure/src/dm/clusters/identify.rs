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
use crate::error::{Error, ErrorCode};

pub const ID: ClusterId = 0x0003;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    IdentifyTime = 0x0,
    IdentifyType = 0x1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Commands {
    Identify = 0x0,
    TriggerEffect = 0x40,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u8)]
pub enum IdentifyType {
    None = 0,
    LightOutput = 1,
    VisibleIndicator = 2,
    AudibleBeep = 3,
    Display = 4,
    Actuator = 5,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "Identify",
    revision: 4,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::IdentifyTime as _,
            "IdentifyTime",
            Access::RWVO,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::mandatory(
            Attributes::IdentifyType as _,
            "IdentifyType",
            Access::RV,
            AttrDefault::Uint(IdentifyType::None as _),
        ),
    ],
    commands: &[
        CommandSchema::mandatory(Commands::Identify as _, "Identify", None),
        CommandSchema::optional(Commands::TriggerEffect as _, "TriggerEffect", None),
    ],
    events: &[],
};

/// Create an Identify server; the `Identify` command stores the requested time.
pub fn server(identify_type: IdentifyType) -> Result<ClusterServer, Error> {
    ClusterServer::new(&CLUSTER)
        .with_attr(Attributes::IdentifyType as _, identify_type as u8)?
        .with_handler(Commands::Identify as _, |ctx, request| {
            let time = request
                .field(0)
                .and_then(|time| time.as_uint())
                .ok_or(ErrorCode::InvalidCommand)?;

            ctx.cluster().set(Attributes::IdentifyTime as _, time)?;

            Ok(None)
        })
}
