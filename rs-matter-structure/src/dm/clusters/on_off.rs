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

//! The On/Off cluster, with a simple handler that flips the `OnOff` attribute.

use log::info;
use strum::FromRepr;

use crate::dm::{
    Access, AttrDefault, AttrValue, AttributeSchema, ClusterId, ClusterSchema, ClusterServer,
    CommandSchema, InvokeContext, Quality,
};
use crate::error::Error;

pub const ID: ClusterId = 0x0006;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    OnOff = 0x0,
    GlobalSceneControl = 0x4000,
    OnTime = 0x4001,
    OffWaitTime = 0x4002,
    StartUpOnOff = 0x4003,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Commands {
    Off = 0x0,
    On = 0x1,
    Toggle = 0x2,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "OnOff",
    revision: 4,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::OnOff as _,
            "OnOff",
            Access::RV,
            AttrDefault::Bool(false),
        )
        .with_quality(Quality::SCENE.union(Quality::PERSISTENT)),
        AttributeSchema::optional(
            Attributes::GlobalSceneControl as _,
            "GlobalSceneControl",
            Access::RV,
            AttrDefault::Bool(true),
        ),
        AttributeSchema::optional(
            Attributes::OnTime as _,
            "OnTime",
            Access::RWVO,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::optional(
            Attributes::OffWaitTime as _,
            "OffWaitTime",
            Access::RWVO,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::optional(
            Attributes::StartUpOnOff as _,
            "StartUpOnOff",
            Access::RWVM,
            AttrDefault::Null,
        )
        .with_quality(Quality::NULLABLE.union(Quality::PERSISTENT)),
    ],
    commands: &[
        CommandSchema::mandatory(Commands::Off as _, "Off", None),
        CommandSchema::mandatory(Commands::On as _, "On", None),
        CommandSchema::mandatory(Commands::Toggle as _, "Toggle", None),
    ],
    events: &[],
};

/// Create an On/Off server whose commands update the `OnOff` attribute.
pub fn server() -> Result<ClusterServer, Error> {
    ClusterServer::new(&CLUSTER)
        .with_handler(Commands::Off as _, |ctx, _| switch(ctx, Some(false)))?
        .with_handler(Commands::On as _, |ctx, _| switch(ctx, Some(true)))?
        .with_handler(Commands::Toggle as _, |ctx, _| switch(ctx, None))
}

fn switch(ctx: &InvokeContext<'_>, on: Option<bool>) -> Result<Option<AttrValue>, Error> {
    let cluster = ctx.cluster();
    let current = cluster
        .get(Attributes::OnOff as _)?
        .as_bool()
        .unwrap_or(false);
    let on = on.unwrap_or(!current);

    if cluster.set(Attributes::OnOff as _, on)? {
        info!("Endpoint {}: switched {}", ctx.path().endpoint, if on { "on" } else { "off" });
    }

    Ok(None)
}
