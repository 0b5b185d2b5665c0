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

//! The Descriptor cluster.
//!
//! Every endpoint hosts one. Its attributes are not configured by the application;
//! they are derived from the endpoint tree by `Node::update_parts_list`.

use strum::FromRepr;

use crate::dm::{
    Access, AttrDefault, AttrValue, AttributeSchema, ClusterId, ClusterSchema, ClusterServer,
    DeviceType, EndptId,
};

pub const ID: ClusterId = 0x001D;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    DeviceTypeList = 0x0,
    ServerList = 0x1,
    ClientList = 0x2,
    PartsList = 0x3,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "Descriptor",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::DeviceTypeList as _,
            "DeviceTypeList",
            Access::RV,
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::ServerList as _,
            "ServerList",
            Access::RV,
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::ClientList as _,
            "ClientList",
            Access::RV,
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::PartsList as _,
            "PartsList",
            Access::RV,
            AttrDefault::EmptyList,
        ),
    ],
    commands: &[],
    events: &[],
};

pub fn server() -> ClusterServer {
    ClusterServer::new(&CLUSTER)
}

/// Encode device types the way the DeviceTypeList attribute carries them
/// (a list of `DeviceTypeStruct { DeviceType: 0, Revision: 1 }`).
pub fn device_type_list(device_types: &[DeviceType]) -> AttrValue {
    AttrValue::List(
        device_types
            .iter()
            .map(|dt| AttrValue::Struct(vec![(0, dt.dtype.into()), (1, dt.drev.into())]))
            .collect(),
    )
}

/// The inverse of `device_type_list`; entries which are not well-formed are skipped.
pub fn parse_device_type_list(value: &AttrValue) -> Vec<DeviceType> {
    value
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| {
            let dtype = u16::try_from(entry.field(0)?.as_uint()?).ok()?;
            let drev = u16::try_from(entry.field(1)?.as_uint()?).ok()?;

            Some(DeviceType { dtype, drev })
        })
        .collect()
}

pub fn parts_list(ids: &[EndptId]) -> AttrValue {
    AttrValue::uint_list(ids.iter().copied())
}
