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

//! The Bridged Device Basic Information cluster, hosted by every bridged endpoint.

use strum::FromRepr;

use crate::dm::{
    Access, AttrDefault, AttributeSchema, BridgedInfo, ClusterId, ClusterSchema, ClusterServer,
    EventSchema, Quality,
};
use crate::error::Error;

pub const ID: ClusterId = 0x0039;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    VendorName = 0x01,
    VendorId = 0x02,
    ProductName = 0x03,
    NodeLabel = 0x05,
    HardwareVersion = 0x07,
    SoftwareVersion = 0x09,
    SerialNumber = 0x0F,
    Reachable = 0x11,
    UniqueId = 0x12,
}

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "BridgedDeviceBasicInformation",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::optional(
            Attributes::VendorName as _,
            "VendorName",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::optional(
            Attributes::VendorId as _,
            "VendorID",
            Access::RV,
            AttrDefault::Uint(0),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::optional(
            Attributes::ProductName as _,
            "ProductName",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::optional(
            Attributes::NodeLabel as _,
            "NodeLabel",
            Access::RWVM,
            AttrDefault::Str(""),
        ),
        AttributeSchema::optional(
            Attributes::HardwareVersion as _,
            "HardwareVersion",
            Access::RV,
            AttrDefault::Uint(0),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::optional(
            Attributes::SoftwareVersion as _,
            "SoftwareVersion",
            Access::RV,
            AttrDefault::Uint(0),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::optional(
            Attributes::SerialNumber as _,
            "SerialNumber",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(Quality::FIXED),
        AttributeSchema::mandatory(
            Attributes::Reachable as _,
            "Reachable",
            Access::RV,
            AttrDefault::Bool(true),
        ),
        AttributeSchema::optional(
            Attributes::UniqueId as _,
            "UniqueID",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(Quality::FIXED),
    ],
    commands: &[],
    events: &[
        EventSchema::new(0x00, "StartUp"),
        EventSchema::new(0x01, "ShutDown"),
        EventSchema::new(0x03, "ReachableChanged"),
    ],
};

/// Create the Bridged Device Basic Information server of a bridged endpoint.
pub fn server(info: &BridgedInfo) -> Result<ClusterServer, Error> {
    let mut server =
        ClusterServer::new(&CLUSTER).with_attr(Attributes::Reachable as _, info.reachable)?;

    let strings = [
        (Attributes::NodeLabel, &info.node_label),
        (Attributes::VendorName, &info.vendor_name),
        (Attributes::ProductName, &info.product_name),
        (Attributes::SerialNumber, &info.serial_number),
        (Attributes::UniqueId, &info.unique_id),
    ];

    for (attr, value) in strings {
        if let Some(value) = value {
            server = server.with_attr(attr as _, value.as_str())?;
        }
    }

    Ok(server)
}

/// Update an existing Bridged Device Basic Information server from `info`.
///
/// Only values present in `info` are applied; fixed attributes which are not enabled
/// on the server are skipped.
pub fn update(server: &ClusterServer, info: &BridgedInfo) -> Result<(), Error> {
    server.set(Attributes::Reachable as _, info.reachable)?;

    let strings = [
        (Attributes::NodeLabel, &info.node_label),
        (Attributes::VendorName, &info.vendor_name),
        (Attributes::ProductName, &info.product_name),
        (Attributes::SerialNumber, &info.serial_number),
        (Attributes::UniqueId, &info.unique_id),
    ];

    for (attr, value) in strings {
        if let Some(value) = value {
            if server.attribute(attr as _).is_some() {
                server.set(attr as _, value.as_str())?;
            }
        }
    }

    Ok(())
}
