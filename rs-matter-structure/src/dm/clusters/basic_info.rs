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

//! The Basic Information cluster of the root endpoint.
//!
//! Besides describing the node, its `UniqueID` and `SerialNumber` attributes give the root
//! endpoint the identity used as the prefix of all endpoint-id storage keys.

use strum::FromRepr;

use crate::dm::{
    Access, AttrDefault, AttributeSchema, ClusterId, ClusterSchema, ClusterServer, Quality,
};
use crate::error::Error;

pub const ID: ClusterId = 0x0028;

/// The default Matter Data Model revision
pub const DEFAULT_DATA_MODEL_REVISION: u16 = 17;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    DataModelRevision = 0x00,
    VendorName = 0x01,
    VendorId = 0x02,
    ProductName = 0x03,
    ProductId = 0x04,
    NodeLabel = 0x05,
    Location = 0x06,
    HardwareVersion = 0x07,
    HardwareVersionString = 0x08,
    SoftwareVersion = 0x09,
    SoftwareVersionString = 0x0A,
    SerialNumber = 0x0F,
    Reachable = 0x11,
    UniqueId = 0x12,
    CapabilityMinima = 0x13,
}

const FIXED: Quality = Quality::FIXED;

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "BasicInformation",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::DataModelRevision as _,
            "DataModelRevision",
            Access::RV,
            AttrDefault::Uint(DEFAULT_DATA_MODEL_REVISION as _),
        )
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::VendorName as _,
            "VendorName",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::VendorId as _,
            "VendorID",
            Access::RV,
            AttrDefault::Uint(0),
        )
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::ProductName as _,
            "ProductName",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::ProductId as _,
            "ProductID",
            Access::RV,
            AttrDefault::Uint(0),
        )
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::NodeLabel as _,
            "NodeLabel",
            Access::RWVM,
            AttrDefault::Str(""),
        )
        .with_quality(Quality::PERSISTENT),
        AttributeSchema::mandatory(
            Attributes::Location as _,
            "Location",
            Access::RWVA,
            AttrDefault::Str("XX"),
        )
        .with_quality(Quality::PERSISTENT),
        AttributeSchema::mandatory(
            Attributes::HardwareVersion as _,
            "HardwareVersion",
            Access::RV,
            AttrDefault::Uint(0),
        )
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::HardwareVersionString as _,
            "HardwareVersionString",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::SoftwareVersion as _,
            "SoftwareVersion",
            Access::RV,
            AttrDefault::Uint(0),
        )
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::SoftwareVersionString as _,
            "SoftwareVersionString",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(FIXED),
        AttributeSchema::optional(
            Attributes::SerialNumber as _,
            "SerialNumber",
            Access::RV,
            AttrDefault::Str(""),
        )
        .with_quality(FIXED),
        AttributeSchema::optional(
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
        .with_quality(FIXED),
        AttributeSchema::mandatory(
            Attributes::CapabilityMinima as _,
            "CapabilityMinima",
            Access::RV,
            AttrDefault::Null,
        )
        .with_quality(Quality::FIXED.union(Quality::NULLABLE)),
    ],
    commands: &[],
    events: &[],
};

/// Static information about the node, published through the Basic Information cluster.
#[derive(Debug, Clone)]
pub struct BasicInfoConfig<'a> {
    pub vendor_name: &'a str,
    pub vid: u16,
    pub product_name: &'a str,
    pub pid: u16,
    pub hw_ver: u16,
    pub hw_ver_str: &'a str,
    pub sw_ver: u32,
    pub sw_ver_str: &'a str,
    /// Serial number; empty if the node does not have one
    pub serial_no: &'a str,
    /// Unique ID; empty if the node does not have one
    pub unique_id: &'a str,
    /// The initial value of the NodeLabel attribute
    pub device_name: &'a str,
}

impl Default for BasicInfoConfig<'_> {
    fn default() -> Self {
        Self {
            vendor_name: "Test vendor",
            vid: 0xFFF1,
            product_name: "Test product",
            pid: 0x8000,
            hw_ver: 1,
            hw_ver_str: "1",
            sw_ver: 1,
            sw_ver_str: "1",
            serial_no: "",
            unique_id: "",
            device_name: "",
        }
    }
}

/// Create the Basic Information server of a root endpoint.
pub fn server(config: &BasicInfoConfig<'_>) -> Result<ClusterServer, Error> {
    let mut server = ClusterServer::new(&CLUSTER)
        .with_attr(Attributes::VendorName as _, config.vendor_name)?
        .with_attr(Attributes::VendorId as _, config.vid)?
        .with_attr(Attributes::ProductName as _, config.product_name)?
        .with_attr(Attributes::ProductId as _, config.pid)?
        .with_attr(Attributes::NodeLabel as _, config.device_name)?
        .with_attr(Attributes::HardwareVersion as _, config.hw_ver)?
        .with_attr(Attributes::HardwareVersionString as _, config.hw_ver_str)?
        .with_attr(Attributes::SoftwareVersion as _, config.sw_ver)?
        .with_attr(Attributes::SoftwareVersionString as _, config.sw_ver_str)?;

    if !config.serial_no.is_empty() {
        server = server.with_attr(Attributes::SerialNumber as _, config.serial_no)?;
    }

    if !config.unique_id.is_empty() {
        server = server.with_attr(Attributes::UniqueId as _, config.unique_id)?;
    }

    Ok(server)
}
