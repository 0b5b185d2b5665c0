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

pub use attribute::*;
pub use cluster::*;
pub use command::*;
pub use dataver::*;
pub use path::*;
pub use schema::*;
pub use value::*;

mod attribute;
mod cluster;
mod command;
mod dataver;
mod path;
mod schema;
mod value;

pub type EndptId = u16;
pub type ClusterId = u32;
pub type AttrId = u32;
pub type CmdId = u32;
pub type EventId = u32;

/// A Matter device type, as advertised in the DeviceTypeList of the Descriptor cluster.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DeviceType {
    pub dtype: u16,
    pub drev: u16,
}

impl DeviceType {
    pub const fn new(dtype: u16, drev: u16) -> Self {
        Self { dtype, drev }
    }
}
