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

use core::cell::RefCell;
use core::fmt;

use bitflags::bitflags;
use strum::FromRepr;

use crate::error::{Error, ErrorCode};

use super::{AttrDefault, AttrId, AttrValue, AttributeSchema};

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Access: u16 {
        const NEED_VIEW = 0x0001;
        const NEED_OPERATE = 0x0002;
        const NEED_MANAGE = 0x0004;
        const NEED_ADMIN = 0x0008;

        const READ = 0x0010;
        const WRITE = 0x0020;
        const FAB_SCOPED = 0x0040;
        const FAB_SENSITIVE = 0x0080;
        const TIMED_ONLY = 0x0100;

        const RV = Self::READ.bits() | Self::NEED_VIEW.bits();
        const RWVO = Self::READ.bits() | Self::WRITE.bits() | Self::NEED_VIEW.bits() | Self::NEED_OPERATE.bits();
        const RWVM = Self::READ.bits() | Self::WRITE.bits() | Self::NEED_VIEW.bits() | Self::NEED_MANAGE.bits();
        const RWVA = Self::READ.bits() | Self::WRITE.bits() | Self::NEED_VIEW.bits() | Self::NEED_ADMIN.bits();
        const RWFA = Self::READ.bits() | Self::WRITE.bits() | Self::FAB_SCOPED.bits() | Self::NEED_ADMIN.bits();
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Quality: u8 {
        const SCENE = 0x01;
        const PERSISTENT = 0x02;
        const FIXED = 0x04;
        const NULLABLE = 0x08;
    }
}

/// The global attributes every cluster server exposes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum GlobalElements {
    ClusterRevision = 0xFFFD,
    FeatureMap = 0xFFFC,
    AttributeList = 0xFFFB,
    AcceptedCommandList = 0xFFF9,
    GeneratedCommandList = 0xFFF8,
}

impl GlobalElements {
    pub const ALL: [GlobalElements; 5] = [
        Self::GeneratedCommandList,
        Self::AcceptedCommandList,
        Self::AttributeList,
        Self::FeatureMap,
        Self::ClusterRevision,
    ];

    pub const fn id(self) -> AttrId {
        self as AttrId
    }

    pub fn is_global(attr: AttrId) -> bool {
        Self::from_repr(attr).is_some()
    }

    pub(crate) const fn schema(self) -> AttributeSchema {
        let (name, default) = match self {
            Self::ClusterRevision => ("ClusterRevision", AttrDefault::Uint(0)),
            Self::FeatureMap => ("FeatureMap", AttrDefault::Uint(0)),
            Self::AttributeList => ("AttributeList", AttrDefault::EmptyList),
            Self::AcceptedCommandList => ("AcceptedCommandList", AttrDefault::EmptyList),
            Self::GeneratedCommandList => ("GeneratedCommandList", AttrDefault::EmptyList),
        };

        AttributeSchema::mandatory(self as AttrId, name, Access::RV, default)
    }
}

/// The server-side instance of a single attribute: its metadata plus its current value.
///
/// The value is interior-mutable, so that command handlers and lifecycle hooks which
/// only get shared access to the cluster can still update it.
pub struct AttributeServer {
    id: AttrId,
    name: &'static str,
    access: Access,
    quality: Quality,
    value: RefCell<AttrValue>,
}

impl AttributeServer {
    pub fn new(schema: &AttributeSchema, value: AttrValue) -> Self {
        Self {
            id: schema.id,
            name: schema.name,
            access: schema.access,
            quality: schema.quality,
            value: RefCell::new(value),
        }
    }

    pub fn id(&self) -> AttrId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn is_global(&self) -> bool {
        GlobalElements::is_global(self.id)
    }

    pub fn is_writable(&self) -> bool {
        self.access.contains(Access::WRITE) && !self.quality.contains(Quality::FIXED)
    }

    pub fn value(&self) -> AttrValue {
        self.value.borrow().clone()
    }

    /// Store a new value, returning whether it differs from the previous one.
    pub(crate) fn set(&self, value: AttrValue) -> Result<bool, Error> {
        if value.is_null() && !self.quality.contains(Quality::NULLABLE) {
            return Err(Error::new_with_details(
                ErrorCode::InvalidData,
                format!("Attribute {} is not nullable", self.name),
            ));
        }

        let mut current = self.value.borrow_mut();
        if *current == value {
            Ok(false)
        } else {
            *current = value;
            Ok(true)
        }
    }
}

impl fmt::Debug for AttributeServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:x}): {:?}", self.name, self.id, self.value.borrow())
    }
}
