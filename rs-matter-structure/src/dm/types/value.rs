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

use core::fmt::{self, Debug, Formatter};

/// The value of an attribute, or the payload of a command request/response.
///
/// Structures are encoded as a list of `(context tag, value)` pairs, in tag order.
#[derive(PartialEq, Clone)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Uint(u64),
    Int(i64),
    Utf8(String),
    Octets(Vec<u8>),
    List(Vec<AttrValue>),
    Struct(Vec<(u8, AttrValue)>),
}

impl AttrValue {
    pub const fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Uint(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Return the field with the given context tag, if this is a structure.
    pub fn field(&self, tag: u8) -> Option<&AttrValue> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(t, _)| *t == tag).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Convenience for the common "list of unsigned integers" shape
    /// (e.g. the PartsList and ServerList attributes).
    pub fn uint_list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<u64>,
    {
        Self::List(items.into_iter().map(|i| Self::Uint(i.into())).collect())
    }

    /// The inverse of `uint_list`; `None` if this is not a list of unsigned integers.
    pub fn to_uint_vec(&self) -> Option<Vec<u64>> {
        self.as_list()?.iter().map(AttrValue::as_uint).collect()
    }
}

impl Debug for AttrValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{:?}", v),
            Self::Uint(v) => write!(f, "{:?}", v),
            Self::Int(v) => write!(f, "{:?}", v),
            Self::Utf8(v) => write!(f, "{:?}", v),
            Self::Octets(v) => write!(f, "octets[{}]", v.len()),
            Self::List(v) => f.debug_list().entries(v.iter()).finish(),
            Self::Struct(fields) => {
                let mut s = f.debug_map();
                for (tag, value) in fields {
                    s.entry(tag, value);
                }
                s.finish()
            }
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! from_uint {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                fn from(value: $t) -> Self {
                    Self::Uint(value as u64)
                }
            }
        )*
    };
}

from_uint!(u8, u16, u32, u64);

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Utf8(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Utf8(value)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(value: Vec<AttrValue>) -> Self {
        Self::List(value)
    }
}
