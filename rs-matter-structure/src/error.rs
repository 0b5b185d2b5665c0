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

use core::fmt;

use std::borrow::Cow;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorCode {
    AttributeNotFound,
    ClusterNotFound,
    CommandNotFound,
    EndpointNotFound,
    Duplicate,
    HookFailed,
    InvalidAction,
    InvalidCommand,
    InvalidData,
    InvalidState,
    NoHandler,
    ResourceExhausted,
    StorageFailure,
    UnsupportedAccess,
    UnsupportedWrite,
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

pub struct Error {
    code: ErrorCode,
    details: Option<Cow<'static, str>>,
}

impl Error {
    pub const fn new(code: ErrorCode) -> Self {
        Self {
            code,
            details: None,
        }
    }

    /// Create an error which carries a human readable explanation next to its code.
    pub fn new_with_details<D>(code: ErrorCode, details: D) -> Self
    where
        D: Into<Cow<'static, str>>,
    {
        Self {
            code,
            details: Some(details.into()),
        }
    }

    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error::{}", self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{:?}: {}", self.code(), details),
            None => write!(f, "{:?}", self.code()),
        }
    }
}

impl std::error::Error for Error {}
