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

//! The Matter data model: endpoints, cluster servers and the structure engine tying them together.

pub use catalog::*;
pub use endpoint::*;
pub use ids::*;
pub use node::*;
pub use structure::*;
pub use tree::*;
pub use types::*;

pub mod catalog;
pub mod clusters;
pub mod devices;
pub mod endpoint;
pub mod ids;
pub mod node;
pub mod structure;
pub mod tree;
pub mod types;

/// The id of the root endpoint of every Matter node.
pub const ROOT_ENDPOINT_ID: EndptId = 0;
