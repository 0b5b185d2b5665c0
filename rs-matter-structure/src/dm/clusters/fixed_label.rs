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

use crate::dm::{
    Access, AttrDefault, AttrValue, AttributeSchema, ClusterId, ClusterSchema, ClusterServer,
    Quality,
};
use crate::error::Error;

pub const ID: ClusterId = 0x0040;

pub const ATTR_LABEL_LIST: u32 = 0x0;

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "FixedLabel",
    revision: 1,
    feature_map: 0,
    attributes: &[AttributeSchema::mandatory(
        ATTR_LABEL_LIST,
        "LabelList",
        Access::RV,
        AttrDefault::EmptyList,
    )
    .with_quality(Quality::FIXED)],
    commands: &[],
    events: &[],
};

/// Create a Fixed Label server carrying the given `(label, value)` pairs.
pub fn server(labels: &[(&str, &str)]) -> Result<ClusterServer, Error> {
    let list = labels
        .iter()
        .map(|(label, value)| AttrValue::Struct(vec![(0, (*label).into()), (1, (*value).into())]))
        .collect::<Vec<_>>();

    ClusterServer::new(&CLUSTER).with_attr(ATTR_LABEL_LIST, list)
}
