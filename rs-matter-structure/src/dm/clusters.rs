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

//! Schemas (and where it makes sense, ready-made servers) of the standard clusters
//! hosted by the root, aggregator and bridged endpoints of a node.

pub mod acl;
pub mod adm_comm;
pub mod basic_info;
pub mod bridged_info;
pub mod desc;
pub mod fixed_label;
pub mod gen_comm;
pub mod gen_diag;
pub mod groups;
pub mod grp_key_mgmt;
pub mod identify;
pub mod net_comm;
pub mod noc;
pub mod on_off;
