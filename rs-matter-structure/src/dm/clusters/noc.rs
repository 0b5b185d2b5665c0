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

//! The Operational Credentials cluster.

use strum::FromRepr;

use crate::dm::{
    Access, AttrDefault, AttributeSchema, ClusterId, ClusterSchema, ClusterServer, CommandSchema,
};

pub const ID: ClusterId = 0x003E;

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Attributes {
    NOCs = 0x0,
    Fabrics = 0x1,
    SupportedFabrics = 0x2,
    CommissionedFabrics = 0x3,
    TrustedRootCerts = 0x4,
    CurrentFabricIndex = 0x5,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum Commands {
    AttReq = 0x00,
    CertChainReq = 0x02,
    CSRReq = 0x04,
    AddNOC = 0x06,
    UpdateNOC = 0x07,
    UpdateFabricLabel = 0x09,
    RemoveFabric = 0x0a,
    AddTrustedRootCert = 0x0b,
}

const NOC_RESPONSE: Option<u32> = Some(0x08);

pub const CLUSTER: ClusterSchema = ClusterSchema {
    id: ID,
    name: "OperationalCredentials",
    revision: 1,
    feature_map: 0,
    attributes: &[
        AttributeSchema::mandatory(
            Attributes::NOCs as _,
            "NOCs",
            Access::READ
                .union(Access::NEED_ADMIN)
                .union(Access::FAB_SCOPED)
                .union(Access::FAB_SENSITIVE),
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::Fabrics as _,
            "Fabrics",
            Access::RV.union(Access::FAB_SCOPED),
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::SupportedFabrics as _,
            "SupportedFabrics",
            Access::RV,
            AttrDefault::Uint(5),
        ),
        AttributeSchema::mandatory(
            Attributes::CommissionedFabrics as _,
            "CommissionedFabrics",
            Access::RV,
            AttrDefault::Uint(0),
        ),
        AttributeSchema::mandatory(
            Attributes::TrustedRootCerts as _,
            "TrustedRootCertificates",
            Access::RV,
            AttrDefault::EmptyList,
        ),
        AttributeSchema::mandatory(
            Attributes::CurrentFabricIndex as _,
            "CurrentFabricIndex",
            Access::RV,
            AttrDefault::Uint(0),
        ),
    ],
    commands: &[
        CommandSchema::mandatory(Commands::AttReq as _, "AttestationRequest", Some(0x01)),
        CommandSchema::mandatory(
            Commands::CertChainReq as _,
            "CertificateChainRequest",
            Some(0x03),
        ),
        CommandSchema::mandatory(Commands::CSRReq as _, "CSRRequest", Some(0x05)),
        CommandSchema::mandatory(Commands::AddNOC as _, "AddNOC", NOC_RESPONSE),
        CommandSchema::mandatory(Commands::UpdateNOC as _, "UpdateNOC", NOC_RESPONSE),
        CommandSchema::mandatory(
            Commands::UpdateFabricLabel as _,
            "UpdateFabricLabel",
            NOC_RESPONSE,
        ),
        CommandSchema::mandatory(Commands::RemoveFabric as _, "RemoveFabric", NOC_RESPONSE),
        CommandSchema::mandatory(
            Commands::AddTrustedRootCert as _,
            "AddTrustedRootCertificate",
            None,
        ),
    ],
    events: &[],
};

pub fn server() -> ClusterServer {
    ClusterServer::new(&CLUSTER)
}
