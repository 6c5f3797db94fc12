// Copyright (c) 2025 - Cowboy AI, Inc.

//! Apstra REST payloads and their mapping onto domain records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Asn, BlueprintId, InterfaceRecord, SystemRecord, VirtualNetworkSummary};
use crate::errors::{CollaboratorError, CollaboratorResult};
use crate::topology::NodeMatch;
use crate::workflow::BlueprintSummary;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct SystemListItem {
    #[serde(default)]
    pub system_id: Option<String>,
}

/// `config-context` responses carry the context as a JSON string
#[derive(Debug, Deserialize)]
pub struct ConfigContextEnvelope {
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigContext {
    pub node_id: String,
    #[serde(default)]
    pub system_tags: Vec<String>,
    #[serde(rename = "bgpService", default)]
    pub bgp_service: Option<BgpService>,
    #[serde(default)]
    pub interface: BTreeMap<String, ContextInterface>,
}

#[derive(Debug, Deserialize)]
pub struct BgpService {
    #[serde(default)]
    pub asn: Option<Asn>,
}

#[derive(Debug, Deserialize)]
pub struct ContextInterface {
    #[serde(rename = "intfName")]
    pub intf_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ConfigContextEnvelope {
    pub fn into_system_record(self) -> CollaboratorResult<SystemRecord> {
        let context: ConfigContext = serde_json::from_str(&self.context)?;
        Ok(context.into())
    }
}

impl From<ConfigContext> for SystemRecord {
    fn from(context: ConfigContext) -> Self {
        SystemRecord {
            node_id: context.node_id,
            tags: context.system_tags,
            interfaces: context
                .interface
                .into_iter()
                .map(|(key, intf)| {
                    (
                        key,
                        InterfaceRecord {
                            name: intf.intf_name,
                            tags: intf.tags,
                        },
                    )
                })
                .collect(),
            asn: context.bgp_service.and_then(|svc| svc.asn),
        }
    }
}

/// Virtual-network listing, an object keyed by VN id
#[derive(Debug, Deserialize)]
pub struct VirtualNetworkList {
    #[serde(default)]
    pub virtual_networks: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct VirtualNetworkListEntry {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

impl VirtualNetworkList {
    /// Summaries in the order the server listed them
    pub fn into_summaries(self) -> CollaboratorResult<Vec<VirtualNetworkSummary>> {
        self.virtual_networks
            .into_iter()
            .map(|(id, value)| -> CollaboratorResult<VirtualNetworkSummary> {
                let entry: VirtualNetworkListEntry = serde_json::from_value(value)?;
                Ok(VirtualNetworkSummary {
                    id,
                    label: entry.label,
                    tags: entry.tags,
                })
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub items: Vec<NodeMatch>,
}

#[derive(Debug, Deserialize)]
pub struct PropertySetItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub property_set_id: Option<String>,
    pub label: String,
}

impl PropertySetItem {
    /// Id used to address the set; `property_set_id` when the listing has one
    pub fn address(&self) -> CollaboratorResult<String> {
        self.property_set_id
            .clone()
            .or_else(|| self.id.clone())
            .ok_or_else(|| {
                CollaboratorError::Decode(format!("property set '{}' has no id", self.label))
            })
    }
}

#[derive(Debug, Serialize)]
pub struct PropertySetPayload<'a> {
    pub label: &'a str,
    pub values: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DeployStatus {
    pub version: u64,
}

#[derive(Debug, Serialize)]
pub struct DeployRequest<'a> {
    pub version: u64,
    pub description: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct BlueprintResponse {
    pub id: BlueprintId,
    #[serde(default)]
    pub label: String,
    pub design: String,
}

impl From<BlueprintResponse> for BlueprintSummary {
    fn from(bp: BlueprintResponse) -> Self {
        BlueprintSummary {
            id: bp.id,
            label: bp.label,
            design: bp.design,
        }
    }
}
