// Copyright (c) 2025 - Cowboy AI, Inc.

//! Peer property document and its publication
//!
//! [`PeerPropertyDocument`] is the single artifact of synthesis. Its JSON
//! form is the `values` of the property set the edge fabric's templates
//! read:
//!
//! ```text
//! {
//!   "asn":  { "leaf1": 65001, "leaf2": 65002, "fw_node1": 65010, "fw_node2": 65020 },
//!   "vrfs": [ { "name": "CUSTOMER_A", "vlan_id": 100, "prefix_bits": "24",
//!               "fw1_ip4": "10.0.0.10", "fw2_ip4": "10.0.0.11",
//!               "leaf1_ip4": "10.0.0.1", "leaf2_ip4": "10.0.0.2" } ]
//! }
//! ```
//!
//! `vlan_id` is `null` for a VN without a reserved VLAN.
//!
//! Publication is create-or-replace by label through a [`PropertySetStore`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::info;

use crate::domain::{Asn, BlueprintId, VlanId};
use crate::errors::CollaboratorResult;

/// ASN of each peer, keyed the way the edge templates expect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnMap {
    pub leaf1: Asn,
    pub leaf2: Asn,
    pub fw_node1: Asn,
    pub fw_node2: Asn,
}

/// BGP peering parameters of one VRF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfPeeringEntry {
    pub name: String,
    /// `null` when the VN has no reserved VLAN
    pub vlan_id: Option<VlanId>,
    #[serde(with = "prefix_string")]
    pub prefix_bits: u8,
    #[serde(with = "blank_ipv4")]
    pub fw1_ip4: Option<Ipv4Addr>,
    #[serde(with = "blank_ipv4")]
    pub fw2_ip4: Option<Ipv4Addr>,
    #[serde(with = "blank_ipv4")]
    pub leaf1_ip4: Option<Ipv4Addr>,
    #[serde(with = "blank_ipv4")]
    pub leaf2_ip4: Option<Ipv4Addr>,
}

/// Field of a peering entry that may be left unbound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeerSlot {
    Vlan,
    Fw1,
    Fw2,
    Leaf1,
    Leaf2,
}

impl fmt::Display for PeerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeerSlot::Vlan => "vlan_id",
            PeerSlot::Fw1 => "fw1_ip4",
            PeerSlot::Fw2 => "fw2_ip4",
            PeerSlot::Leaf1 => "leaf1_ip4",
            PeerSlot::Leaf2 => "leaf2_ip4",
        })
    }
}

/// An entry was emitted with a null VLAN or empty address slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialBindingWarning {
    pub vn_id: String,
    pub vrf_name: String,
    pub missing: Vec<PeerSlot>,
}

impl fmt::Display for PartialBindingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<String> = self.missing.iter().map(ToString::to_string).collect();
        write!(
            f,
            "VRF {} (virtual network {}) has no binding for {}",
            self.vrf_name,
            self.vn_id,
            slots.join(", ")
        )
    }
}

/// The synthesized property-set document
///
/// Warnings travel with the value but are not part of its JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerPropertyDocument {
    pub asn: AsnMap,
    pub vrfs: Vec<VrfPeeringEntry>,
    #[serde(skip)]
    pub warnings: Vec<PartialBindingWarning>,
}

impl PeerPropertyDocument {
    /// JSON `values` payload for the property-set store
    pub fn to_values(&self) -> serde_json::Value {
        // Only derived Serialize impls over plain fields; cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

mod blank_ipv4 {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::net::Ipv4Addr;

    pub fn serialize<S: Serializer>(
        addr: &Option<Ipv4Addr>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match addr {
            Some(addr) => serializer.collect_str(addr),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Ipv4Addr>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

mod prefix_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bits: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(bits)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.parse::<u8>() {
            Ok(bits) if bits <= 32 => Ok(bits),
            _ => Err(serde::de::Error::custom(format!("invalid IPv4 prefix length '{raw}'"))),
        }
    }
}

/// A property set as listed by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySetSummary {
    pub id: String,
    pub label: String,
}

/// Property-set persistence in the edge fabric
#[async_trait]
pub trait PropertySetStore: Send + Sync {
    async fn list_property_sets(
        &self,
        blueprint: &BlueprintId,
    ) -> CollaboratorResult<Vec<PropertySetSummary>>;

    /// Create a property set; returns its id
    async fn create_property_set(
        &self,
        blueprint: &BlueprintId,
        label: &str,
        values: &serde_json::Value,
    ) -> CollaboratorResult<String>;

    async fn replace_property_set(
        &self,
        blueprint: &BlueprintId,
        id: &str,
        label: &str,
        values: &serde_json::Value,
    ) -> CollaboratorResult<()>;
}

/// What [`publish_property_set`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created { id: String },
    Replaced { id: String },
}

/// Create the property set named `label`, or replace it if one exists
pub async fn publish_property_set<S>(
    store: &S,
    blueprint: &BlueprintId,
    label: &str,
    document: &PeerPropertyDocument,
) -> CollaboratorResult<PublishOutcome>
where
    S: PropertySetStore + ?Sized,
{
    let values = document.to_values();
    let existing = store
        .list_property_sets(blueprint)
        .await?
        .into_iter()
        .find(|ps| ps.label == label);

    match existing {
        Some(ps) => {
            store
                .replace_property_set(blueprint, &ps.id, label, &values)
                .await?;
            info!(
                "Replaced property set '{}' ({}) in blueprint {}",
                label, ps.id, blueprint
            );
            Ok(PublishOutcome::Replaced { id: ps.id })
        }
        None => {
            let id = store.create_property_set(blueprint, label, &values).await?;
            info!(
                "Created property set '{}' ({}) in blueprint {}",
                label, id, blueprint
            );
            Ok(PublishOutcome::Created { id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn entry() -> VrfPeeringEntry {
        VrfPeeringEntry {
            name: "CUSTOMER_A".into(),
            vlan_id: Some(VlanId::new(100).unwrap()),
            prefix_bits: 24,
            fw1_ip4: Some(Ipv4Addr::new(10, 0, 0, 10)),
            fw2_ip4: None,
            leaf1_ip4: Some(Ipv4Addr::new(10, 0, 0, 1)),
            leaf2_ip4: Some(Ipv4Addr::new(10, 0, 0, 2)),
        }
    }

    #[test]
    fn test_entry_wire_shape() {
        assert_eq!(
            serde_json::to_value(entry()).unwrap(),
            json!({
                "name": "CUSTOMER_A",
                "vlan_id": 100,
                "prefix_bits": "24",
                "fw1_ip4": "10.0.0.10",
                "fw2_ip4": "",
                "leaf1_ip4": "10.0.0.1",
                "leaf2_ip4": "10.0.0.2"
            })
        );
    }

    #[test]
    fn test_entry_field_order_is_stable() {
        let text = serde_json::to_string(&entry()).unwrap();
        let name_at = text.find("\"name\"").unwrap();
        let vlan_at = text.find("\"vlan_id\"").unwrap();
        let leaf2_at = text.find("\"leaf2_ip4\"").unwrap();
        assert!(name_at < vlan_at && vlan_at < leaf2_at);
    }

    #[test]
    fn test_existing_values_parse_back() {
        let parsed: VrfPeeringEntry = serde_json::from_value(json!({
            "name": "CUSTOMER_A", "vlan_id": 100, "prefix_bits": "24",
            "fw1_ip4": "10.0.0.10", "fw2_ip4": "",
            "leaf1_ip4": "10.0.0.1", "leaf2_ip4": "10.0.0.2"
        }))
        .unwrap();
        assert_eq!(parsed, entry());

        let bad = serde_json::from_value::<VrfPeeringEntry>(json!({
            "name": "X", "vlan_id": 100, "prefix_bits": "40",
            "fw1_ip4": "", "fw2_ip4": "", "leaf1_ip4": "", "leaf2_ip4": ""
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_warnings_are_not_serialized() {
        let doc = PeerPropertyDocument {
            asn: AsnMap {
                leaf1: Asn::new(65001),
                leaf2: Asn::new(65002),
                fw_node1: Asn::new(65010),
                fw_node2: Asn::new(65020),
            },
            vrfs: vec![entry()],
            warnings: vec![PartialBindingWarning {
                vn_id: "vn-1".into(),
                vrf_name: "CUSTOMER_A".into(),
                missing: vec![PeerSlot::Fw2],
            }],
        };

        let values = doc.to_values();
        assert!(values.get("warnings").is_none());
        assert_eq!(values["asn"]["fw_node2"], json!(65020));
        assert!(!doc.is_complete());
        assert_eq!(
            doc.warnings[0].to_string(),
            "VRF CUSTOMER_A (virtual network vn-1) has no binding for fw2_ip4"
        );
    }

    struct UnreachableStore;

    #[async_trait]
    impl PropertySetStore for UnreachableStore {
        async fn list_property_sets(
            &self,
            _: &BlueprintId,
        ) -> CollaboratorResult<Vec<PropertySetSummary>> {
            Err(crate::errors::CollaboratorError::Http("connection refused".into()))
        }

        async fn create_property_set(
            &self,
            _: &BlueprintId,
            _: &str,
            _: &serde_json::Value,
        ) -> CollaboratorResult<String> {
            unreachable!("listing fails first")
        }

        async fn replace_property_set(
            &self,
            _: &BlueprintId,
            _: &str,
            _: &str,
            _: &serde_json::Value,
        ) -> CollaboratorResult<()> {
            unreachable!("listing fails first")
        }
    }

    #[test]
    fn test_publish_propagates_listing_failure() {
        let doc = PeerPropertyDocument {
            asn: AsnMap {
                leaf1: Asn::new(1),
                leaf2: Asn::new(2),
                fw_node1: Asn::new(3),
                fw_node2: Asn::new(4),
            },
            vrfs: Vec::new(),
            warnings: Vec::new(),
        };
        let blueprint: BlueprintId = "01934f4a-0002-7000-8000-000000000002".parse().unwrap();

        let result = tokio_test::block_on(publish_property_set(
            &UnreachableStore,
            &blueprint,
            "peer_properties",
            &doc,
        ));
        assert!(matches!(result, Err(crate::errors::CollaboratorError::Http(_))));
    }
}
