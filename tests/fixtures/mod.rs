// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for edge-peering
//!
//! Provides a deterministic reference fabric: two border leaves, two edge
//! firewalls and one peering VN. All UUIDs and timestamps are fixed
//! constants so snapshots and documents are reproducible.
//!
//! # Design Principles
//! - All test data is deterministic (fixed UUIDs, no `Utc::now()`)
//! - Fixtures are the only place that builds snapshots from raw records
//! - Tests adjust fixtures rather than hand-building fabrics

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::BTreeMap;

use edge_peering::domain::{
    FloatingIpBinding, InterfaceRecord, SecurityZoneRecord, SviBinding,
};
use edge_peering::topology::border_to_firewall;
use edge_peering::{
    Asn, BlueprintId, BorderRole, FabricSnapshot, FirewallRole, NodeMatch, SystemRecord,
    VirtualNetworkRecord,
};

// Fixed test UUIDs (UUID v7 format, but deterministic for testing)
pub const REFERENCE_BLUEPRINT_ID: &str = "01934f4a-0001-7000-8000-000000000001";
pub const EDGE_BLUEPRINT_ID: &str = "01934f4a-0002-7000-8000-000000000002";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

pub const BORDER1_ID: &str = "leaf-1";
pub const BORDER2_ID: &str = "leaf-2";
pub const FW1_ID: &str = "fw-1";
pub const FW2_ID: &str = "fw-2";

pub const BORDER1_TO_FW1: &str = "xe-0/0/10";
pub const BORDER1_TO_FW2: &str = "xe-0/0/11";
pub const BORDER2_TO_FW1: &str = "xe-0/0/20";
pub const BORDER2_TO_FW2: &str = "xe-0/0/21";

pub fn reference_blueprint() -> BlueprintId {
    REFERENCE_BLUEPRINT_ID.parse().expect("Invalid UUID in test fixture")
}

pub fn edge_blueprint() -> BlueprintId {
    EDGE_BLUEPRINT_ID.parse().expect("Invalid UUID in test fixture")
}

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

/// A system with the given tags and `(key, name, tags)` interfaces
pub fn system(
    node_id: &str,
    tags: &[&str],
    asn: Option<u32>,
    interfaces: &[(&str, &str, &str)],
) -> SystemRecord {
    SystemRecord {
        node_id: node_id.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        interfaces: interfaces
            .iter()
            .map(|(key, name, tag)| {
                (
                    key.to_string(),
                    InterfaceRecord {
                        name: name.to_string(),
                        tags: vec![tag.to_string()],
                    },
                )
            })
            .collect::<BTreeMap<_, _>>(),
        asn: asn.map(Asn::new),
    }
}

pub fn border1() -> SystemRecord {
    system(
        BORDER1_ID,
        &["border1"],
        Some(65001),
        &[("if-10", BORDER1_TO_FW1, "fw_node1"), ("if-11", BORDER1_TO_FW2, "fw_node2")],
    )
}

pub fn border2() -> SystemRecord {
    system(
        BORDER2_ID,
        &["border2"],
        Some(65002),
        &[("if-20", BORDER2_TO_FW1, "fw_node1"), ("if-21", BORDER2_TO_FW2, "fw_node2")],
    )
}

/// Leaf that is neither border
pub fn server_leaf() -> SystemRecord {
    system("leaf-3", &["server"], Some(65003), &[])
}

/// A graph-query match naming the firewall and its BGP domain
pub fn firewall_match(fw_id: &str, asn: u32) -> NodeMatch {
    serde_json::from_value(json!({
        "fw": {"id": fw_id, "type": "system", "label": fw_id},
        "bgp": {"id": format!("domain-{}", fw_id), "type": "domain", "domain_id": asn}
    }))
    .expect("Invalid graph match in test fixture")
}

/// Peering VN with both SVIs and both floating IPs bound
pub fn peering_vn(id: &str, zone_id: &str, vlan: u16, third_octet: u8) -> VirtualNetworkRecord {
    let addr = |host: u8| Some(format!("10.0.{}.{}/24", third_octet, host));
    VirtualNetworkRecord {
        id: id.to_string(),
        label: Some(format!("{}-label", id)),
        tags: vec!["peer_to_fw".to_string()],
        security_zone_id: zone_id.to_string(),
        reserved_vlan_id: Some(vlan),
        ipv4_subnet: Some(format!("10.0.{}.0/24", third_octet)),
        svi_ips: vec![
            SviBinding {
                system_id: BORDER1_ID.to_string(),
                ipv4_addr: addr(1),
            },
            SviBinding {
                system_id: BORDER2_ID.to_string(),
                ipv4_addr: addr(2),
            },
        ],
        floating_ips: vec![
            FloatingIpBinding {
                ipv4_addr: addr(10),
                generic_system_ids: vec![FW1_ID.to_string()],
            },
            FloatingIpBinding {
                ipv4_addr: addr(11),
                generic_system_ids: vec![FW2_ID.to_string()],
            },
        ],
    }
}

pub fn zone(id: &str, vrf_name: &str) -> SecurityZoneRecord {
    SecurityZoneRecord {
        id: id.to_string(),
        vrf_name: vrf_name.to_string(),
    }
}

/// Snapshot with systems and every border-to-firewall walk, but no VNs
pub fn fabric_without_vns() -> FabricSnapshot {
    FabricSnapshot::new(reference_blueprint(), fixed_timestamp())
        .with_system(border1())
        .with_system(border2())
        .with_system(server_leaf())
        .with_adjacency(
            border_to_firewall(
                BORDER1_ID,
                BorderRole::Border1,
                BORDER1_TO_FW1,
                FirewallRole::FwNode1,
            ),
            vec![firewall_match(FW1_ID, 65010)],
        )
        .with_adjacency(
            border_to_firewall(
                BORDER1_ID,
                BorderRole::Border1,
                BORDER1_TO_FW2,
                FirewallRole::FwNode2,
            ),
            vec![firewall_match(FW2_ID, 65020)],
        )
        .with_adjacency(
            border_to_firewall(
                BORDER2_ID,
                BorderRole::Border2,
                BORDER2_TO_FW1,
                FirewallRole::FwNode1,
            ),
            vec![firewall_match(FW1_ID, 65010)],
        )
        .with_adjacency(
            border_to_firewall(
                BORDER2_ID,
                BorderRole::Border2,
                BORDER2_TO_FW2,
                FirewallRole::FwNode2,
            ),
            vec![firewall_match(FW2_ID, 65020)],
        )
}

/// The reference fabric with the single `CUSTOMER_A` VN on VLAN 100
pub fn customer_a_fabric() -> FabricSnapshot {
    fabric_without_vns()
        .with_virtual_network(peering_vn("vn-100", "sz-a", 100, 0))
        .with_security_zone(zone("sz-a", "CUSTOMER_A"))
}

/// The document `customer_a_fabric` must synthesize to
pub fn customer_a_document() -> serde_json::Value {
    json!({
        "asn": {"leaf1": 65001, "leaf2": 65002, "fw_node1": 65010, "fw_node2": 65020},
        "vrfs": [
            {
                "name": "CUSTOMER_A",
                "vlan_id": 100,
                "prefix_bits": "24",
                "fw1_ip4": "10.0.0.10",
                "fw2_ip4": "10.0.0.11",
                "leaf1_ip4": "10.0.0.1",
                "leaf2_ip4": "10.0.0.2"
            }
        ]
    })
}
