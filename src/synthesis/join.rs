// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Join Engine
//!
//! For each firewall-facing virtual network, joins the VN record, its
//! security zone, the border leaves' SVI addresses and the firewalls'
//! floating IPs into one [`VrfPeeringEntry`].
//!
//! Missing bindings are tolerated: the slot stays empty (a VN without a
//! reserved VLAN gets a null `vlan_id`) and a [`PartialBindingWarning`] is
//! produced for the entry. Missing records and malformed values are fatal.

use std::net::Ipv4Addr;

use crate::domain::{
    BlueprintId, BorderPair, FirewallPair, IpAddressWithCidr, VirtualNetworkRecord,
    VirtualNetworkSummary, VlanId,
};
use crate::errors::{RecordKind, SynthesisError, SynthesisResult};
use crate::property_set::{PartialBindingWarning, PeerSlot, VrfPeeringEntry};
use crate::snapshot::FabricSnapshot;

/// Ids of the VNs tagged `marker`, in discovery order
pub fn eligible_virtual_networks(vns: &[VirtualNetworkSummary], marker: &str) -> Vec<String> {
    vns.iter()
        .filter(|vn| vn.has_tag(marker))
        .map(|vn| vn.id.clone())
        .collect()
}

/// Entries built by the join, in input order, with their warnings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinOutput {
    pub entries: Vec<VrfPeeringEntry>,
    pub warnings: Vec<PartialBindingWarning>,
}

/// Build one peering entry per VN id, preserving the order of `vn_ids`
pub fn build_vrf_entries(
    snapshot: &FabricSnapshot,
    vn_ids: &[String],
    borders: &BorderPair,
    firewalls: &FirewallPair,
) -> SynthesisResult<JoinOutput> {
    let mut output = JoinOutput::default();

    for vn_id in vn_ids {
        let (entry, missing) = join_one(snapshot, vn_id, borders, firewalls)?;
        if !missing.is_empty() {
            output.warnings.push(PartialBindingWarning {
                vn_id: vn_id.clone(),
                vrf_name: entry.name.clone(),
                missing,
            });
        }
        output.entries.push(entry);
    }

    Ok(output)
}

fn join_one(
    snapshot: &FabricSnapshot,
    vn_id: &str,
    borders: &BorderPair,
    firewalls: &FirewallPair,
) -> SynthesisResult<(VrfPeeringEntry, Vec<PeerSlot>)> {
    let fabric_id = snapshot.fabric_id;
    let vn = snapshot
        .vn_details
        .get(vn_id)
        .ok_or_else(|| SynthesisError::MissingRecord {
            fabric_id,
            kind: RecordKind::VirtualNetwork,
            id: vn_id.to_string(),
        })?;
    let zone = snapshot
        .security_zones
        .get(&vn.security_zone_id)
        .ok_or_else(|| SynthesisError::MissingRecord {
            fabric_id,
            kind: RecordKind::SecurityZone,
            id: vn.security_zone_id.clone(),
        })?;

    let vlan_id = vlan_of(&fabric_id, vn)?;
    let prefix_bits = prefix_bits_of(&fabric_id, vn)?;

    let leaf1_ip4 = svi_address(&fabric_id, vn, borders.border1.node_id())?;
    let leaf2_ip4 = svi_address(&fabric_id, vn, borders.border2.node_id())?;
    let fw1_ip4 = floating_address(&fabric_id, vn, firewalls.fw1.node_id())?;
    let fw2_ip4 = floating_address(&fabric_id, vn, firewalls.fw2.node_id())?;

    let missing = [
        (PeerSlot::Vlan, vlan_id.is_none()),
        (PeerSlot::Fw1, fw1_ip4.is_none()),
        (PeerSlot::Fw2, fw2_ip4.is_none()),
        (PeerSlot::Leaf1, leaf1_ip4.is_none()),
        (PeerSlot::Leaf2, leaf2_ip4.is_none()),
    ]
    .into_iter()
    .filter(|(_, unbound)| *unbound)
    .map(|(slot, _)| slot)
    .collect();

    let entry = VrfPeeringEntry {
        name: zone.vrf_name.clone(),
        vlan_id,
        prefix_bits,
        fw1_ip4,
        fw2_ip4,
        leaf1_ip4,
        leaf2_ip4,
    };
    Ok((entry, missing))
}

fn invalid(
    fabric_id: &BlueprintId,
    vn: &VirtualNetworkRecord,
    field: &'static str,
    reason: String,
) -> SynthesisError {
    SynthesisError::InvalidRecord {
        fabric_id: *fabric_id,
        kind: RecordKind::VirtualNetwork,
        id: vn.id.clone(),
        field,
        reason,
    }
}

/// Reserved VLAN of the VN; absent is unbound, out of range is fatal
fn vlan_of(fabric_id: &BlueprintId, vn: &VirtualNetworkRecord) -> SynthesisResult<Option<VlanId>> {
    vn.reserved_vlan_id
        .map(|raw| {
            VlanId::new(raw).map_err(|e| invalid(fabric_id, vn, "reserved_vlan_id", e.to_string()))
        })
        .transpose()
}

fn prefix_bits_of(fabric_id: &BlueprintId, vn: &VirtualNetworkRecord) -> SynthesisResult<u8> {
    let subnet = vn
        .ipv4_subnet
        .as_deref()
        .ok_or_else(|| invalid(fabric_id, vn, "ipv4_subnet", "no IPv4 subnet".to_string()))?;
    let parsed = IpAddressWithCidr::new(subnet)
        .map_err(|e| invalid(fabric_id, vn, "ipv4_subnet", e.to_string()))?;
    if !parsed.is_ipv4() {
        return Err(invalid(fabric_id, vn, "ipv4_subnet", format!("{subnet} is not IPv4")));
    }
    parsed.prefix_length().ok_or_else(|| {
        invalid(fabric_id, vn, "ipv4_subnet", format!("{subnet} has no prefix length"))
    })
}

fn bare_ipv4(
    fabric_id: &BlueprintId,
    vn: &VirtualNetworkRecord,
    field: &'static str,
    raw: &str,
) -> SynthesisResult<Ipv4Addr> {
    IpAddressWithCidr::new(raw)
        .and_then(|addr| addr.ipv4())
        .map_err(|e| invalid(fabric_id, vn, field, e.to_string()))
}

/// First SVI address of `system_id`; bindings without an address are skipped
fn svi_address(
    fabric_id: &BlueprintId,
    vn: &VirtualNetworkRecord,
    system_id: &str,
) -> SynthesisResult<Option<Ipv4Addr>> {
    vn.svi_ips
        .iter()
        .filter(|svi| svi.system_id == system_id)
        .find_map(|svi| svi.ipv4_addr.as_deref())
        .map(|raw| bare_ipv4(fabric_id, vn, "svi_ips", raw))
        .transpose()
}

/// First floating IP owned by `system_id`
fn floating_address(
    fabric_id: &BlueprintId,
    vn: &VirtualNetworkRecord,
    system_id: &str,
) -> SynthesisResult<Option<Ipv4Addr>> {
    vn.floating_ips
        .iter()
        .filter(|fip| fip.owner() == Some(system_id))
        .find_map(|fip| fip.ipv4_addr.as_deref())
        .map(|raw| bare_ipv4(fabric_id, vn, "floating_ips", raw))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Asn, BorderContext, BorderRole, FirewallContext, FirewallRole, FloatingIpBinding,
        SecurityZoneRecord, SviBinding,
    };
    use chrono::{TimeZone, Utc};

    fn fabric() -> BlueprintId {
        "01934f4a-0001-7000-8000-000000000001".parse().unwrap()
    }

    fn pairs() -> (BorderPair, FirewallPair) {
        let borders = BorderPair {
            border1: BorderContext::new(BorderRole::Border1, "leaf-1", Asn::new(65001), None, None),
            border2: BorderContext::new(BorderRole::Border2, "leaf-2", Asn::new(65002), None, None),
        };
        let firewalls = FirewallPair {
            fw1: FirewallContext::new(FirewallRole::FwNode1, "fw-1", Asn::new(65010)),
            fw2: FirewallContext::new(FirewallRole::FwNode2, "fw-2", Asn::new(65020)),
        };
        (borders, firewalls)
    }

    fn vn(id: &str, subnet: Option<&str>) -> VirtualNetworkRecord {
        VirtualNetworkRecord {
            id: id.into(),
            label: None,
            tags: vec!["peer_to_fw".into()],
            security_zone_id: "sz-a".into(),
            reserved_vlan_id: Some(100),
            ipv4_subnet: subnet.map(str::to_string),
            svi_ips: vec![
                SviBinding {
                    system_id: "leaf-1".into(),
                    ipv4_addr: Some("10.0.0.1/24".into()),
                },
                SviBinding {
                    system_id: "leaf-2".into(),
                    ipv4_addr: Some("10.0.0.2/24".into()),
                },
            ],
            floating_ips: vec![FloatingIpBinding {
                ipv4_addr: Some("10.0.0.10/24".into()),
                generic_system_ids: vec!["fw-1".into()],
            }],
        }
    }

    fn snapshot(vns: Vec<VirtualNetworkRecord>) -> FabricSnapshot {
        vns.into_iter().fold(
            FabricSnapshot::new(fabric(), Utc.with_ymd_and_hms(2026, 1, 19, 12, 0, 0).unwrap())
                .with_security_zone(SecurityZoneRecord {
                    id: "sz-a".into(),
                    vrf_name: "CUSTOMER_A".into(),
                }),
            |snap, vn| snap.with_virtual_network(vn),
        )
    }

    #[test]
    fn test_missing_floating_ip_is_a_warning() {
        let (borders, firewalls) = pairs();
        let snap = snapshot(vec![vn("vn-1", Some("10.0.0.0/24"))]);

        let out = build_vrf_entries(&snap, &["vn-1".to_string()], &borders, &firewalls).unwrap();
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].fw1_ip4, Some(Ipv4Addr::new(10, 0, 0, 10)));
        assert_eq!(out.entries[0].fw2_ip4, None);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].missing, vec![PeerSlot::Fw2]);
    }

    #[test]
    fn test_missing_subnet_is_invalid() {
        let (borders, firewalls) = pairs();
        let snap = snapshot(vec![vn("vn-1", None)]);

        let err =
            build_vrf_entries(&snap, &["vn-1".to_string()], &borders, &firewalls).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::InvalidRecord {
                field: "ipv4_subnet",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_zone_is_fatal() {
        let (borders, firewalls) = pairs();
        let mut snap = snapshot(vec![vn("vn-1", Some("10.0.0.0/24"))]);
        snap.security_zones.clear();

        let err =
            build_vrf_entries(&snap, &["vn-1".to_string()], &borders, &firewalls).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::MissingRecord {
                kind: RecordKind::SecurityZone,
                ..
            }
        ));
    }

    #[test]
    fn test_null_svi_address_is_skipped() {
        let (borders, firewalls) = pairs();
        let mut record = vn("vn-1", Some("10.0.0.0/24"));
        record.svi_ips.insert(
            0,
            SviBinding {
                system_id: "leaf-1".into(),
                ipv4_addr: None,
            },
        );
        let snap = snapshot(vec![record]);

        let out = build_vrf_entries(&snap, &["vn-1".to_string()], &borders, &firewalls).unwrap();
        assert_eq!(out.entries[0].leaf1_ip4, Some(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_unreserved_vlan_is_a_warning() {
        let (borders, firewalls) = pairs();
        let mut record = vn("vn-1", Some("10.0.0.0/24"));
        record.reserved_vlan_id = None;
        let snap = snapshot(vec![record]);

        let out = build_vrf_entries(&snap, &["vn-1".to_string()], &borders, &firewalls).unwrap();
        assert_eq!(out.entries[0].vlan_id, None);
        assert_eq!(out.warnings[0].missing, vec![PeerSlot::Vlan, PeerSlot::Fw2]);
    }

    #[test]
    fn test_out_of_range_vlan_is_invalid() {
        let (borders, firewalls) = pairs();
        let mut record = vn("vn-1", Some("10.0.0.0/24"));
        record.reserved_vlan_id = Some(4095);
        let snap = snapshot(vec![record]);

        let err =
            build_vrf_entries(&snap, &["vn-1".to_string()], &borders, &firewalls).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::InvalidRecord {
                field: "reserved_vlan_id",
                ..
            }
        ));
    }

    #[test]
    fn test_eligibility_keeps_discovery_order() {
        let summary = |id: &str, tag: &str| VirtualNetworkSummary {
            id: id.into(),
            label: None,
            tags: vec![tag.into()],
        };
        let vns = vec![
            summary("v3", "peer_to_fw"),
            summary("v9", "app"),
            summary("v1", "peer_to_fw"),
        ];
        assert_eq!(eligible_virtual_networks(&vns, "peer_to_fw"), vec!["v3", "v1"]);
    }
}
