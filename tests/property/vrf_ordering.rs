// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for VRF Entry Synthesis
//!
//! Any arrangement of peering and non-peering VNs must produce one entry per
//! marked VN, in discovery order, and the same bytes on every run.

use edge_peering::{synthesize_peer_properties, FabricSnapshot};
use proptest::prelude::*;

use crate::fixtures::{fabric_without_vns, peering_vn, zone};

/// One VN of a generated fabric: its index and whether it carries the marker
fn vn_layout() -> impl Strategy<Value = Vec<(u8, bool)>> {
    prop::collection::vec(any::<bool>(), 0..12).prop_flat_map(|marks| {
        let indexed: Vec<(u8, bool)> = marks
            .into_iter()
            .enumerate()
            .map(|(i, marked)| (i as u8, marked))
            .collect();
        Just(indexed).prop_shuffle()
    })
}

fn build_fabric(layout: &[(u8, bool)]) -> FabricSnapshot {
    layout.iter().fold(fabric_without_vns(), |snapshot, &(i, marked)| {
        let mut vn = peering_vn(&format!("vn-{}", i), &format!("sz-{}", i), 100 + u16::from(i), i);
        if !marked {
            vn.tags.clear();
        }
        snapshot
            .with_virtual_network(vn)
            .with_security_zone(zone(&format!("sz-{}", i), &format!("VRF_{}", i)))
    })
}

proptest! {
    #[test]
    fn prop_entries_follow_discovery_order(layout in vn_layout()) {
        let document = synthesize_peer_properties(&build_fabric(&layout)).unwrap();

        let expected: Vec<String> = layout
            .iter()
            .filter(|(_, marked)| *marked)
            .map(|(i, _)| format!("VRF_{}", i))
            .collect();
        let actual: Vec<String> = document.vrfs.iter().map(|vrf| vrf.name.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_entries_carry_their_own_vlan(layout in vn_layout()) {
        let document = synthesize_peer_properties(&build_fabric(&layout)).unwrap();

        for vrf in &document.vrfs {
            let index: u16 = vrf.name.trim_start_matches("VRF_").parse().unwrap();
            prop_assert_eq!(vrf.vlan_id.map(|vlan| vlan.value()), Some(100 + index));
            prop_assert_eq!(vrf.prefix_bits, 24);
        }
        prop_assert!(document.is_complete());
    }

    #[test]
    fn prop_synthesis_is_deterministic(layout in vn_layout()) {
        let snapshot = build_fabric(&layout);
        let first = serde_json::to_vec(&synthesize_peer_properties(&snapshot).unwrap()).unwrap();
        let second = serde_json::to_vec(&synthesize_peer_properties(&snapshot).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }
}
