// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Set Assembler

use crate::domain::{BorderPair, FirewallPair};
use crate::property_set::{AsnMap, PartialBindingWarning, PeerPropertyDocument, VrfPeeringEntry};

/// Merge the four resolved ASNs and the VRF entries into the final document
pub fn assemble(
    borders: &BorderPair,
    firewalls: &FirewallPair,
    vrfs: Vec<VrfPeeringEntry>,
    warnings: Vec<PartialBindingWarning>,
) -> PeerPropertyDocument {
    PeerPropertyDocument {
        asn: AsnMap {
            leaf1: borders.border1.asn(),
            leaf2: borders.border2.asn(),
            fw_node1: firewalls.fw1.asn(),
            fw_node2: firewalls.fw2.asn(),
        },
        vrfs,
        warnings,
    }
}
