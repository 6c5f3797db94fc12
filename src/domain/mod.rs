// Copyright (c) 2025 - Cowboy AI, Inc.
//! Peering Domain Models
//!
//! Value objects, role tags, read-only fabric records and the resolved
//! role contexts the synthesis pipeline works on.
//!
//! # Value Objects with Invariants
//!
//! - [`IpAddressWithCidr`] - IPv4/IPv6 with optional CIDR prefix
//! - [`VlanId`] - IEEE 802.1Q VLAN ID (1-4094)
//! - [`Asn`] - BGP autonomous-system number
//! - [`BlueprintId`] - identity of a design-model fabric
//!
//! # Records and Contexts
//!
//! - [`SystemRecord`], [`VirtualNetworkRecord`], [`SecurityZoneRecord`] - external, read-only
//! - [`BorderContext`], [`FirewallContext`] - resolved once per run, immutable

pub mod context;
pub mod network;
pub mod records;
pub mod tags;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use context::{BorderContext, BorderPair, FirewallContext, FirewallPair};
pub use network::{Asn, IpAddressWithCidr, NetworkError, VlanId};
pub use records::{
    FloatingIpBinding, InterfaceRecord, SecurityZoneRecord, SviBinding, SystemRecord,
    VirtualNetworkRecord, VirtualNetworkSummary,
};
pub use tags::{BorderRole, FirewallRole, RoleTag, PEER_PROPERTY_SET_LABEL, PEER_TO_FW_TAG};

/// Identity of a fabric (blueprint) in the design model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlueprintId(Uuid);

impl BlueprintId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BlueprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlueprintId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}
