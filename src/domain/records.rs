// Copyright (c) 2025 - Cowboy AI, Inc.
//! Read-only records fetched from the reference fabric
//!
//! Field names follow the design model's JSON so virtual-network and
//! security-zone payloads deserialize without an intermediate shape.
//! Addresses stay as raw strings here; the join engine validates them and
//! reports failures with the owning record's identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::network::Asn;
use super::tags::has_tag;

/// A system (switch or generic system) with its rendered config context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRecord {
    /// Graph node id of the system
    pub node_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Interfaces keyed by the design model's interface id
    #[serde(default)]
    pub interfaces: BTreeMap<String, InterfaceRecord>,
    /// ASN of the attached BGP service, when the system runs one
    #[serde(default)]
    pub asn: Option<Asn>,
}

impl SystemRecord {
    pub fn has_tag(&self, tag: &str) -> bool {
        has_tag(&self.tags, tag)
    }

    /// Names of interfaces carrying `tag`, in interface-key order
    pub fn interfaces_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.interfaces
            .values()
            .filter(move |intf| has_tag(&intf.tags, tag))
            .map(|intf| intf.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    /// Device interface name, e.g. `xe-0/0/10`
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Entry of the virtual-network listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualNetworkSummary {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl VirtualNetworkSummary {
    pub fn has_tag(&self, tag: &str) -> bool {
        has_tag(&self.tags, tag)
    }
}

/// Full virtual-network detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualNetworkRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub security_zone_id: String,
    #[serde(default)]
    pub reserved_vlan_id: Option<u16>,
    /// Subnet in CIDR notation, e.g. `10.0.0.0/24`
    #[serde(default)]
    pub ipv4_subnet: Option<String>,
    #[serde(default)]
    pub svi_ips: Vec<SviBinding>,
    #[serde(default)]
    pub floating_ips: Vec<FloatingIpBinding>,
}

/// SVI address of a system inside a virtual network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SviBinding {
    pub system_id: String,
    #[serde(default)]
    pub ipv4_addr: Option<String>,
}

/// Floating IP owned by one or more generic systems
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingIpBinding {
    #[serde(default)]
    pub ipv4_addr: Option<String>,
    #[serde(default)]
    pub generic_system_ids: Vec<String>,
}

impl FloatingIpBinding {
    /// The owning generic system; the first listed owner wins
    pub fn owner(&self) -> Option<&str> {
        self.generic_system_ids.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityZoneRecord {
    pub id: String,
    pub vrf_name: String,
}
