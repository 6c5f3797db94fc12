// Copyright (c) 2025 - Cowboy AI, Inc.
//! Role tags attached to design-model nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker tag carried by virtual networks that face the edge firewalls
pub const PEER_TO_FW_TAG: &str = "peer_to_fw";

/// Label of the property set published into the edge fabric
pub const PEER_PROPERTY_SET_LABEL: &str = "peer_properties";

/// Any tag the resolver must find exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTag {
    Border1,
    Border2,
    FwNode1,
    FwNode2,
}

impl RoleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleTag::Border1 => "border1",
            RoleTag::Border2 => "border2",
            RoleTag::FwNode1 => "fw_node1",
            RoleTag::FwNode2 => "fw_node2",
        }
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Border leaf role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderRole {
    Border1,
    Border2,
}

impl BorderRole {
    pub const ALL: [BorderRole; 2] = [BorderRole::Border1, BorderRole::Border2];

    pub fn tag(&self) -> RoleTag {
        match self {
            BorderRole::Border1 => RoleTag::Border1,
            BorderRole::Border2 => RoleTag::Border2,
        }
    }
}

impl fmt::Display for BorderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tag().fmt(f)
    }
}

/// Edge firewall role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirewallRole {
    FwNode1,
    FwNode2,
}

impl FirewallRole {
    pub const ALL: [FirewallRole; 2] = [FirewallRole::FwNode1, FirewallRole::FwNode2];

    pub fn tag(&self) -> RoleTag {
        match self {
            FirewallRole::FwNode1 => RoleTag::FwNode1,
            FirewallRole::FwNode2 => RoleTag::FwNode2,
        }
    }
}

impl fmt::Display for FirewallRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tag().fmt(f)
    }
}

/// True when `tags` contains `tag` verbatim
pub fn has_tag<S: AsRef<str>>(tags: &[S], tag: &str) -> bool {
    tags.iter().any(|t| t.as_ref() == tag)
}
