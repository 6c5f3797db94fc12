// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resolved role contexts
//!
//! Built once by the role resolver and never updated afterwards. Fields are
//! private; construction goes through [`BorderContext::new`] and
//! [`FirewallContext::new`].

use serde::{Deserialize, Serialize};

use super::network::Asn;
use super::tags::{BorderRole, FirewallRole};

/// A border leaf and the interfaces it uses toward each firewall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderContext {
    role: BorderRole,
    node_id: String,
    asn: Asn,
    fw1_interface: Option<String>,
    fw2_interface: Option<String>,
}

impl BorderContext {
    pub fn new(
        role: BorderRole,
        node_id: impl Into<String>,
        asn: Asn,
        fw1_interface: Option<String>,
        fw2_interface: Option<String>,
    ) -> Self {
        Self {
            role,
            node_id: node_id.into(),
            asn,
            fw1_interface,
            fw2_interface,
        }
    }

    pub fn role(&self) -> BorderRole {
        self.role
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn asn(&self) -> Asn {
        self.asn
    }

    /// Interface on this leaf bound to the given firewall, if one is tagged
    pub fn interface_to(&self, firewall: FirewallRole) -> Option<&str> {
        match firewall {
            FirewallRole::FwNode1 => self.fw1_interface.as_deref(),
            FirewallRole::FwNode2 => self.fw2_interface.as_deref(),
        }
    }
}

/// An edge firewall reached from a border leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallContext {
    role: FirewallRole,
    node_id: String,
    asn: Asn,
}

impl FirewallContext {
    pub fn new(role: FirewallRole, node_id: impl Into<String>, asn: Asn) -> Self {
        Self {
            role,
            node_id: node_id.into(),
            asn,
        }
    }

    pub fn role(&self) -> FirewallRole {
        self.role
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn asn(&self) -> Asn {
        self.asn
    }
}

/// Both border leaves of a fabric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderPair {
    pub border1: BorderContext,
    pub border2: BorderContext,
}

impl BorderPair {
    pub fn get(&self, role: BorderRole) -> &BorderContext {
        match role {
            BorderRole::Border1 => &self.border1,
            BorderRole::Border2 => &self.border2,
        }
    }
}

/// Both edge firewalls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallPair {
    pub fw1: FirewallContext,
    pub fw2: FirewallContext,
}
