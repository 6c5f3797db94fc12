// Copyright (c) 2025 - Cowboy AI, Inc.

//! Typed topology traversals
//!
//! A [`TraversalSpec`] describes a graph walk as data: an anchor node
//! pattern followed by a sequence of edge steps, each landing on a node
//! pattern. The last step's pattern is the terminal predicate. Query-language
//! syntax lives only in the adapters that execute a spec.
//!
//! ```text
//! system{id, tag}
//!   -out(hosted_interfaces)-> interface{if_name}
//!   -out(link)-> link
//!   -in(link)-> interface
//!   -in(hosted_interfaces)-> system "fw" {tag}
//!   -in-> domain "bgp"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{BorderRole, FirewallRole};

/// Name bound to the firewall system in a border-to-firewall match
pub const FIREWALL_NODE_NAME: &str = "fw";

/// Name bound to the firewall's BGP domain in a border-to-firewall match
pub const BGP_DOMAIN_NODE_NAME: &str = "bgp";

/// Property of a BGP domain node holding its ASN
pub const DOMAIN_ASN_PROPERTY: &str = "domain_id";

/// Edge direction relative to the current node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Out,
    In,
}

/// Predicate on a single graph node
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePattern {
    /// Node type, e.g. `system`, `interface`, `domain`
    pub node_type: String,
    /// Name the node is bound to in each match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_as: Option<String>,
    /// Exact-match property constraints
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    /// Node must carry at least one of these tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags_any: Vec<String>,
}

impl NodePattern {
    pub fn of_type(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    pub fn bind_as(mut self, name: impl Into<String>) -> Self {
        self.bind_as = Some(name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_any_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags_any.push(tag.into());
        self
    }
}

/// One hop: follow an edge, then match the node reached
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraversalStep {
    pub direction: Direction,
    /// Edge type; `None` follows any edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<String>,
    pub node: NodePattern,
}

/// A complete graph walk
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraversalSpec {
    pub anchor: NodePattern,
    pub steps: Vec<TraversalStep>,
}

impl TraversalSpec {
    pub fn from_anchor(anchor: NodePattern) -> Self {
        Self {
            anchor,
            steps: Vec::new(),
        }
    }

    pub fn out(self, edge: Option<&str>, node: NodePattern) -> Self {
        self.step(Direction::Out, edge, node)
    }

    pub fn in_(self, edge: Option<&str>, node: NodePattern) -> Self {
        self.step(Direction::In, edge, node)
    }

    fn step(mut self, direction: Direction, edge: Option<&str>, node: NodePattern) -> Self {
        self.steps.push(TraversalStep {
            direction,
            edge: edge.map(str::to_string),
            node,
        });
        self
    }

    /// Pattern the walk ends on
    pub fn terminal(&self) -> &NodePattern {
        self.steps.last().map(|s| &s.node).unwrap_or(&self.anchor)
    }
}

/// Walk from a border leaf's firewall-facing interface across the physical
/// link to the firewall system, then to the firewall's BGP domain.
pub fn border_to_firewall(
    border_node_id: &str,
    border: BorderRole,
    interface: &str,
    firewall: FirewallRole,
) -> TraversalSpec {
    TraversalSpec::from_anchor(
        NodePattern::of_type("system")
            .with_property("id", border_node_id)
            .with_any_tag(border.to_string()),
    )
    .out(
        Some("hosted_interfaces"),
        NodePattern::of_type("interface").with_property("if_name", interface),
    )
    .out(Some("link"), NodePattern::of_type("link"))
    .in_(Some("link"), NodePattern::of_type("interface"))
    .in_(
        Some("hosted_interfaces"),
        NodePattern::of_type("system")
            .bind_as(FIREWALL_NODE_NAME)
            .with_any_tag(firewall.to_string()),
    )
    .in_(None, NodePattern::of_type("domain").bind_as(BGP_DOMAIN_NODE_NAME))
}

/// A node returned by a topology query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(flatten)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl GraphNode {
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

/// One match of a traversal: bound names to nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeMatch(pub BTreeMap<String, GraphNode>);

impl NodeMatch {
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.0.get(name)
    }
}
