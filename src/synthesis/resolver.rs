// Copyright (c) 2025 - Cowboy AI, Inc.
//! Role Resolver
//!
//! Turns tagged system records into the two border contexts, and captured
//! border-to-firewall traversals into the two firewall contexts.

use tracing::{debug, warn};

use crate::domain::{
    Asn, BlueprintId, BorderContext, BorderPair, BorderRole, FirewallContext, FirewallRole,
    SystemRecord,
};
use crate::errors::{RecordKind, SynthesisError, SynthesisResult};
use crate::snapshot::FabricSnapshot;
use crate::topology::{
    border_to_firewall, TraversalSpec, BGP_DOMAIN_NODE_NAME, DOMAIN_ASN_PROPERTY,
    FIREWALL_NODE_NAME,
};

/// Resolve `border1` and `border2`, each of which must tag exactly one system
pub fn resolve_border_contexts(
    fabric_id: &BlueprintId,
    systems: &[SystemRecord],
) -> SynthesisResult<BorderPair> {
    Ok(BorderPair {
        border1: resolve_border(fabric_id, systems, BorderRole::Border1)?,
        border2: resolve_border(fabric_id, systems, BorderRole::Border2)?,
    })
}

fn resolve_border(
    fabric_id: &BlueprintId,
    systems: &[SystemRecord],
    role: BorderRole,
) -> SynthesisResult<BorderContext> {
    let tag = role.tag();
    let tagged: Vec<&SystemRecord> = systems.iter().filter(|s| s.has_tag(tag.as_str())).collect();

    let system = match tagged.as_slice() {
        [only] => *only,
        _ => {
            return Err(SynthesisError::MissingRole {
                fabric_id: *fabric_id,
                tag,
                found: tagged.len(),
            })
        }
    };

    let asn = system.asn.ok_or_else(|| SynthesisError::InvalidRecord {
        fabric_id: *fabric_id,
        kind: RecordKind::System,
        id: system.node_id.clone(),
        field: "bgp_service.asn",
        reason: format!("{} has no BGP service ASN", role),
    })?;

    let context = BorderContext::new(
        role,
        system.node_id.clone(),
        asn,
        bound_interface(system, role, FirewallRole::FwNode1),
        bound_interface(system, role, FirewallRole::FwNode2),
    );
    debug!("Resolved {} as {} (ASN {})", role, context.node_id(), asn);
    Ok(context)
}

/// Interface of `system` tagged for `firewall`
///
/// With several candidates the first in interface-key order is taken, not
/// the last one listed by the design model; the rest are logged.
fn bound_interface(
    system: &SystemRecord,
    role: BorderRole,
    firewall: FirewallRole,
) -> Option<String> {
    let mut names = system.interfaces_tagged(firewall.tag().as_str());
    let first = names.next()?;
    let extra: Vec<&str> = names.collect();
    if !extra.is_empty() {
        warn!(
            "{} has several interfaces tagged {}; using {} (first by interface key) and ignoring {:?}",
            role, firewall, first, extra
        );
    }
    Some(first.to_string())
}

/// Every border-to-firewall walk the resolver may request, for each
/// border-tagged system and each firewall tag it has a bound interface for.
///
/// Duplicate or missing border tags are tolerated here so that a collector
/// can capture what exists; the resolver reports them later.
pub fn candidate_traversals(systems: &[SystemRecord]) -> Vec<TraversalSpec> {
    let mut traversals = Vec::new();
    for system in systems {
        for role in BorderRole::ALL {
            if !system.has_tag(role.tag().as_str()) {
                continue;
            }
            for firewall in FirewallRole::ALL {
                if let Some(interface) = bound_interface(system, role, firewall) {
                    traversals.push(border_to_firewall(
                        &system.node_id,
                        role,
                        &interface,
                        firewall,
                    ));
                }
            }
        }
    }
    traversals
}

/// Resolve the firewall tagged `firewall` behind `border`
///
/// Fails with `MissingRole` when the border has no interface bound to the
/// firewall tag, and with `TopologyMismatch` when the captured walk did not
/// yield exactly one firewall.
///
/// Firewall systems are not counted by tag across the system records.
/// Uniqueness of `fw_node1`/`fw_node2` is enforced only through the match
/// count of the walk: a second system carrying the tag surfaces as
/// `TopologyMismatch { found: 2 }` only if it is reachable from the border
/// interface.
pub fn resolve_firewall_context(
    snapshot: &FabricSnapshot,
    border: &BorderContext,
    firewall: FirewallRole,
) -> SynthesisResult<FirewallContext> {
    let fabric_id = snapshot.fabric_id;
    let interface = border
        .interface_to(firewall)
        .ok_or(SynthesisError::MissingRole {
            fabric_id,
            tag: firewall.tag(),
            found: 0,
        })?;

    let traversal = border_to_firewall(border.node_id(), border.role(), interface, firewall);
    let matches = snapshot.matches_for(&traversal).unwrap_or_default();

    let found = match matches {
        [only] => only,
        _ => {
            return Err(SynthesisError::TopologyMismatch {
                fabric_id,
                border: border.role(),
                firewall,
                interface: interface.to_string(),
                found: matches.len(),
            })
        }
    };

    let invalid = |field: &'static str, reason: String| SynthesisError::InvalidRecord {
        fabric_id,
        kind: RecordKind::GraphMatch,
        id: format!("{} -> {}", border.role(), firewall),
        field,
        reason,
    };

    let fw_node = found
        .node(FIREWALL_NODE_NAME)
        .ok_or_else(|| invalid("fw", "match has no firewall node".to_string()))?;
    let domain = found
        .node(BGP_DOMAIN_NODE_NAME)
        .ok_or_else(|| invalid("bgp", "match has no BGP domain node".to_string()))?;
    let asn = domain
        .property(DOMAIN_ASN_PROPERTY)
        .ok_or_else(|| invalid(DOMAIN_ASN_PROPERTY, "BGP domain carries no ASN".to_string()))
        .and_then(|raw| {
            Asn::try_from(raw).map_err(|e| invalid(DOMAIN_ASN_PROPERTY, e.to_string()))
        })?;

    debug!(
        "Resolved {} as {} (ASN {}) via {} {}",
        firewall,
        fw_node.id,
        asn,
        border.role(),
        interface
    );
    Ok(FirewallContext::new(firewall, fw_node.id.clone(), asn))
}
