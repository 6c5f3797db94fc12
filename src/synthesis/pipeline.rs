// Copyright (c) 2025 - Cowboy AI, Inc.
//! Synthesis Pipeline
//!
//! resolver → join engine → assembler, in strict sequence. The pipeline
//! holds no state between runs; the same snapshot always yields the same
//! document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::domain::{BorderPair, BorderRole, FirewallPair, FirewallRole, PEER_TO_FW_TAG};
use crate::domain::BlueprintId;
use crate::errors::{PeerSyncError, SynthesisResult};
use crate::property_set::PeerPropertyDocument;
use crate::snapshot::{DesignModelSource, FabricSnapshot, SnapshotCollector};

use super::assembler::assemble;
use super::join::{build_vrf_entries, eligible_virtual_networks};
use super::resolver::{resolve_border_contexts, resolve_firewall_context};

/// Which border leaf each firewall is resolved through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirewallAnchor {
    /// Both firewalls through border1
    #[default]
    Border1,
    /// fw_node1 through border1, fw_node2 through border2
    Paired,
}

impl FirewallAnchor {
    pub fn border_for(&self, firewall: FirewallRole) -> BorderRole {
        match (self, firewall) {
            (FirewallAnchor::Paired, FirewallRole::FwNode2) => BorderRole::Border2,
            _ => BorderRole::Border1,
        }
    }
}

impl fmt::Display for FirewallAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FirewallAnchor::Border1 => "border1",
            FirewallAnchor::Paired => "paired",
        })
    }
}

impl FromStr for FirewallAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "border1" => Ok(FirewallAnchor::Border1),
            "paired" => Ok(FirewallAnchor::Paired),
            other => Err(format!("unknown firewall anchor '{other}' (expected border1 or paired)")),
        }
    }
}

/// Options of a synthesis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    #[serde(default)]
    pub firewall_anchor: FirewallAnchor,
    /// Tag that makes a VN eligible for peering
    #[serde(default = "default_marker_tag")]
    pub marker_tag: String,
}

fn default_marker_tag() -> String {
    PEER_TO_FW_TAG.to_string()
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            firewall_anchor: FirewallAnchor::default(),
            marker_tag: default_marker_tag(),
        }
    }
}

/// Runs the pipeline with fixed options
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: SynthesisOptions,
}

impl Synthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    pub fn synthesize(&self, snapshot: &FabricSnapshot) -> SynthesisResult<PeerPropertyDocument> {
        info!("Synthesizing peer properties for fabric {}", snapshot.fabric_id);

        let borders = resolve_border_contexts(&snapshot.fabric_id, &snapshot.systems)?;
        let firewalls = self.resolve_firewalls(snapshot, &borders)?;

        let vn_ids =
            eligible_virtual_networks(&snapshot.virtual_networks, &self.options.marker_tag);
        let joined = build_vrf_entries(snapshot, &vn_ids, &borders, &firewalls)?;
        for warning in &joined.warnings {
            warn!("Partial binding in fabric {}: {}", snapshot.fabric_id, warning);
        }

        let document = assemble(&borders, &firewalls, joined.entries, joined.warnings);
        info!(
            "Synthesized {} VRF entries ({} partial) for fabric {}",
            document.vrfs.len(),
            document.warnings.len(),
            snapshot.fabric_id
        );
        Ok(document)
    }

    /// Collect `fabric` from `source` and synthesize the snapshot
    pub async fn collect_and_synthesize<S>(
        &self,
        source: &S,
        fabric: &BlueprintId,
    ) -> Result<PeerPropertyDocument, PeerSyncError>
    where
        S: DesignModelSource + ?Sized,
    {
        let snapshot = SnapshotCollector::new(source, self.options.marker_tag.clone())
            .collect(fabric)
            .await?;
        Ok(self.synthesize(&snapshot)?)
    }

    fn resolve_firewalls(
        &self,
        snapshot: &FabricSnapshot,
        borders: &BorderPair,
    ) -> SynthesisResult<FirewallPair> {
        let anchor = self.options.firewall_anchor;
        Ok(FirewallPair {
            fw1: resolve_firewall_context(
                snapshot,
                borders.get(anchor.border_for(FirewallRole::FwNode1)),
                FirewallRole::FwNode1,
            )?,
            fw2: resolve_firewall_context(
                snapshot,
                borders.get(anchor.border_for(FirewallRole::FwNode2)),
                FirewallRole::FwNode2,
            )?,
        })
    }
}

/// Synthesize the peer property document of a snapshot with default options
pub fn synthesize_peer_properties(
    snapshot: &FabricSnapshot,
) -> SynthesisResult<PeerPropertyDocument> {
    Synthesizer::default().synthesize(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(FirewallAnchor::Border1, FirewallRole::FwNode1, BorderRole::Border1)]
    #[test_case(FirewallAnchor::Border1, FirewallRole::FwNode2, BorderRole::Border1)]
    #[test_case(FirewallAnchor::Paired, FirewallRole::FwNode1, BorderRole::Border1)]
    #[test_case(FirewallAnchor::Paired, FirewallRole::FwNode2, BorderRole::Border2)]
    fn test_anchor_border(anchor: FirewallAnchor, firewall: FirewallRole, expected: BorderRole) {
        assert_eq!(anchor.border_for(firewall), expected);
    }

    #[test]
    fn test_anchor_parse() {
        assert_eq!("Paired".parse::<FirewallAnchor>(), Ok(FirewallAnchor::Paired));
        assert_eq!("border1".parse::<FirewallAnchor>(), Ok(FirewallAnchor::Border1));
        assert!("border2".parse::<FirewallAnchor>().is_err());
    }

    #[test]
    fn test_options_default_from_empty_json() {
        let options: SynthesisOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SynthesisOptions::default());
        assert_eq!(options.marker_tag, "peer_to_fw");
    }
}
