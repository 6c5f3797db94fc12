// Copyright (c) 2025 - Cowboy AI, Inc.

//! Fabric snapshots and the design-model collaborator
//!
//! The synthesis core never talks to the design model. A
//! [`SnapshotCollector`] performs the single fetch pass through a
//! [`DesignModelSource`] and freezes everything the core may need into a
//! [`FabricSnapshot`]. Synthesis is then a pure function of that value.
//!
//! ```text
//! DesignModelSource ──collect()──> FabricSnapshot ──synthesize()──> PeerPropertyDocument
//!     (async I/O)                   (immutable)          (pure)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::domain::{
    BlueprintId, SecurityZoneRecord, SystemRecord, VirtualNetworkRecord, VirtualNetworkSummary,
};
use crate::errors::CollaboratorResult;
use crate::synthesis::join::eligible_virtual_networks;
use crate::synthesis::resolver::candidate_traversals;
use crate::topology::{NodeMatch, TraversalSpec};

/// Read access to the reference fabric
#[async_trait]
pub trait DesignModelSource: Send + Sync {
    /// Every system with its config context (tags, interfaces, BGP ASN)
    async fn fetch_systems_with_context(
        &self,
        fabric: &BlueprintId,
    ) -> CollaboratorResult<Vec<SystemRecord>>;

    /// Virtual-network listing in discovery order
    async fn fetch_virtual_networks(
        &self,
        fabric: &BlueprintId,
    ) -> CollaboratorResult<Vec<VirtualNetworkSummary>>;

    async fn fetch_virtual_network_detail(
        &self,
        fabric: &BlueprintId,
        vn_id: &str,
    ) -> CollaboratorResult<VirtualNetworkRecord>;

    async fn fetch_security_zone_detail(
        &self,
        fabric: &BlueprintId,
        sz_id: &str,
    ) -> CollaboratorResult<SecurityZoneRecord>;

    /// Execute a graph walk; zero, one or many matches
    async fn query_topology(
        &self,
        fabric: &BlueprintId,
        traversal: &TraversalSpec,
    ) -> CollaboratorResult<Vec<NodeMatch>>;
}

/// Captured result of one topology query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyRecord {
    pub traversal: TraversalSpec,
    pub matches: Vec<NodeMatch>,
}

/// Everything synthesis reads, frozen at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricSnapshot {
    pub fabric_id: BlueprintId,
    pub captured_at: DateTime<Utc>,
    pub systems: Vec<SystemRecord>,
    /// VN listing in discovery order
    pub virtual_networks: Vec<VirtualNetworkSummary>,
    /// Details of the eligible VNs, keyed by VN id
    pub vn_details: BTreeMap<String, VirtualNetworkRecord>,
    /// Security zones referenced by `vn_details`, keyed by zone id
    pub security_zones: BTreeMap<String, SecurityZoneRecord>,
    pub adjacency: Vec<AdjacencyRecord>,
}

impl FabricSnapshot {
    /// Empty snapshot of a fabric, to be filled by the builder methods
    pub fn new(fabric_id: BlueprintId, captured_at: DateTime<Utc>) -> Self {
        Self {
            fabric_id,
            captured_at,
            systems: Vec::new(),
            virtual_networks: Vec::new(),
            vn_details: BTreeMap::new(),
            security_zones: BTreeMap::new(),
            adjacency: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: SystemRecord) -> Self {
        self.systems.push(system);
        self
    }

    /// Add a VN to the listing and record its detail
    pub fn with_virtual_network(mut self, detail: VirtualNetworkRecord) -> Self {
        self.virtual_networks.push(VirtualNetworkSummary {
            id: detail.id.clone(),
            label: detail.label.clone(),
            tags: detail.tags.clone(),
        });
        self.vn_details.insert(detail.id.clone(), detail);
        self
    }

    pub fn with_security_zone(mut self, zone: SecurityZoneRecord) -> Self {
        self.security_zones.insert(zone.id.clone(), zone);
        self
    }

    pub fn with_adjacency(mut self, traversal: TraversalSpec, matches: Vec<NodeMatch>) -> Self {
        self.adjacency.push(AdjacencyRecord { traversal, matches });
        self
    }

    /// Matches captured for `traversal`, if it was queried
    pub fn matches_for(&self, traversal: &TraversalSpec) -> Option<&[NodeMatch]> {
        self.adjacency
            .iter()
            .find(|record| &record.traversal == traversal)
            .map(|record| record.matches.as_slice())
    }
}

/// Performs the one fetch pass of a run
pub struct SnapshotCollector<'a, S: ?Sized> {
    source: &'a S,
    marker_tag: String,
}

impl<'a, S> SnapshotCollector<'a, S>
where
    S: DesignModelSource + ?Sized,
{
    pub fn new(source: &'a S, marker_tag: impl Into<String>) -> Self {
        Self {
            source,
            marker_tag: marker_tag.into(),
        }
    }

    /// Fetch systems, eligible VNs with their zones, and every
    /// border-to-firewall traversal the resolver may ask for.
    ///
    /// Role problems (missing or duplicate tags) are not detected here;
    /// they surface when the snapshot is synthesized.
    pub async fn collect(&self, fabric: &BlueprintId) -> CollaboratorResult<FabricSnapshot> {
        info!("Collecting snapshot of fabric {}", fabric);

        let systems = self.source.fetch_systems_with_context(fabric).await?;
        debug!("Fetched {} systems", systems.len());

        let virtual_networks = self.source.fetch_virtual_networks(fabric).await?;
        let eligible = eligible_virtual_networks(&virtual_networks, &self.marker_tag);
        debug!(
            "{} of {} virtual networks carry '{}'",
            eligible.len(),
            virtual_networks.len(),
            self.marker_tag
        );

        let details = try_join_all(
            eligible
                .iter()
                .map(|vn_id| self.source.fetch_virtual_network_detail(fabric, vn_id)),
        )
        .await?;

        let zone_ids: BTreeSet<&str> = details
            .iter()
            .map(|vn| vn.security_zone_id.as_str())
            .collect();
        let zones = try_join_all(
            zone_ids
                .iter()
                .map(|sz_id| self.source.fetch_security_zone_detail(fabric, sz_id)),
        )
        .await?;

        let traversals = candidate_traversals(&systems);
        let matches = try_join_all(
            traversals
                .iter()
                .map(|traversal| self.source.query_topology(fabric, traversal)),
        )
        .await?;
        debug!("Captured {} border-to-firewall traversals", traversals.len());

        let snapshot = FabricSnapshot {
            fabric_id: *fabric,
            captured_at: Utc::now(),
            systems,
            virtual_networks,
            vn_details: details.into_iter().map(|vn| (vn.id.clone(), vn)).collect(),
            security_zones: zones.into_iter().map(|sz| (sz.id.clone(), sz)).collect(),
            adjacency: traversals
                .into_iter()
                .zip(matches)
                .map(|(traversal, matches)| AdjacencyRecord { traversal, matches })
                .collect(),
        };

        info!(
            "Snapshot of fabric {} holds {} systems, {} eligible VNs, {} zones",
            fabric,
            snapshot.systems.len(),
            snapshot.vn_details.len(),
            snapshot.security_zones.len()
        );
        Ok(snapshot)
    }
}
