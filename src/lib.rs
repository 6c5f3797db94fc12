// Copyright (c) 2025 - Cowboy AI, Inc.
//! Edge peering property-set synthesis
//!
//! This crate correlates the border leaves and edge firewalls of a reference
//! fabric and synthesizes the per-VRF BGP peering document (`peer_properties`)
//! consumed by a freeform edge fabric.
//!
//! ```text
//! DesignModelSource → SnapshotCollector → FabricSnapshot
//!                                              ↓
//!                                         Synthesizer → PeerPropertyDocument
//!                                                              ↓
//!                          PropertySetStore ← publish_property_set
//!                                 ↓
//!                          BlueprintWorkflow (commit-check, deploy)
//! ```

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod property_set;
pub mod snapshot;
pub mod synthesis;
pub mod topology;
pub mod workflow;

// Re-export commonly used types
pub use domain::{
    Asn, BlueprintId, BorderContext, BorderPair, BorderRole, FirewallContext, FirewallPair,
    FirewallRole, RoleTag, SystemRecord, VirtualNetworkRecord, VirtualNetworkSummary, VlanId,
    PEER_PROPERTY_SET_LABEL, PEER_TO_FW_TAG,
};
pub use errors::{
    CollaboratorError, CollaboratorResult, PeerSyncError, RecordKind, SynthesisError,
    SynthesisResult,
};
pub use property_set::{
    publish_property_set, AsnMap, PartialBindingWarning, PeerPropertyDocument, PeerSlot,
    PropertySetStore, PropertySetSummary, PublishOutcome, VrfPeeringEntry,
};
pub use snapshot::{DesignModelSource, FabricSnapshot, SnapshotCollector};
pub use synthesis::{synthesize_peer_properties, FirewallAnchor, SynthesisOptions, Synthesizer};
pub use topology::{NodeMatch, TraversalSpec};
pub use workflow::{
    commit_and_deploy, ensure_design, BlueprintRole, BlueprintSummary, BlueprintWorkflow,
    CommitCheckOutcome, CommitPolicy, WorkflowOutcome,
};
