// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology correlation and property-set synthesis
//!
//! ```text
//! FabricSnapshot
//!     ↓
//! resolver   → BorderPair, FirewallPair
//!     ↓
//! join       → [VrfPeeringEntry] + warnings
//!     ↓
//! assembler  → PeerPropertyDocument
//! ```
//!
//! Every stage is a pure function of its inputs. Any fatal error aborts the
//! run; no partial document is produced.

pub mod assembler;
pub mod join;
pub mod pipeline;
pub mod resolver;

pub use assembler::assemble;
pub use join::{build_vrf_entries, eligible_virtual_networks, JoinOutput};
pub use pipeline::{synthesize_peer_properties, FirewallAnchor, SynthesisOptions, Synthesizer};
pub use resolver::{candidate_traversals, resolve_border_contexts, resolve_firewall_context};
