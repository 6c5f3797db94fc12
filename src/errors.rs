// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for peering synthesis and its collaborators

use std::fmt;
use thiserror::Error;

use crate::domain::{BlueprintId, BorderRole, FirewallRole, RoleTag};

/// Fatal synthesis failures
///
/// Every variant names the fabric it was raised against. None of these
/// produce a partial document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// A required role tag was not found exactly once
    #[error("fabric {fabric_id}: expected exactly one system tagged '{tag}', found {found}")]
    MissingRole {
        fabric_id: BlueprintId,
        tag: RoleTag,
        found: usize,
    },

    /// A border-to-firewall traversal matched zero or several systems
    #[error(
        "fabric {fabric_id}: traversal from {border} via interface '{interface}' to {firewall} matched {found} systems, expected exactly one"
    )]
    TopologyMismatch {
        fabric_id: BlueprintId,
        border: BorderRole,
        firewall: FirewallRole,
        interface: String,
        found: usize,
    },

    /// A record the join needs is absent from the snapshot
    #[error("fabric {fabric_id}: {kind} '{id}' is missing from the snapshot")]
    MissingRecord {
        fabric_id: BlueprintId,
        kind: RecordKind,
        id: String,
    },

    /// A record field cannot be interpreted
    #[error("fabric {fabric_id}: {kind} '{id}' has an invalid {field}: {reason}")]
    InvalidRecord {
        fabric_id: BlueprintId,
        kind: RecordKind,
        id: String,
        field: &'static str,
        reason: String,
    },
}

/// Kind of record named in an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    System,
    VirtualNetwork,
    SecurityZone,
    GraphMatch,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::System => "system",
            RecordKind::VirtualNetwork => "virtual network",
            RecordKind::SecurityZone => "security zone",
            RecordKind::GraphMatch => "graph match",
        })
    }
}

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Errors raised by the external collaborators (design-model source,
/// property-set store, blueprint workflow)
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a status the operation does not accept
    #[error("{operation} returned HTTP {status}: {body}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    /// Login failed or no session token is held
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A blueprint has the wrong design for its role in the run
    #[error("blueprint {blueprint} has design '{actual}', expected {expected}")]
    WrongDesign {
        blueprint: BlueprintId,
        actual: String,
        expected: String,
    },

    /// Lookup against an in-process collaborator found nothing
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for collaborator operations
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

impl From<serde_json::Error> for CollaboratorError {
    fn from(err: serde_json::Error) -> Self {
        CollaboratorError::Decode(err.to_string())
    }
}

/// Any failure of an end-to-end run
#[derive(Debug, Error)]
pub enum PeerSyncError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}
