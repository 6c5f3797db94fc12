// Copyright (c) 2025 - Cowboy AI, Inc.

//! Collaborator adapter implementations
//!
//! Concrete implementations of [`DesignModelSource`](crate::snapshot::DesignModelSource),
//! [`PropertySetStore`](crate::property_set::PropertySetStore) and
//! [`BlueprintWorkflow`](crate::workflow::BlueprintWorkflow) for fabric controllers.

#[cfg(feature = "apstra")]
pub mod apstra;

#[cfg(feature = "apstra")]
pub use apstra::{ApstraClient, ApstraConfig};
