// Copyright (c) 2025 - Cowboy AI, Inc.

//! Blueprint Workflow
//!
//! Commit-check, deploy and revert of the edge blueprint after the property
//! set has been staged, plus the design checks run before any of it.
//!
//! ```text
//! staged ──commit_check──> Passed ──deploy(version+1)──> Deployed
//!            │  ▲
//!            │  └── Busy (retry, bounded)
//!            └──> RenderFailed | SystemMissing | Error ──revert?──> Reverted
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::BlueprintId;
use crate::errors::{CollaboratorError, CollaboratorResult};

/// Design value of freeform blueprints
pub const FREEFORM_DESIGN: &str = "freeform";

/// Identity and design of a blueprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintSummary {
    pub id: BlueprintId,
    pub label: String,
    pub design: String,
}

impl BlueprintSummary {
    pub fn is_freeform(&self) -> bool {
        self.design == FREEFORM_DESIGN
    }
}

/// Role a blueprint plays in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlueprintRole {
    /// Source of topology; any design except freeform
    Reference,
    /// Destination of the property set; must be freeform
    Edge,
}

/// Reject a blueprint whose design does not fit its role
pub fn ensure_design(summary: &BlueprintSummary, role: BlueprintRole) -> CollaboratorResult<()> {
    let fits = match role {
        BlueprintRole::Reference => !summary.is_freeform(),
        BlueprintRole::Edge => summary.is_freeform(),
    };
    if fits {
        return Ok(());
    }

    Err(CollaboratorError::WrongDesign {
        blueprint: summary.id,
        actual: summary.design.clone(),
        expected: match role {
            BlueprintRole::Reference => "a reference design".to_string(),
            BlueprintRole::Edge => FREEFORM_DESIGN.to_string(),
        },
    })
}

/// Result of one commit-check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitCheckOutcome {
    Passed,
    /// Rendered configuration failed validation on at least one device
    RenderFailed,
    /// A system is missing from the commit-check
    SystemMissing,
    /// Another operation is pending on the blueprint
    Busy,
    Error { status: u16 },
}

impl CommitCheckOutcome {
    /// Map the HTTP status of a commit-check call
    pub fn from_check_status(status: u16) -> Self {
        match status {
            200..=299 => CommitCheckOutcome::Passed,
            404 => CommitCheckOutcome::SystemMissing,
            409 => CommitCheckOutcome::Busy,
            other => CommitCheckOutcome::Error { status: other },
        }
    }

    /// Map the HTTP status of a commit-check result fetch
    pub fn from_result_status(status: u16) -> Self {
        match status {
            200..=299 => CommitCheckOutcome::Passed,
            400 => CommitCheckOutcome::RenderFailed,
            other => CommitCheckOutcome::Error { status: other },
        }
    }
}

/// Blueprint lifecycle operations in the edge fabric
#[async_trait]
pub trait BlueprintWorkflow: Send + Sync {
    async fn blueprint_summary(
        &self,
        blueprint: &BlueprintId,
    ) -> CollaboratorResult<BlueprintSummary>;

    async fn commit_check(&self, blueprint: &BlueprintId) -> CollaboratorResult<CommitCheckOutcome>;

    /// Currently deployed version
    async fn deployed_version(&self, blueprint: &BlueprintId) -> CollaboratorResult<u64>;

    async fn deploy(
        &self,
        blueprint: &BlueprintId,
        version: u64,
        description: &str,
    ) -> CollaboratorResult<()>;

    /// Discard staged changes back to the deployed state
    async fn revert(&self, blueprint: &BlueprintId) -> CollaboratorResult<()>;
}

/// How the workflow proceeds after staging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPolicy {
    /// Commit-check attempts while the blueprint reports busy
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
    /// Revert staged changes when the commit-check fails
    #[serde(default)]
    pub revert_on_failure: bool,
    /// Deploy once the commit-check passes
    #[serde(default)]
    pub deploy: bool,
}

fn default_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_attempts(),
            retry_delay_secs: default_retry_delay(),
            revert_on_failure: false,
            deploy: false,
        }
    }
}

/// Where the edge blueprint ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Deployed { version: u64 },
    /// Commit-check passed; changes left staged
    Staged,
    Reverted { check: CommitCheckOutcome },
    Failed { check: CommitCheckOutcome },
}

/// Commit-check, retrying while the blueprint is busy
pub async fn run_commit_check<W>(
    workflow: &W,
    blueprint: &BlueprintId,
    policy: &CommitPolicy,
) -> CollaboratorResult<CommitCheckOutcome>
where
    W: BlueprintWorkflow + ?Sized,
{
    let attempts = policy.max_attempts.max(1);
    let mut outcome = CommitCheckOutcome::Busy;

    for attempt in 1..=attempts {
        info!("Running commit-check on blueprint {} (attempt {}/{})", blueprint, attempt, attempts);
        outcome = workflow.commit_check(blueprint).await?;
        if outcome != CommitCheckOutcome::Busy {
            break;
        }
        if attempt < attempts {
            warn!("Blueprint {} has a pending operation; retrying", blueprint);
            tokio::time::sleep(Duration::from_secs(policy.retry_delay_secs)).await;
        }
    }

    Ok(outcome)
}

/// Commit-check the staged changes and deploy or revert per `policy`
pub async fn commit_and_deploy<W>(
    workflow: &W,
    blueprint: &BlueprintId,
    policy: &CommitPolicy,
    description: &str,
) -> CollaboratorResult<WorkflowOutcome>
where
    W: BlueprintWorkflow + ?Sized,
{
    let check = run_commit_check(workflow, blueprint, policy).await?;

    if check != CommitCheckOutcome::Passed {
        warn!("Commit-check of blueprint {} did not pass: {:?}", blueprint, check);
        if policy.revert_on_failure {
            workflow.revert(blueprint).await?;
            info!("Reverted staged changes of blueprint {}", blueprint);
            return Ok(WorkflowOutcome::Reverted { check });
        }
        return Ok(WorkflowOutcome::Failed { check });
    }

    if !policy.deploy {
        info!("Commit-check passed; leaving blueprint {} staged", blueprint);
        return Ok(WorkflowOutcome::Staged);
    }

    let version = workflow.deployed_version(blueprint).await? + 1;
    workflow.deploy(blueprint, version, description).await?;
    info!("Deployed version {} of blueprint {}", version, blueprint);
    Ok(WorkflowOutcome::Deployed { version })
}
