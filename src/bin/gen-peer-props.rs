// Copyright (c) 2025 - Cowboy AI, Inc.
//! Peer Property-Set Generator
//!
//! Reads the reference fabric, synthesizes the `peer_properties` document and
//! publishes it into the freeform edge blueprint.
//!
//! Pipeline:
//! - Reference blueprint → SnapshotCollector → Synthesizer → PropertySetStore → commit-check → deploy
//!
//! Run with: cargo run --bin gen-peer-props --features apstra
//!
//! Environment:
//! 1. APSTRA_TARGET / APSTRA_PORT / APSTRA_USER / APSTRA_PASSWORD
//! 2. SOURCE_BLUEPRINT (reference design) and DEST_BLUEPRINT (freeform)
//! 3. Optional: PEER_PROPERTY_SET, FIREWALL_ANCHOR, DEPLOY, REVERT_ON_FAILURE,
//!    DRY_RUN, APSTRA_INSECURE

use anyhow::{Context, Result};
use chrono::Utc;
use edge_peering::{
    adapters::{ApstraClient, ApstraConfig},
    commit_and_deploy, ensure_design, publish_property_set, BlueprintId, BlueprintRole,
    BlueprintWorkflow, CommitPolicy, FirewallAnchor, SynthesisOptions, Synthesizer,
    WorkflowOutcome, PEER_PROPERTY_SET_LABEL,
};
use tracing::{error, info, warn};

/// Configuration for one generator run
#[derive(Debug, Clone)]
struct GeneratorConfig {
    apstra: ApstraConfig,
    source: BlueprintId,
    destination: BlueprintId,
    property_set_label: String,
    synthesis: SynthesisOptions,
    commit: CommitPolicy,
    /// Print the document instead of publishing it
    dry_run: bool,
}

impl GeneratorConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let target = std::env::var("APSTRA_TARGET").context("APSTRA_TARGET not set")?;
        let port = match std::env::var("APSTRA_PORT") {
            Ok(port) => port.parse().context("APSTRA_PORT is not a TCP port")?,
            Err(_) => 443,
        };

        let mut apstra = ApstraConfig::from_target(
            &target,
            port,
            std::env::var("APSTRA_USER").unwrap_or_else(|_| "admin".to_string()),
            std::env::var("APSTRA_PASSWORD").context("APSTRA_PASSWORD not set")?,
        );
        apstra.accept_invalid_certs = env_flag("APSTRA_INSECURE", true)?;

        let source = std::env::var("SOURCE_BLUEPRINT")
            .context("SOURCE_BLUEPRINT not set")?
            .parse()
            .context("SOURCE_BLUEPRINT is not a blueprint id")?;
        let destination = std::env::var("DEST_BLUEPRINT")
            .context("DEST_BLUEPRINT not set")?
            .parse()
            .context("DEST_BLUEPRINT is not a blueprint id")?;

        let firewall_anchor = match std::env::var("FIREWALL_ANCHOR") {
            Ok(value) => value
                .parse::<FirewallAnchor>()
                .map_err(|e| anyhow::anyhow!("FIREWALL_ANCHOR: {}", e))?,
            Err(_) => FirewallAnchor::default(),
        };

        let commit = CommitPolicy {
            deploy: env_flag("DEPLOY", false)?,
            revert_on_failure: env_flag("REVERT_ON_FAILURE", false)?,
            ..Default::default()
        };

        Ok(Self {
            apstra,
            source,
            destination,
            property_set_label: std::env::var("PEER_PROPERTY_SET")
                .unwrap_or_else(|_| PEER_PROPERTY_SET_LABEL.to_string()),
            synthesis: SynthesisOptions {
                firewall_anchor,
                ..Default::default()
            },
            commit,
            dry_run: env_flag("DRY_RUN", false)?,
        })
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => anyhow::bail!("{} must be a boolean, got '{}'", name, other),
        },
        Err(_) => Ok(default),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting peer property-set generator");

    let config = GeneratorConfig::from_env()?;
    info!("Configuration loaded:");
    info!("  - Apstra: {}", config.apstra.base_url);
    info!("  - Source blueprint: {}", config.source);
    info!("  - Destination blueprint: {}", config.destination);
    info!("  - Property set: {}", config.property_set_label);
    info!("  - Firewall anchor: {}", config.synthesis.firewall_anchor);

    let client = ApstraClient::connect(config.apstra.clone())
        .await
        .context("Failed to log in to Apstra")?;

    let result = run(&client, &config).await;

    if let Err(e) = client.logout().await {
        warn!("Logout failed: {}", e);
    }

    match result {
        Ok(()) => {
            info!("Done");
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            Err(e)
        }
    }
}

async fn run(client: &ApstraClient, config: &GeneratorConfig) -> Result<()> {
    let source = client
        .blueprint_summary(&config.source)
        .await
        .context("Failed to read source blueprint")?;
    ensure_design(&source, BlueprintRole::Reference)?;

    let destination = client
        .blueprint_summary(&config.destination)
        .await
        .context("Failed to read destination blueprint")?;
    ensure_design(&destination, BlueprintRole::Edge)?;

    let document = Synthesizer::new(config.synthesis.clone())
        .collect_and_synthesize(client, &config.source)
        .await
        .context("Failed to synthesize peer properties")?;

    if config.dry_run {
        println!("{}", serde_json::to_string_pretty(&document.to_values())?);
        return Ok(());
    }

    let published = publish_property_set(
        client,
        &config.destination,
        &config.property_set_label,
        &document,
    )
    .await
    .context("Failed to publish property set")?;
    info!("Property set published: {:?}", published);

    let description = format!(
        "{} updated from {} at {}",
        config.property_set_label,
        source.label,
        Utc::now().to_rfc3339()
    );
    match commit_and_deploy(client, &config.destination, &config.commit, &description).await? {
        WorkflowOutcome::Deployed { version } => info!("Deployed version {}", version),
        WorkflowOutcome::Staged => info!("Changes staged; set DEPLOY=true to deploy"),
        WorkflowOutcome::Reverted { check } => {
            anyhow::bail!("commit-check failed ({:?}); staged changes reverted", check)
        }
        WorkflowOutcome::Failed { check } => {
            anyhow::bail!("commit-check failed ({:?}); changes left staged", check)
        }
    }

    Ok(())
}
