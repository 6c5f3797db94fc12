// Copyright (c) 2025 - Cowboy AI, Inc.

//! Apstra REST Adapter
//!
//! Implements the three collaborator traits against the Apstra API:
//!
//! ```text
//! DesignModelSource   GET  /blueprints/{bp}/systems, .../config-context
//!                     GET  /blueprints/{bp}/virtual-networks[/{vn}]
//!                     GET  /blueprints/{bp}/security-zones/{sz}
//!                     POST /blueprints/{bp}/qe
//! PropertySetStore    GET|POST /blueprints/{bp}/property-sets, PATCH .../{ps}
//! BlueprintWorkflow   POST /blueprints/{bp}/commit-check, GET .../commit-check-result
//!                     GET|PUT /blueprints/{bp}/deploy, POST .../revert
//! ```
//!
//! A session is opened with [`ApstraClient::connect`] and closed with
//! [`ApstraClient::logout`]. Every request carries the session token in the
//! `AUTHTOKEN` header.
//!
//! # Example
//!
//! ```rust,no_run
//! use edge_peering::adapters::{ApstraClient, ApstraConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApstraConfig::from_target("apstra.example.net", 443, "admin", "secret");
//!     let client = ApstraClient::connect(config).await?;
//!
//!     // Collect, synthesize, publish...
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```

pub mod qe;
pub mod wire;

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::{
    BlueprintId, SecurityZoneRecord, SystemRecord, VirtualNetworkRecord, VirtualNetworkSummary,
};
use crate::errors::{CollaboratorError, CollaboratorResult};
use crate::property_set::{PropertySetStore, PropertySetSummary};
use crate::snapshot::DesignModelSource;
use crate::topology::{NodeMatch, TraversalSpec};
use crate::workflow::{BlueprintSummary, BlueprintWorkflow, CommitCheckOutcome};

use wire::{
    BlueprintResponse, ConfigContextEnvelope, CreatedResponse, DeployRequest, DeployStatus,
    ItemList, LoginRequest, LoginResponse, PropertySetItem, PropertySetPayload, QueryRequest,
    QueryResponse, SystemListItem, VirtualNetworkList,
};

const AUTH_HEADER: &str = "AUTHTOKEN";

/// Configuration for an Apstra session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApstraConfig {
    /// API base URL, e.g. "https://apstra.example.net/api"
    pub base_url: String,

    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept self-signed server certificates
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_accept_invalid_certs() -> bool {
    true
}

impl Default for ApstraConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost/api".to_string(),
            username: "admin".to_string(),
            password: String::new(),
            timeout_secs: default_timeout(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

impl ApstraConfig {
    /// Build the API URL from a host and TCP port; 443 is left implicit
    pub fn from_target(
        target: &str,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let base_url = if port == 443 {
            format!("https://{}/api", target)
        } else {
            format!("https://{}:{}/api", target, port)
        };

        Self {
            base_url,
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        CollaboratorError::Http(err.to_string())
    }
}

/// An authenticated Apstra session
pub struct ApstraClient {
    config: ApstraConfig,
    client: Client,
    token: String,
}

impl ApstraClient {
    /// Log in and hold the session token
    pub async fn connect(config: ApstraConfig) -> CollaboratorResult<Self> {
        info!("Connecting to Apstra at {}", config.base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| {
                CollaboratorError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let response = client
            .post(format!("{}/aaa/login", config.base_url))
            .json(&LoginRequest {
                username: &config.username,
                password: &config.password,
            })
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            let status = response.status();
            return Err(CollaboratorError::Authentication(format!(
                "login as '{}' returned HTTP {}",
                config.username, status
            )));
        }

        let login: LoginResponse = response.json().await?;
        info!("Logged in to Apstra as {}", config.username);

        Ok(Self {
            config,
            client,
            token: login.token,
        })
    }

    /// End the session
    pub async fn logout(self) -> CollaboratorResult<()> {
        let response = self.request(Method::POST, "/aaa/logout").send().await?;
        if response.status() == StatusCode::OK {
            info!("Logged out from Apstra");
            Ok(())
        } else {
            warn!("Clean logout from Apstra failed: HTTP {}", response.status());
            Err(unexpected("logout", response).await)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.config.base_url, path))
            .header(AUTH_HEADER, &self.token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &str,
    ) -> CollaboratorResult<T> {
        debug!("GET {}", path);
        let response = self.request(Method::GET, path).send().await?;
        decode(operation, response).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        operation: &str,
    ) -> CollaboratorResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, path);
        let response = self.request(method, path).json(body).send().await?;
        decode(operation, response).await
    }

    async fn send_expecting_success<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        operation: &str,
    ) -> CollaboratorResult<()>
    where
        B: Serialize + ?Sized,
    {
        debug!("{} {}", method, path);
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(unexpected(operation, response).await)
        }
    }

    async fn fetch_system_context(
        &self,
        blueprint: &BlueprintId,
        system_id: &str,
    ) -> CollaboratorResult<SystemRecord> {
        let envelope: ConfigContextEnvelope = self
            .get_json(
                &format!("{}/systems/{}/config-context", bp_path(blueprint), encode(system_id)),
                "fetch system config context",
            )
            .await?;
        envelope.into_system_record()
    }
}

fn bp_path(blueprint: &BlueprintId) -> String {
    format!("/blueprints/{}", blueprint)
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> CollaboratorResult<T> {
    if !response.status().is_success() {
        return Err(unexpected(operation, response).await);
    }
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| CollaboratorError::Decode(format!("{}: {}", operation, e)))
}

async fn unexpected(operation: &str, response: Response) -> CollaboratorError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    CollaboratorError::UnexpectedStatus {
        operation: operation.to_string(),
        status,
        body,
    }
}

#[async_trait]
impl DesignModelSource for ApstraClient {
    async fn fetch_systems_with_context(
        &self,
        fabric: &BlueprintId,
    ) -> CollaboratorResult<Vec<SystemRecord>> {
        let list: ItemList<SystemListItem> = self
            .get_json(&format!("{}/systems", bp_path(fabric)), "list systems")
            .await?;
        let system_ids: Vec<String> = list
            .items
            .into_iter()
            .filter_map(|item| item.system_id)
            .collect();
        debug!("Blueprint {} has {} systems", fabric, system_ids.len());

        try_join_all(system_ids.iter().map(|id| self.fetch_system_context(fabric, id))).await
    }

    async fn fetch_virtual_networks(
        &self,
        fabric: &BlueprintId,
    ) -> CollaboratorResult<Vec<VirtualNetworkSummary>> {
        let list: VirtualNetworkList = self
            .get_json(&format!("{}/virtual-networks", bp_path(fabric)), "list virtual networks")
            .await?;
        list.into_summaries()
    }

    async fn fetch_virtual_network_detail(
        &self,
        fabric: &BlueprintId,
        vn_id: &str,
    ) -> CollaboratorResult<VirtualNetworkRecord> {
        self.get_json(
            &format!("{}/virtual-networks/{}", bp_path(fabric), encode(vn_id)),
            "fetch virtual network",
        )
        .await
    }

    async fn fetch_security_zone_detail(
        &self,
        fabric: &BlueprintId,
        sz_id: &str,
    ) -> CollaboratorResult<SecurityZoneRecord> {
        self.get_json(
            &format!("{}/security-zones/{}", bp_path(fabric), encode(sz_id)),
            "fetch security zone",
        )
        .await
    }

    async fn query_topology(
        &self,
        fabric: &BlueprintId,
        traversal: &TraversalSpec,
    ) -> CollaboratorResult<Vec<NodeMatch>> {
        let query = qe::render(traversal);
        debug!("QE: {}", query);
        let response: QueryResponse = self
            .send_json(
                Method::POST,
                &format!("{}/qe", bp_path(fabric)),
                &QueryRequest { query },
                "graph query",
            )
            .await?;
        if let Some(count) = response.count {
            if count != response.items.len() {
                warn!(
                    "Graph query reported {} matches but returned {}",
                    count,
                    response.items.len()
                );
            }
        }
        Ok(response.items)
    }
}

#[async_trait]
impl PropertySetStore for ApstraClient {
    async fn list_property_sets(
        &self,
        blueprint: &BlueprintId,
    ) -> CollaboratorResult<Vec<PropertySetSummary>> {
        let list: ItemList<PropertySetItem> = self
            .get_json(&format!("{}/property-sets", bp_path(blueprint)), "list property sets")
            .await?;
        list.items
            .into_iter()
            .map(|item| -> CollaboratorResult<PropertySetSummary> {
                Ok(PropertySetSummary {
                    id: item.address()?,
                    label: item.label,
                })
            })
            .collect()
    }

    async fn create_property_set(
        &self,
        blueprint: &BlueprintId,
        label: &str,
        values: &serde_json::Value,
    ) -> CollaboratorResult<String> {
        let created: CreatedResponse = self
            .send_json(
                Method::POST,
                &format!("{}/property-sets", bp_path(blueprint)),
                &PropertySetPayload { label, values },
                "create property set",
            )
            .await?;
        Ok(created.id)
    }

    async fn replace_property_set(
        &self,
        blueprint: &BlueprintId,
        id: &str,
        label: &str,
        values: &serde_json::Value,
    ) -> CollaboratorResult<()> {
        self.send_expecting_success(
            Method::PATCH,
            &format!("{}/property-sets/{}", bp_path(blueprint), encode(id)),
            Some(&PropertySetPayload { label, values }),
            "replace property set",
        )
        .await
    }
}

#[async_trait]
impl BlueprintWorkflow for ApstraClient {
    async fn blueprint_summary(
        &self,
        blueprint: &BlueprintId,
    ) -> CollaboratorResult<BlueprintSummary> {
        let bp: BlueprintResponse = self.get_json(&bp_path(blueprint), "fetch blueprint").await?;
        info!("Blueprint {} is '{}' ({})", blueprint, bp.label, bp.design);
        Ok(bp.into())
    }

    async fn commit_check(
        &self,
        blueprint: &BlueprintId,
    ) -> CollaboratorResult<CommitCheckOutcome> {
        let response = self
            .request(Method::POST, &format!("{}/commit-check", bp_path(blueprint)))
            .send()
            .await?;
        let check = CommitCheckOutcome::from_check_status(response.status().as_u16());
        if check != CommitCheckOutcome::Passed {
            return Ok(check);
        }

        let result = self
            .request(Method::GET, &format!("{}/commit-check-result", bp_path(blueprint)))
            .send()
            .await?;
        Ok(CommitCheckOutcome::from_result_status(result.status().as_u16()))
    }

    async fn deployed_version(&self, blueprint: &BlueprintId) -> CollaboratorResult<u64> {
        let status: DeployStatus = self
            .get_json(&format!("{}/deploy", bp_path(blueprint)), "fetch deploy status")
            .await?;
        Ok(status.version)
    }

    async fn deploy(
        &self,
        blueprint: &BlueprintId,
        version: u64,
        description: &str,
    ) -> CollaboratorResult<()> {
        self.send_expecting_success(
            Method::PUT,
            &format!("{}/deploy", bp_path(blueprint)),
            Some(&DeployRequest { version, description }),
            "deploy blueprint",
        )
        .await
    }

    async fn revert(&self, blueprint: &BlueprintId) -> CollaboratorResult<()> {
        self.send_expecting_success::<()>(
            Method::POST,
            &format!("{}/revert", bp_path(blueprint)),
            None,
            "revert blueprint",
        )
        .await
    }
}
