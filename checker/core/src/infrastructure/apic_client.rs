// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! APIC REST client
//!
//! HTTP implementation of [`FabricTransport`]. Authenticates once with
//! `aaaLogin` and sends the returned token as the `APIC-cookie` cookie on
//! every later request.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Controller session, version probe, paged class queries

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde_json::json;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

use crate::domain::config::CheckerConfig;
use crate::domain::record::{QueryResponse, RecordKind};
use crate::domain::transport::{FabricTransport, Query, TransportError};

const LOGIN_PATH: &str = "/api/aaaLogin.json";
const VERSION_PATH: &str = "/api/node/class/topology/pod-1/node-1/firmwareCtrlrRunning.json";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Cannot reach controller at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Login rejected by controller (HTTP {status})")]
    Rejected { status: u16 },

    #[error("Login response carried no token")]
    MissingToken,

    #[error("Cannot decode login response: {0}")]
    Decode(String),
}

/// Controller firmware version, e.g. `4.2(7f)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub raw: String,
    pub major: u32,
    pub minor: u32,
}

impl FirmwareVersion {
    /// Oldest release using the current class-tag ranges.
    pub const MINIMUM: (u32, u32) = (4, 1);

    pub fn parse(raw: &str) -> Option<Self> {
        let digits = |s: &str| -> Option<u32> {
            let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
            s[..end].parse().ok()
        };
        let raw = raw.trim();
        let (major, rest) = raw.split_once('.')?;
        Some(Self {
            raw: raw.to_string(),
            major: digits(major)?,
            minor: digits(rest)?,
        })
    }

    pub fn is_supported(&self) -> bool {
        (self.major, self.minor) >= Self::MINIMUM
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub struct ApicClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApicClient {
    pub fn new(base_url: impl Into<String>, verify_tls: bool) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &CheckerConfig) -> Result<Self> {
        let url = config
            .controller_url()
            .context("Controller URL is not configured")?;
        Self::new(url, config.controller.verify_tls)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let body = json!({
            "aaaUser": {
                "attributes": {
                    "name": username,
                    "pwd": password,
                }
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable {
                url: self.base_url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "Login response");
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let login: QueryResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        let token = login
            .imdata
            .iter()
            .find(|r| r.kind == RecordKind::AaaLogin)
            .and_then(|r| r.attr("token"))
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    /// Firmware version of the first controller.
    pub async fn controller_version(&self) -> Result<FirmwareVersion, TransportError> {
        let response = self.get(VERSION_PATH, &[]).await?;
        let raw = response
            .imdata
            .iter()
            .find(|r| r.kind == RecordKind::FirmwareCtrlrRunning)
            .and_then(|r| r.attr("version"))
            .ok_or_else(|| TransportError::Decode("no firmwareCtrlrRunning version".into()))?;
        FirmwareVersion::parse(raw)
            .ok_or_else(|| TransportError::Decode(format!("unrecognised version '{}'", raw)))
    }

    fn cookie(&self) -> Result<String, TransportError> {
        self.token
            .read()
            .as_ref()
            .map(|token| format!("APIC-cookie={}", token))
            .ok_or(TransportError::NotAuthenticated)
    }

    async fn get(&self, locator: &str, params: &[(&str, String)]) -> Result<QueryResponse, TransportError> {
        let url = format!("{}{}", self.base_url, locator);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::COOKIE, self.cookie()?)
            .query(params)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %url, params = ?params, "Controller response");
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                locator: locator.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        trace!(url = %url, body = %body, "Controller response body");
        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FabricTransport for ApicClient {
    async fn fetch_page(
        &self,
        query: &Query,
        page: u32,
        page_size: u32,
    ) -> Result<QueryResponse, TransportError> {
        let mut params: Vec<(&str, String)> = Vec::with_capacity(5);
        if let Some(target) = &query.query_target {
            params.push(("query-target", target.clone()));
        }
        if let Some(class) = &query.target_subtree_class {
            params.push(("target-subtree-class", class.clone()));
        }
        if let Some(filter) = &query.query_target_filter {
            params.push(("query-target-filter", filter.clone()));
        }
        params.push(("page-size", page_size.to_string()));
        params.push(("page", page.to_string()));

        let response = self.get(&query.locator, &params).await?;
        debug!(query = %query, page, total = response.total_count, "Page fetched");
        Ok(response)
    }
}
