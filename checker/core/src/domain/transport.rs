// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Fabric Transport Interface
//!
//! The engine reads the controller exclusively through [`FabricTransport`]:
//! one call per page of a class or managed-object query. Implementations live
//! in `crate::infrastructure` (`ApicClient` over HTTP, `InMemoryTransport`
//! for tests and replays).
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Anti-corruption boundary between the engine and the controller API

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use super::record::QueryResponse;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status} from {locator}")]
    Http { status: u16, locator: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not authenticated: call login first")]
    NotAuthenticated,
}

/// A class or managed-object query. Paging is supplied separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Query {
    /// Path under the controller URL, e.g. `/api/node/class/fvCtx.json`.
    pub locator: String,
    pub query_target: Option<String>,
    pub target_subtree_class: Option<String>,
    pub query_target_filter: Option<String>,
}

impl Query {
    /// Every object of `class` in the fabric.
    pub fn class(class: &str) -> Self {
        Self::at(format!("/api/node/class/{}.json", class))
    }

    /// Every object of `class` below one switch.
    pub fn node_class(pod: u32, node: u32, class: &str) -> Self {
        Self::at(format!(
            "/api/node/class/topology/pod-{}/node-{}/{}.json",
            pod, node, class
        ))
    }

    /// A single managed object by DN.
    pub fn managed_object(dn: &str) -> Self {
        Self::at(format!("/api/node/mo/{}.json", dn))
    }

    fn at(locator: String) -> Self {
        Self {
            locator,
            ..Default::default()
        }
    }

    /// Server-side filter expression (`query-target-filter`).
    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.query_target_filter = Some(expression.into());
        self
    }

    /// Direct children of the object, restricted to one class.
    pub fn children(mut self, class: &str) -> Self {
        self.query_target = Some("children".to_string());
        self.target_subtree_class = Some(class.to_string());
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locator)?;
        if let Some(target) = &self.query_target {
            write!(f, " query-target={}", target)?;
        }
        if let Some(class) = &self.target_subtree_class {
            write!(f, " target-subtree-class={}", class)?;
        }
        if let Some(filter) = &self.query_target_filter {
            write!(f, " query-target-filter={}", filter)?;
        }
        Ok(())
    }
}

/// `wcard(<class>.<attr>, "<value>")`
pub fn wildcard(class: &str, attr: &str, value: &str) -> String {
    format!("wcard({}.{}, \"{}\")", class, attr, value)
}

/// `eq(<class>.<attr>, "<value>")`
pub fn equals(class: &str, attr: &str, value: &str) -> String {
    format!("eq({}.{}, \"{}\")", class, attr, value)
}

#[async_trait]
pub trait FabricTransport: Send + Sync {
    /// Fetch page `page` (0-based) of `query` with `page_size` records per page.
    async fn fetch_page(
        &self,
        query: &Query,
        page: u32,
        page_size: u32,
    ) -> Result<QueryResponse, TransportError>;
}
