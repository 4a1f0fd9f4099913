// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Resolution Session
//!
//! One top-level resolution: sequences the pipeline stages against a single
//! transport. Every index is built once per session and dropped with it; no
//! state survives between sessions.
//!
//! Stage order:
//!
//! 1. contract metadata (only when a contract is requested)
//! 2. zoning rules of the leaf
//! 3. VRF index
//! 4. endpoint-group catalog, narrowed to the rules' scopes for a contract
//! 5. filter attachments + correlation
//!
//! Each stage completes before the next begins.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrate the policy resolution pipeline

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

use super::catalog::{CatalogBuilder, CatalogScope};
use super::contract_loader::ContractLoader;
use super::correlator::{filter_attachments_query, Correlator, ResolvedRule};
use super::fetcher::PaginatedFetcher;
use super::rule_loader::RuleLoader;
use super::vrf_index::VrfIndexBuilder;
use crate::domain::contract::{Contract, ContractRef};
use crate::domain::transport::FabricTransport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRequest {
    pub pod: u32,
    pub node: u32,
    pub contract: Option<ContractRef>,
}

impl ResolutionRequest {
    pub fn node(pod: u32, node: u32) -> Self {
        Self {
            pod,
            node,
            contract: None,
        }
    }

    pub fn with_contract(mut self, contract: ContractRef) -> Self {
        self.contract = Some(contract);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub request: ResolutionRequest,
    /// Structure of the requested contract. `None` without a contract filter
    /// or when the controller does not know the contract.
    pub contract: Option<Contract>,
    /// Rules in presentation order.
    pub rules: Vec<ResolvedRule>,
    pub routing_domains: usize,
    pub endpoint_groups: usize,
}

impl ResolutionReport {
    fn empty(request: ResolutionRequest, contract: Option<Contract>) -> Self {
        Self {
            request,
            contract,
            rules: Vec::new(),
            routing_domains: 0,
            endpoint_groups: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub struct ResolutionSession<'a> {
    fetcher: PaginatedFetcher<'a>,
}

impl<'a> ResolutionSession<'a> {
    pub fn new(transport: &'a dyn FabricTransport, page_size: u32) -> Self {
        Self {
            fetcher: PaginatedFetcher::with_page_size(transport, page_size),
        }
    }

    pub async fn resolve(&self, request: ResolutionRequest) -> ResolutionReport {
        let contract_ref = request.contract.as_ref();

        let contract = match contract_ref {
            Some(c) => ContractLoader::new(self.fetcher).load(c).await,
            None => None,
        };

        let rules = RuleLoader::new(self.fetcher, request.pod, request.node)
            .load(contract_ref)
            .await;
        if rules.is_empty() {
            warn!(pod = request.pod, node = request.node, "No zoning rules loaded");
            return ResolutionReport::empty(request, contract);
        }

        let vrfs = VrfIndexBuilder::new(self.fetcher).build().await;

        let scope = match contract_ref {
            Some(_) => CatalogScope::Scopes(
                rules
                    .iter()
                    .map(|r| r.scope_id.clone())
                    .collect::<BTreeSet<_>>(),
            ),
            None => CatalogScope::All,
        };
        let catalog = CatalogBuilder::new(self.fetcher, &vrfs).build(&scope).await;

        let contract_dn = contract_ref.map(ContractRef::dn);
        let attachments = self
            .fetcher
            .fetch_all(&filter_attachments_query(
                request.pod,
                request.node,
                contract_dn.as_deref(),
            ))
            .await;

        let loaded = rules.len();
        let resolved = Correlator::new(&vrfs, &catalog).correlate(rules, &attachments, contract_dn.as_deref());
        info!(
            pod = request.pod,
            node = request.node,
            loaded,
            resolved = resolved.len(),
            "Resolution complete"
        );

        ResolutionReport {
            request,
            contract,
            rules: resolved,
            routing_domains: vrfs.len(),
            endpoint_groups: catalog.len(),
        }
    }
}
