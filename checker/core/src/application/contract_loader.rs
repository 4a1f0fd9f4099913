// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Contract metadata loader
//!
//! Reads one contract's structure: its consumers, providers and subjects, and
//! the filters each subject references.

use tracing::{debug, warn};

use super::fetcher::PaginatedFetcher;
use crate::domain::contract::{Contract, ContractRef};
use crate::domain::record::{RawRecord, RecordKind};
use crate::domain::transport::Query;

pub struct ContractLoader<'a> {
    fetcher: PaginatedFetcher<'a>,
}

impl<'a> ContractLoader<'a> {
    pub fn new(fetcher: PaginatedFetcher<'a>) -> Self {
        Self { fetcher }
    }

    /// `None` when the controller has no such contract.
    pub async fn load(&self, contract: &ContractRef) -> Option<Contract> {
        let contract_query = Query::managed_object(&contract.dn());
        let records = self.fetcher.fetch_all(&contract_query).await;
        let Some(dn) = records
            .iter()
            .find(|r| r.kind == RecordKind::VzBrCP)
            .and_then(RawRecord::dn)
        else {
            warn!(%contract, "Contract not found on the controller");
            return None;
        };

        let mut loaded = Contract::new(dn);
        loaded.consumers = self
            .child_attrs(&contract_query, RecordKind::VzRtCons, "tDn")
            .await
            .into_iter()
            .collect();
        loaded.providers = self
            .child_attrs(&contract_query, RecordKind::VzRtProv, "tDn")
            .await
            .into_iter()
            .collect();

        let subjects = self
            .fetcher
            .fetch_all(&contract_query.clone().children(RecordKind::VzSubj.class_name()))
            .await;
        for subject in subjects.iter().filter(|r| r.kind == RecordKind::VzSubj) {
            let (Some(subject_dn), Some(name)) = (subject.dn(), subject.attr("name")) else {
                debug!(record = ?subject, "Subject without dn or name");
                continue;
            };
            let subject_query = Query::managed_object(&contract.subject_dn(name));
            let filters = self
                .child_attrs(&subject_query, RecordKind::VzRsSubjFiltAtt, "tDn")
                .await;
            loaded.subjects.insert(subject_dn.to_string(), filters);
        }

        debug!(
            contract = %loaded.dn,
            consumers = loaded.consumers.len(),
            providers = loaded.providers.len(),
            subjects = loaded.subjects.len(),
            "Contract loaded"
        );
        Some(loaded)
    }

    /// `attr` of every child of `kind` under the queried object, in controller order.
    async fn child_attrs(&self, parent: &Query, kind: RecordKind, attr: &str) -> Vec<String> {
        self.fetcher
            .fetch_all(&parent.clone().children(kind.class_name()))
            .await
            .into_iter()
            .filter(|r| r.kind == kind)
            .filter_map(|r| r.attr(attr).map(str::to_string))
            .collect()
    }
}
