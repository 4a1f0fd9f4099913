// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Zoning-rule loader: the rule table of one leaf, optionally narrowed to a
//! contract.

use tracing::{debug, info};

use super::fetcher::PaginatedFetcher;
use crate::domain::contract::ContractRef;
use crate::domain::transport::{wildcard, Query};
use crate::domain::zoning_rule::ZoningRule;

pub const RULE_CLASS: &str = "actrlRule";

/// Filter id of the rules the fabric programs without a contract.
const DEFAULT_FILTER_ID: &str = "default";

pub fn rules_query(pod: u32, node: u32) -> Query {
    Query::node_class(pod, node, RULE_CLASS)
}

pub struct RuleLoader<'a> {
    fetcher: PaginatedFetcher<'a>,
    pod: u32,
    node: u32,
}

impl<'a> RuleLoader<'a> {
    pub fn new(fetcher: PaginatedFetcher<'a>, pod: u32, node: u32) -> Self {
        Self { fetcher, pod, node }
    }

    /// Load the leaf's rules. With a contract, only rules naming it are
    /// fetched; if there are none, the leaf's default-filter rules are loaded
    /// instead so the caller can still report what governs the traffic.
    pub async fn load(&self, contract: Option<&ContractRef>) -> Vec<ZoningRule> {
        let base = rules_query(self.pod, self.node);
        let records = match contract {
            None => self.fetcher.fetch_all(&base).await,
            Some(contract) => {
                let narrowed = base.clone().filter(wildcard(
                    RULE_CLASS,
                    "ctrctName",
                    &contract.rule_reference(),
                ));
                let records = self.fetcher.fetch_all(&narrowed).await;
                if records.is_empty() {
                    info!(%contract, "No zoning rules reference the contract, loading default rules");
                    self.fetcher
                        .fetch_all(&base.filter(wildcard(RULE_CLASS, "fltId", DEFAULT_FILTER_ID)))
                        .await
                } else {
                    records
                }
            }
        };

        let rules: Vec<ZoningRule> = records.iter().filter_map(ZoningRule::from_record).collect();
        debug!(pod = self.pod, node = self.node, rules = rules.len(), "Zoning rules loaded");
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{RawRecord, RecordKind};
    use crate::infrastructure::in_memory::InMemoryTransport;

    fn rule(id: &str, ctrct: &str, flt: &str) -> RawRecord {
        RawRecord::new(
            RecordKind::ActrlRule,
            [
                ("dn", format!("topology/pod-1/node-101/sys/actrl/scope-2818048/rule-{}", id)),
                ("id", id.to_string()),
                ("sPcTag", "49153".to_string()),
                ("dPcTag", "49154".to_string()),
                ("scopeId", "2818048".to_string()),
                ("fltId", flt.to_string()),
                ("ctrctName", ctrct.to_string()),
                ("prio", "fully_qual".to_string()),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[tokio::test]
    async fn test_loads_whole_table_without_contract() {
        let transport = InMemoryTransport::new().with_records(
            rules_query(1, 101),
            vec![rule("4101", "A:web", "5"), rule("4102", "", "implicit")],
        );

        let rules = RuleLoader::new(PaginatedFetcher::new(&transport), 1, 101).load(None).await;

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].filter_name, "uni/tn-A/brc-web");
        assert_eq!(rules[1].filter_name, "implicit");
    }

    #[tokio::test]
    async fn test_contract_narrows_server_side() {
        let narrowed = rules_query(1, 101).filter("wcard(actrlRule.ctrctName, \"A:web\")");
        let transport = InMemoryTransport::new().with_records(narrowed.clone(), vec![rule("4101", "A:web", "5")]);

        let contract = ContractRef::new("A", "web");
        let rules = RuleLoader::new(PaginatedFetcher::new(&transport), 1, 101)
            .load(Some(&contract))
            .await;

        assert_eq!(rules.len(), 1);
        assert_eq!(transport.requests(), vec![(narrowed, 0)]);
    }

    #[tokio::test]
    async fn test_falls_back_to_default_rules() {
        let fallback = rules_query(1, 101).filter("wcard(actrlRule.fltId, \"default\")");
        let transport = InMemoryTransport::new().with_records(fallback.clone(), vec![rule("4200", "", "default")]);

        let contract = ContractRef::new("A", "web");
        let rules = RuleLoader::new(PaginatedFetcher::new(&transport), 1, 101)
            .load(Some(&contract))
            .await;

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].filter_name, "default");
        assert!(transport.was_requested(&fallback));
    }
}
