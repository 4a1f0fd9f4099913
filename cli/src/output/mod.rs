// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Output
//!
//! Flattens a [`ResolutionReport`] into display rows shared by the terminal
//! table and the CSV export.
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Row model, name shortening, renderers

pub mod export;
pub mod table;

use checker_core::application::{ResolutionReport, ResolvedRule};

pub const HEADERS: [&str; 11] = [
    "id",
    "Source",
    "Destination",
    "VRF",
    "Contract",
    "Filter",
    "Action",
    "Prio",
    "Priority",
    "Direction",
    "State",
];

const GROUP_PREFIXES: [(&str, &str); 7] = [
    ("uni/tn-", ""),
    ("/ap-", "/"),
    ("/epg-", "/"),
    ("/out-", "/"),
    ("/instP-", "/"),
    ("/ldevCtx-c-", "/"),
    ("/ctx-", "/"),
];

const VRF_PREFIXES: [(&str, &str); 2] = [("uni/tn-", ""), ("/ctx-", "/")];

const CONTRACT_PREFIXES: [(&str, &str); 3] = [("uni/tn-", ""), ("/brc-", "/"), ("/bcr-", "/")];

fn shorten(name: &str, prefixes: &[(&str, &str)]) -> String {
    prefixes
        .iter()
        .fold(name.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Endpoint group names as shown in the Source and Destination columns.
pub fn shorten_group(name: &str) -> String {
    shorten(name, &GROUP_PREFIXES)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRow {
    pub id: String,
    pub source: String,
    pub destination: String,
    pub vrf: String,
    pub contract: String,
    pub filter: String,
    pub action: String,
    pub priority: u8,
    pub rule_class: String,
    pub direction: String,
    pub state: String,
}

impl RuleRow {
    pub fn from_resolved(resolved: &ResolvedRule) -> Self {
        let rule = &resolved.rule;
        Self {
            id: rule.id.clone(),
            source: shorten_group(&resolved.source.name),
            destination: shorten_group(&resolved.destination.name),
            vrf: shorten(resolved.domain_or_scope(), &VRF_PREFIXES),
            contract: shorten(resolved.filter_name(), &CONTRACT_PREFIXES),
            filter: rule.filter_id.clone(),
            action: rule.action.clone(),
            priority: resolved.priority,
            rule_class: rule.rule_class.to_string(),
            direction: rule.direction.clone(),
            state: rule.oper_state.clone(),
        }
    }

    /// Cells in [`HEADERS`] order.
    pub fn cells(&self) -> [String; 11] {
        [
            self.id.clone(),
            self.source.clone(),
            self.destination.clone(),
            self.vrf.clone(),
            self.contract.clone(),
            self.filter.clone(),
            self.action.clone(),
            self.priority.to_string(),
            self.rule_class.clone(),
            self.direction.clone(),
            self.state.clone(),
        ]
    }

    pub fn is_deny(&self) -> bool {
        self.action.contains("deny")
    }
}

pub fn rows(report: &ResolutionReport) -> Vec<RuleRow> {
    report.rules.iter().map(RuleRow::from_resolved).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use checker_core::application::{ResolvedTag, TagOrigin};
    use checker_core::class_tag::RuleTag;
    use checker_core::record::{Attributes, RawRecord, RecordKind};
    use checker_core::zoning_rule::ZoningRule;

    pub(crate) fn resolved(id: &str, source: &str, destination: &str, contract: &str, action: &str) -> ResolvedRule {
        let attrs: Attributes = [
            ("dn", format!("topology/pod-1/node-101/sys/actrl/scope-2818048/rule-{}", id)),
            ("id", id.to_string()),
            ("sPcTag", "49153".to_string()),
            ("dPcTag", "49154".to_string()),
            ("scopeId", "2818048".to_string()),
            ("fltId", "5".to_string()),
            ("ctrctName", contract.to_string()),
            ("direction", "bi-dir".to_string()),
            ("operSt", "enabled".to_string()),
            ("action", action.to_string()),
            ("prio", "fully_qual".to_string()),
        ]
        .into_iter()
        .collect();
        let rule = ZoningRule::from_record(&RawRecord::new(RecordKind::ActrlRule, attrs)).unwrap();
        let priority = rule.priority();
        ResolvedRule {
            source: ResolvedTag {
                raw: rule.source_tag.clone(),
                name: source.to_string(),
                origin: TagOrigin::Local,
            },
            destination: ResolvedTag {
                raw: RuleTag::parse("49154"),
                name: destination.to_string(),
                origin: TagOrigin::Local,
            },
            domain: Some("uni/tn-A/ctx-default".to_string()),
            rule,
            priority,
        }
    }

    #[test]
    fn test_group_names_are_shortened() {
        assert_eq!(shorten_group("uni/tn-A/ap-app/epg-web"), "A/app/web");
        assert_eq!(shorten_group("uni/tn-A/out-wan/instP-all(0.0.0.0/0)"), "A/wan/all(0.0.0.0/0)");
        assert_eq!(shorten_group("uni/tn-A/ctx-default"), "A/default");
        assert_eq!(shorten_group("any"), "any");
    }

    #[test]
    fn test_row_from_resolved_rule() {
        let row = RuleRow::from_resolved(&resolved(
            "4101",
            "uni/tn-A/ap-app/epg-web",
            "uni/tn-A/ap-app/epg-db",
            "A:web",
            "permit",
        ));

        assert_eq!(row.source, "A/app/web");
        assert_eq!(row.destination, "A/app/db");
        assert_eq!(row.vrf, "A/default");
        assert_eq!(row.contract, "A/web");
        assert_eq!(row.rule_class, "fully_qual");
        assert_eq!(row.priority, 7);
        assert!(!row.is_deny());
        assert_eq!(row.cells()[0], "4101");
        assert_eq!(row.cells()[7], "7");
    }

    #[test]
    fn test_deny_actions() {
        let row = RuleRow::from_resolved(&resolved("1", "any", "any", "", "deny,log"));
        assert!(row.is_deny());
        assert_eq!(row.contract, "5");
    }
}
