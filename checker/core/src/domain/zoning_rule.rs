// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Zoning Rules
//!
//! A zoning rule is one entry of a leaf's hardware policy table: a
//! (source tag, destination tag, scope) triple, a filter reference and an
//! action. [`RuleClass`] carries the fixed priority table used to order rules
//! for presentation.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Rule decoding, filter-name normalisation, priority table

use serde::{Deserialize, Serialize};
use std::fmt;

use super::class_tag::RuleTag;
use super::record::{RawRecord, RecordKind};

/// Filter identifiers the fabric uses for rules it programs on its own
/// (no contract behind them).
pub const IMPLICIT_FILTER_TOKENS: [&str; 3] = ["implicit", "implarp", "default"];

/// Rule class (`prio` attribute). Variant order is precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleClass {
    ClassEqFilter,
    ClassEqDeny,
    ClassEqAllow,
    ProvNonsharedToCons,
    BlackList,
    FabricInfra,
    FullyQual,
    SystemIncomplete,
    SrcDstAny,
    ShsrcAnyFiltPerm,
    ShsrcAnyAnyPerm,
    ShsrcAnyAnyDeny,
    SrcAnyFilter,
    AnyDestFilter,
    SrcAnyAny,
    AnyDestAny,
    AnyAnyFilter,
    GrpSrcAnyAnyDeny,
    GrpAnyDestAnyDeny,
    GrpAnyAnyAnyPermit,
    AnyAnyAny,
    AnyVrfAnyDeny,
    /// A class this table does not know. Sorts after every known class.
    Unknown(String),
}

static RULE_CLASSES: [(&str, RuleClass); 22] = [
    ("class-eq-filter", RuleClass::ClassEqFilter),
    ("class-eq-deny", RuleClass::ClassEqDeny),
    ("class-eq-allow", RuleClass::ClassEqAllow),
    ("prov-nonshared-to-cons", RuleClass::ProvNonsharedToCons),
    ("black_list", RuleClass::BlackList),
    ("fabric_infra", RuleClass::FabricInfra),
    ("fully_qual", RuleClass::FullyQual),
    ("system_incomplete", RuleClass::SystemIncomplete),
    ("src_dst_any", RuleClass::SrcDstAny),
    ("shsrc_any_filt_perm", RuleClass::ShsrcAnyFiltPerm),
    ("shsrc_any_any_perm", RuleClass::ShsrcAnyAnyPerm),
    ("shsrc_any_any_deny", RuleClass::ShsrcAnyAnyDeny),
    ("src_any_filter", RuleClass::SrcAnyFilter),
    ("any_dest_filter", RuleClass::AnyDestFilter),
    ("src_any_any", RuleClass::SrcAnyAny),
    ("any_dest_any", RuleClass::AnyDestAny),
    ("any_any_filter", RuleClass::AnyAnyFilter),
    ("grp_src_any_any_deny", RuleClass::GrpSrcAnyAnyDeny),
    ("grp_any_dest_any_deny", RuleClass::GrpAnyDestAnyDeny),
    ("grp_any_any_any_permit", RuleClass::GrpAnyAnyAnyPermit),
    ("any_any_any", RuleClass::AnyAnyAny),
    ("any_vrf_any_deny", RuleClass::AnyVrfAnyDeny),
];

impl RuleClass {
    pub fn parse(raw: &str) -> Self {
        RULE_CLASSES
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, class)| class.clone())
            .unwrap_or_else(|| RuleClass::Unknown(raw.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            RuleClass::Unknown(raw) => raw,
            known => RULE_CLASSES
                .iter()
                .find(|(_, class)| class == known)
                .map(|(name, _)| *name)
                .unwrap_or_default(),
        }
    }

    /// Display precedence: 1 is evaluated first, 22 last; unknown classes get 23.
    pub fn priority(&self) -> u8 {
        RULE_CLASSES
            .iter()
            .position(|(_, class)| class == self)
            .map(|idx| idx as u8 + 1)
            .unwrap_or(RULE_CLASSES.len() as u8 + 1)
    }
}

impl fmt::Display for RuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoningRule {
    pub dn: String,
    pub id: String,
    pub source_tag: RuleTag,
    pub dest_tag: RuleTag,
    pub scope_id: String,
    pub filter_id: String,
    /// Contract DN when the rule names one, otherwise the raw filter id.
    /// Rewritten by the correlator once the real contract is known.
    pub filter_name: String,
    pub direction: String,
    pub oper_state: String,
    pub action: String,
    pub rule_class: RuleClass,
}

impl ZoningRule {
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        if record.kind != RecordKind::ActrlRule {
            return None;
        }
        let attrs = &record.attributes;
        let filter_id = attrs.get_or_empty("fltId").to_string();
        let filter_name = normalize_filter_name(attrs.get_or_empty("ctrctName"))
            .unwrap_or_else(|| filter_id.clone());

        Some(Self {
            dn: attrs.get_or_empty("dn").to_string(),
            id: attrs.get_or_empty("id").to_string(),
            source_tag: RuleTag::parse(attrs.get_or_empty("sPcTag")),
            dest_tag: RuleTag::parse(attrs.get_or_empty("dPcTag")),
            scope_id: attrs.get_or_empty("scopeId").to_string(),
            filter_id,
            filter_name,
            direction: attrs.get_or_empty("direction").to_string(),
            oper_state: attrs.get_or_empty("operSt").to_string(),
            action: attrs.get_or_empty("action").to_string(),
            rule_class: RuleClass::parse(attrs.get_or_empty("prio")),
        })
    }

    /// True while the filter name is still a stand-in rather than a contract DN.
    pub fn has_placeholder_filter_name(&self) -> bool {
        IMPLICIT_FILTER_TOKENS.contains(&self.filter_name.as_str())
            || self.filter_name == self.filter_id
    }

    pub fn priority(&self) -> u8 {
        self.rule_class.priority()
    }
}

/// `"<tenant>:<contract>"` → `uni/tn-<tenant>/brc-<contract>`.
///
/// An empty tenant or contract half yields `None`, leaving the rule on its
/// `fltId` placeholder so filter-attachment matching can still name it. A
/// half-formed `uni/tn-A/brc-` would never match a contract.
pub fn normalize_filter_name(contract_ref: &str) -> Option<String> {
    let (tenant, contract) = contract_ref.split_once(':')?;
    let contract = contract.split(':').next().unwrap_or(contract);
    if tenant.is_empty() || contract.is_empty() {
        return None;
    }
    Some(format!("uni/tn-{}/brc-{}", tenant, contract))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class_tag::ClassTag;
    use crate::domain::record::Attributes;

    fn rule_record(ctrct: &str, flt: &str, prio: &str) -> RawRecord {
        RawRecord::new(
            RecordKind::ActrlRule,
            Attributes::from_iter([
                ("dn", "topology/pod-1/node-101/sys/actrl/scope-2818048/rule-2818048-s-49153-d-49154-f-5"),
                ("id", "4101"),
                ("sPcTag", "49153"),
                ("dPcTag", "any"),
                ("scopeId", "2818048"),
                ("fltId", flt),
                ("ctrctName", ctrct),
                ("direction", "uni-dir"),
                ("operSt", "enabled"),
                ("action", "permit"),
                ("prio", prio),
            ]),
        )
    }

    #[test]
    fn test_priority_table_endpoints() {
        assert_eq!(RuleClass::parse("class-eq-filter").priority(), 1);
        assert_eq!(RuleClass::parse("fully_qual").priority(), 7);
        assert_eq!(RuleClass::parse("any_vrf_any_deny").priority(), 22);
        assert_eq!(RuleClass::parse("brand_new_class").priority(), 23);
        assert_eq!(RuleClass::parse("src_any_any").name(), "src_any_any");
        assert_eq!(RuleClass::parse("brand_new_class").name(), "brand_new_class");
    }

    #[test]
    fn test_rule_with_contract_reference() {
        let rule = ZoningRule::from_record(&rule_record("A:web-to-db", "5", "fully_qual")).unwrap();
        assert_eq!(rule.filter_name, "uni/tn-A/brc-web-to-db");
        assert_eq!(rule.source_tag, RuleTag::Class(ClassTag(49153)));
        assert_eq!(rule.dest_tag, RuleTag::Any);
        assert_eq!(rule.rule_class, RuleClass::FullyQual);
        assert!(!rule.has_placeholder_filter_name());
    }

    #[test]
    fn test_rule_without_contract_falls_back_to_filter_id() {
        let rule = ZoningRule::from_record(&rule_record("", "implicit", "any_any_any")).unwrap();
        assert_eq!(rule.filter_name, "implicit");
        assert!(rule.has_placeholder_filter_name());

        let bare = ZoningRule::from_record(&rule_record("web-to-db", "7", "src_any_any")).unwrap();
        assert_eq!(bare.filter_name, "7");
        assert!(bare.has_placeholder_filter_name());
    }

    #[test]
    fn test_non_rule_record_is_ignored() {
        let record = RawRecord::new(RecordKind::FvCtx, Attributes::default());
        assert!(ZoningRule::from_record(&record).is_none());
    }

    #[test]
    fn test_normalize_filter_name_edge_cases() {
        assert_eq!(normalize_filter_name("A:b"), Some("uni/tn-A/brc-b".to_string()));
        assert_eq!(normalize_filter_name("A:b:extra"), Some("uni/tn-A/brc-b".to_string()));
        assert_eq!(normalize_filter_name(":b"), None);
        assert_eq!(normalize_filter_name("A:"), None);
        assert_eq!(normalize_filter_name("plain"), None);
    }
}
