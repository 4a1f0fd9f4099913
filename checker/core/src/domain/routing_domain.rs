// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Routing Domain (VRF) Index
//!
//! Bidirectional identity table for the fabric's routing domains:
//! scope ↔ domain DN, plus each domain's own class tag. A domain's self-tag is
//! indexed fabric-wide only when it lies below the local range; local-range
//! self-tags mean something only inside their own scope.
//!
//! The fabric's built-in black-hole domain is always present.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Scope/name/tag lookups for routing domains

use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use super::class_tag::{ClassTag, BLACK_HOLE, BLACK_HOLE_DOMAIN};
use super::record::{RawRecord, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDomain {
    /// Hardware scope (VNID) as the controller reports it, e.g. `"2818048"`.
    pub scope: String,
    /// Domain DN, e.g. `uni/tn-A/ctx-default`.
    pub name: String,
    /// The domain's own class tag. Absent when the controller reports a
    /// non-numeric value.
    pub class_tag: Option<ClassTag>,
}

impl RoutingDomain {
    /// Decode a routing-domain record. Each of the three routing-domain kinds
    /// keeps its DN in a different attribute.
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        let name_attr = match record.kind {
            RecordKind::FvCtx | RecordKind::FvTnlCtx => "dn",
            RecordKind::FvCtxDef => "ctxDn",
            _ => return None,
        };
        let scope = record.attr("scope")?;
        let name = record.attr(name_attr)?;
        let class_tag = record.attr("pcTag").and_then(|raw| raw.parse().ok());

        Some(Self {
            scope: scope.to_string(),
            name: name.to_string(),
            class_tag,
        })
    }
}

#[derive(Debug, Clone)]
pub struct VrfIndex {
    name_by_scope: HashMap<String, String>,
    scope_by_name: HashMap<String, String>,
    self_tags: HashMap<String, ClassTag>,
    /// Fabric-wide tag → owning domain, for self-tags below the local range
    /// and the black-hole sentinel.
    domain_by_tag: BTreeMap<ClassTag, String>,
}

impl Default for VrfIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VrfIndex {
    pub fn new() -> Self {
        let mut domain_by_tag = BTreeMap::new();
        domain_by_tag.insert(BLACK_HOLE, BLACK_HOLE_DOMAIN.to_string());
        Self {
            name_by_scope: HashMap::new(),
            scope_by_name: HashMap::new(),
            self_tags: HashMap::new(),
            domain_by_tag,
        }
    }

    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut index = Self::new();
        for record in records {
            match RoutingDomain::from_record(record) {
                Some(domain) => index.insert(domain),
                None if matches!(
                    record.kind,
                    RecordKind::FvCtx | RecordKind::FvCtxDef | RecordKind::FvTnlCtx
                ) =>
                {
                    warn!(kind = %record.kind, dn = ?record.dn(), "Routing domain record without scope or name");
                }
                None => {}
            }
        }
        index
    }

    pub fn insert(&mut self, domain: RoutingDomain) {
        if let Some(tag) = domain.class_tag {
            self.self_tags.insert(domain.name.clone(), tag);
            if tag.is_fabric_wide() {
                self.domain_by_tag.insert(tag, domain.name.clone());
            }
        }
        self.name_by_scope
            .insert(domain.scope.clone(), domain.name.clone());
        self.scope_by_name.insert(domain.name, domain.scope);
    }

    pub fn name_for_scope(&self, scope: &str) -> Option<&str> {
        self.name_by_scope.get(scope).map(String::as_str)
    }

    pub fn scope_for_name(&self, name: &str) -> Option<&str> {
        self.scope_by_name.get(name).map(String::as_str)
    }

    /// The domain's own class tag.
    pub fn self_tag(&self, name: &str) -> Option<ClassTag> {
        self.self_tags.get(name).copied()
    }

    /// Domain whose fabric-wide self-tag is `tag` (or the black-hole domain).
    pub fn domain_for_tag(&self, tag: ClassTag) -> Option<&str> {
        self.domain_by_tag.get(&tag).map(String::as_str)
    }

    pub fn black_hole_name(&self) -> &str {
        BLACK_HOLE_DOMAIN
    }

    pub fn contains_domain(&self, name: &str) -> bool {
        self.scope_by_name.contains_key(name)
    }

    /// Number of domains learned from the controller (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.name_by_scope.len()
    }

    /// True when the controller contributed no domains.
    pub fn is_empty(&self) -> bool {
        self.name_by_scope.is_empty()
    }

    pub fn domains(&self) -> impl Iterator<Item = (&str, &str)> {
        self.name_by_scope
            .iter()
            .map(|(scope, name)| (scope.as_str(), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Attributes;

    fn ctx(kind: RecordKind, name_attr: &str, name: &str, scope: &str, tag: &str) -> RawRecord {
        RawRecord::new(
            kind,
            Attributes::from_iter([(name_attr, name), ("scope", scope), ("pcTag", tag)]),
        )
    }

    #[test]
    fn test_local_domain_is_not_globally_indexed() {
        let index = VrfIndex::from_records(&[ctx(
            RecordKind::FvCtx,
            "dn",
            "uni/tn-A/ctx-default",
            "2818048",
            "32770",
        )]);

        assert_eq!(index.name_for_scope("2818048"), Some("uni/tn-A/ctx-default"));
        assert_eq!(index.scope_for_name("uni/tn-A/ctx-default"), Some("2818048"));
        assert_eq!(index.self_tag("uni/tn-A/ctx-default"), Some(ClassTag(32770)));
        assert_eq!(index.domain_for_tag(ClassTag(32770)), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_global_domain_tag_is_mirrored() {
        let index = VrfIndex::from_records(&[ctx(
            RecordKind::FvCtx,
            "dn",
            "uni/tn-common/ctx-shared",
            "2097152",
            "5474",
        )]);

        assert_eq!(index.domain_for_tag(ClassTag(5474)), Some("uni/tn-common/ctx-shared"));
    }

    #[test]
    fn test_all_routing_domain_kinds_are_accepted() {
        let index = VrfIndex::from_records(&[
            ctx(RecordKind::FvCtxDef, "ctxDn", "uni/tn-B/ctx-b", "100", "49153"),
            ctx(RecordKind::FvTnlCtx, "dn", "uni/tn-C/ctx-c", "200", "49154"),
            ctx(RecordKind::FvBD, "dn", "uni/tn-C/BD-c", "300", "49155"),
        ]);

        assert_eq!(index.name_for_scope("100"), Some("uni/tn-B/ctx-b"));
        assert_eq!(index.name_for_scope("200"), Some("uni/tn-C/ctx-c"));
        assert_eq!(index.name_for_scope("300"), None);
    }

    #[test]
    fn test_black_hole_always_present() {
        let index = VrfIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.domain_for_tag(BLACK_HOLE), Some("uni/tn-infra/black-hole"));
    }

    #[test]
    fn test_non_numeric_tag_keeps_scope_mapping() {
        let index = VrfIndex::from_records(&[ctx(
            RecordKind::FvCtx,
            "dn",
            "uni/tn-A/ctx-odd",
            "42",
            "any",
        )]);

        assert_eq!(index.name_for_scope("42"), Some("uni/tn-A/ctx-odd"));
        assert_eq!(index.self_tag("uni/tn-A/ctx-odd"), None);
    }
}
