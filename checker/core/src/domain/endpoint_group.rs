// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Endpoint-Group Catalog
//!
//! Two-level map from routing domain → (class tag → group identity), plus a
//! scope-agnostic map for tags below the local range. Each per-domain catalog
//! also answers for the domain's own class tag.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Class-tag → endpoint-group lookups

use std::collections::BTreeMap;
use tracing::debug;

use super::class_tag::{ClassTag, EXTERNAL_ANY};
use super::record::RecordKind;

/// Where a group record keeps its owning-scope reference and its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupFields {
    pub scope_attr: &'static str,
    pub identity_attr: &'static str,
}

impl GroupFields {
    /// Dispatch table for the endpoint-group record kinds.
    pub fn for_kind(kind: &RecordKind) -> Option<Self> {
        let (scope_attr, identity_attr) = match kind {
            RecordKind::FvEpP => ("scopeId", "epgPKey"),
            RecordKind::VzToEPg => ("scopeId", "epgDn"),
            RecordKind::FvRtdEpP => ("scopeId", "epgPKey"),
            RecordKind::FvInBEpP => ("scopeId", "epgPKey"),
            RecordKind::FvOoBEpP => ("scopeId", "epgPKey"),
            RecordKind::FvBD => ("scope", "dn"),
            RecordKind::FvBDDef => ("scope", "bdDn"),
            RecordKind::FvAEPg => ("scope", "dn"),
            RecordKind::VnsEPgDef => ("dn", "lIfCtxDn"),
            _ => return None,
        };
        Some(Self {
            scope_attr,
            identity_attr,
        })
    }
}

/// An endpoint group discovered for one routing domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointGroup {
    pub class_tag: ClassTag,
    pub name: String,
    pub owning_domain: String,
}

/// Result of looking a tag up inside one domain's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainHit<'a> {
    Group(&'a str),
    /// The tag is the domain's own class tag.
    Domain(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCatalog {
    domain: String,
    self_tag: Option<ClassTag>,
    groups: BTreeMap<ClassTag, String>,
}

impl DomainCatalog {
    pub fn new(domain: impl Into<String>, self_tag: Option<ClassTag>) -> Self {
        Self {
            domain: domain.into(),
            self_tag,
            groups: BTreeMap::new(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn self_tag(&self) -> Option<ClassTag> {
        self.self_tag
    }

    /// Register a group under `tag`. A later registration replaces an earlier
    /// one; the replaced name is returned.
    pub fn register(&mut self, tag: ClassTag, name: impl Into<String>) -> Option<String> {
        let name = name.into();
        let previous = self.groups.insert(tag, name);
        if let Some(prev) = &previous {
            if Some(prev) != self.groups.get(&tag) {
                debug!(domain = %self.domain, %tag, replaced = %prev, "Class tag re-registered");
            }
        }
        previous
    }

    pub fn lookup(&self, tag: ClassTag) -> Option<DomainHit<'_>> {
        if let Some(name) = self.groups.get(&tag) {
            return Some(DomainHit::Group(name));
        }
        (self.self_tag == Some(tag)).then_some(DomainHit::Domain(&self.domain))
    }

    /// Group owning this domain's default-route (0.0.0.0/0) external policy.
    pub fn external_any(&self) -> Option<&str> {
        self.groups.get(&EXTERNAL_ANY).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> impl Iterator<Item = (ClassTag, &str)> {
        self.groups.iter().map(|(tag, name)| (*tag, name.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointGroupCatalog {
    domains: BTreeMap<String, DomainCatalog>,
    global: BTreeMap<ClassTag, String>,
}

impl EndpointGroupCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog for `domain`, created on first use with the domain's self-tag.
    pub fn domain_entry(&mut self, domain: &str, self_tag: Option<ClassTag>) -> &mut DomainCatalog {
        self.domains
            .entry(domain.to_string())
            .or_insert_with(|| DomainCatalog::new(domain, self_tag))
    }

    pub fn register(&mut self, group: EndpointGroup, self_tag: Option<ClassTag>) {
        self.domain_entry(&group.owning_domain, self_tag)
            .register(group.class_tag, group.name);
    }

    pub fn register_global(&mut self, tag: ClassTag, name: impl Into<String>) {
        self.global.insert(tag, name.into());
    }

    pub fn domain(&self, name: &str) -> Option<&DomainCatalog> {
        self.domains.get(name)
    }

    pub fn global(&self, tag: ClassTag) -> Option<&str> {
        self.global.get(&tag).map(String::as_str)
    }

    pub fn external_any(&self, domain: &str) -> Option<&str> {
        self.domains.get(domain).and_then(DomainCatalog::external_any)
    }

    pub fn domains(&self) -> impl Iterator<Item = &DomainCatalog> {
        self.domains.values()
    }

    pub fn global_len(&self) -> usize {
        self.global.len()
    }

    /// Total number of registered tags across every domain and the global map.
    pub fn len(&self) -> usize {
        self.domains.values().map(DomainCatalog::len).sum::<usize>() + self.global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
