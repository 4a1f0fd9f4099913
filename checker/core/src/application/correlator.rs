// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Rule Correlator
//!
//! Turns raw zoning rules into [`ResolvedRule`]s: both class tags named,
//! the scope mapped to its routing domain, and placeholder filter names
//! replaced by the contract that really produced the rule.
//!
//! # Tag resolution
//!
//! The tag's range picks exactly one catalog:
//!
//! 1. Reserved (0–15): a labelled tag other than 0 first tries the rule
//!    domain's default-route external policy; otherwise the fixed label
//!    table. Tag 0 is always `any`.
//! 2. Global (16–16385): the fabric-wide catalog.
//! 3. Local (16386+): the rule domain's catalog.
//!
//! Misses fall back to the VRF index, since a tag can name a routing domain
//! itself when routes leak between domains.
//!
//! # Filter-name resolution
//!
//! Rules without a contract reference are matched against the leaf's filter
//! attachments. An attachment matches when its DN contains the names of both
//! resolved tags and the rule's filter id. An `any` side must find the vzAny
//! segment (`.../ctx-X/any`) in the DN. The first match wins; its
//! `/cdef-[...]` segment names the contract.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Correlate zoning rules with endpoint groups and contracts

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::domain::class_tag::{ClassTag, RuleTag, TagRange, DEFAULT_ROUTE_SUFFIX, EXTERNAL_ANY};
use crate::domain::distinguished_name::contract_definition;
use crate::domain::endpoint_group::{DomainHit, EndpointGroupCatalog};
use crate::domain::record::RawRecord;
use crate::domain::routing_domain::VrfIndex;
use crate::domain::transport::{wildcard, Query};
use crate::domain::zoning_rule::ZoningRule;

pub const FILTER_ATTACHMENT_CLASS: &str = "vzRsRFltAtt";

/// Reserved tag that always reads as "any", whatever the domain.
const ANY_TAG: ClassTag = ClassTag(0);

/// Token standing in for a reserved external-any tag when leaking put it in a
/// domain without its own default-route policy.
const EXTERNAL_ANY_FALLBACK_TOKEN: &str = "instP-";

/// Filter attachments programmed on one leaf, optionally only those rendered
/// for one contract.
pub fn filter_attachments_query(pod: u32, node: u32, contract_dn: Option<&str>) -> Query {
    let query = Query::node_class(pod, node, FILTER_ATTACHMENT_CLASS);
    match contract_dn {
        Some(dn) => query.filter(wildcard(FILTER_ATTACHMENT_CLASS, "dn", dn)),
        None => query,
    }
}

/// Where a tag's name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TagOrigin {
    Any,
    Reserved,
    /// Labelled reserved tag overridden by the domain's default-route external policy.
    ExternalAny,
    Global,
    Local,
    RoutingDomain,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTag {
    pub raw: RuleTag,
    pub name: String,
    pub origin: TagOrigin,
}

impl ResolvedTag {
    fn new(raw: &RuleTag, name: impl Into<String>, origin: TagOrigin) -> Self {
        Self {
            raw: raw.clone(),
            name: name.into(),
            origin,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.origin != TagOrigin::Unresolved
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRule {
    pub rule: ZoningRule,
    /// Routing domain of the rule's scope, when the VRF index knows it.
    pub domain: Option<String>,
    pub source: ResolvedTag,
    pub destination: ResolvedTag,
    pub priority: u8,
}

impl ResolvedRule {
    /// Routing domain name, or the raw scope when it could not be resolved.
    pub fn domain_or_scope(&self) -> &str {
        self.domain.as_deref().unwrap_or(&self.rule.scope_id)
    }

    pub fn filter_name(&self) -> &str {
        &self.rule.filter_name
    }
}

pub struct Correlator<'a> {
    vrfs: &'a VrfIndex,
    catalog: &'a EndpointGroupCatalog,
}

impl<'a> Correlator<'a> {
    pub fn new(vrfs: &'a VrfIndex, catalog: &'a EndpointGroupCatalog) -> Self {
        Self { vrfs, catalog }
    }

    /// Resolve, rename, purge and order `rules`.
    ///
    /// `attachments` are the leaf's filter-attachment records. With
    /// `contract_dn`, every rule whose final filter name differs from it is
    /// dropped.
    pub fn correlate(
        &self,
        rules: Vec<ZoningRule>,
        attachments: &[RawRecord],
        contract_dn: Option<&str>,
    ) -> Vec<ResolvedRule> {
        let attachment_dns: Vec<&str> = attachments.iter().filter_map(RawRecord::dn).collect();
        let total = rules.len();

        let mut resolved: Vec<ResolvedRule> = rules
            .into_iter()
            .map(|rule| {
                let mut resolved = self.resolve_rule(rule);
                self.resolve_filter_name(&mut resolved, &attachment_dns);
                resolved
            })
            .collect();

        if let Some(contract_dn) = contract_dn {
            resolved.retain(|r| r.rule.filter_name == contract_dn);
            debug!(
                contract = contract_dn,
                kept = resolved.len(),
                purged = total - resolved.len(),
                "Purged rules of other contracts"
            );
        }

        resolved.sort_by_key(|r| r.priority);
        trace!(rules = ?resolved, "Correlated rules");
        resolved
    }

    pub fn resolve_rule(&self, rule: ZoningRule) -> ResolvedRule {
        let domain = self.vrfs.name_for_scope(&rule.scope_id).map(str::to_string);
        if domain.is_none() {
            warn!(rule = %rule.id, scope = %rule.scope_id, "Rule scope not in VRF index");
        }
        let source = self.resolve_tag(&rule.source_tag, domain.as_deref());
        let destination = self.resolve_tag(&rule.dest_tag, domain.as_deref());
        let priority = rule.priority();

        ResolvedRule {
            rule,
            domain,
            source,
            destination,
            priority,
        }
    }

    /// Name `tag` as seen from `domain`.
    pub fn resolve_tag(&self, tag: &RuleTag, domain: Option<&str>) -> ResolvedTag {
        let class_tag = match tag {
            RuleTag::Any => return ResolvedTag::new(tag, "any", TagOrigin::Any),
            RuleTag::Unparsed(raw) => {
                warn!(tag = %raw, "Unparseable class tag");
                return ResolvedTag::new(tag, raw.as_str(), TagOrigin::Unresolved);
            }
            RuleTag::Class(class_tag) => *class_tag,
        };

        let hit = match class_tag.range() {
            TagRange::Reserved => class_tag.reserved_label().map(|label| {
                let external_any = (class_tag != ANY_TAG)
                    .then(|| domain.and_then(|d| self.catalog.external_any(d)))
                    .flatten();
                match external_any {
                    Some(name) => (name, TagOrigin::ExternalAny),
                    None => (label, TagOrigin::Reserved),
                }
            }),
            TagRange::Global => self
                .catalog
                .global(class_tag)
                .map(|name| (name, TagOrigin::Global)),
            TagRange::Local => domain
                .and_then(|d| self.catalog.domain(d))
                .and_then(|catalog| catalog.lookup(class_tag))
                .map(|hit| match hit {
                    DomainHit::Group(name) => (name, TagOrigin::Local),
                    DomainHit::Domain(name) => (name, TagOrigin::RoutingDomain),
                }),
        };

        match hit {
            Some((name, origin)) => ResolvedTag::new(tag, name, origin),
            None => self.resolve_as_domain(tag, class_tag, domain),
        }
    }

    fn resolve_as_domain(&self, tag: &RuleTag, class_tag: ClassTag, domain: Option<&str>) -> ResolvedTag {
        match self.vrfs.domain_for_tag(class_tag) {
            Some(name) => ResolvedTag::new(tag, name, TagOrigin::RoutingDomain),
            None => {
                warn!(tag = %class_tag, domain = ?domain, "Class tag not found in catalog or VRF index");
                ResolvedTag::new(tag, class_tag.to_string(), TagOrigin::Unresolved)
            }
        }
    }

    fn resolve_filter_name(&self, resolved: &mut ResolvedRule, attachment_dns: &[&str]) {
        if !resolved.rule.has_placeholder_filter_name() {
            return;
        }
        let domain = resolved.domain.as_deref();
        let source = self.comparison_token(&resolved.source, domain);
        let destination = self.comparison_token(&resolved.destination, domain);
        let filter_id = resolved.rule.filter_id.as_str();

        for dn in attachment_dns {
            if !(dn.contains(&source) && dn.contains(&destination) && dn.contains(filter_id)) {
                continue;
            }
            match contract_definition(dn) {
                Some(contract) => {
                    debug!(rule = %resolved.rule.id, contract, "Filter name resolved");
                    resolved.rule.filter_name = contract.to_string();
                    return;
                }
                None => debug!(
                    rule = %resolved.rule.id,
                    attachment = dn,
                    source = %resolved.source.name,
                    destination = %resolved.destination.name,
                    filter = filter_id,
                    "Matching attachment names no contract definition"
                ),
            }
        }
    }

    /// Text a matching attachment DN must contain for this resolved tag.
    fn comparison_token(&self, tag: &ResolvedTag, domain: Option<&str>) -> String {
        let token = match tag.origin {
            TagOrigin::Any => "any",
            TagOrigin::RoutingDomain => self.catalog.external_any(&tag.name).unwrap_or(tag.name.as_str()),
            TagOrigin::Reserved if tag.raw == RuleTag::Class(EXTERNAL_ANY) => domain
                .and_then(|d| self.catalog.external_any(d))
                .unwrap_or(EXTERNAL_ANY_FALLBACK_TOKEN),
            _ => tag.name.as_str(),
        };
        token.replace(DEFAULT_ROUTE_SUFFIX, "")
    }
}
