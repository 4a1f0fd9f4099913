// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Endpoint-Group Catalog Builder
//!
//! Scans the endpoint-group classes and files every group under its owning
//! routing domain. Groups whose tag lies below the local range are also filed
//! fabric-wide so they resolve without knowing the domain.
//!
//! Three kinds of record need special handling:
//!
//! - **Routed (external) groups** whose DN prefixes an external subnet of
//!   `0.0.0.0/0` own their domain's default-route policy. They are registered
//!   a second time under reserved tag 15 as `<group>(0.0.0.0/0)`.
//! - **Service-graph shadow groups** (`vnsEPgDef`) carry no scope. Local ones
//!   find their domain through the `S-[...]` segment of their DN; global ones
//!   are filed fabric-wide with the interface qualifier stripped.
//! - **Unknown scopes** are logged and the record is skipped.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Build the `EndpointGroupCatalog` from controller records

use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

use super::fetcher::PaginatedFetcher;
use crate::domain::class_tag::{ClassTag, BLACK_HOLE, DEFAULT_ROUTE_SUFFIX, EXTERNAL_ANY};
use crate::domain::distinguished_name::{shadow_group_domain, strip_shadow_qualifier};
use crate::domain::endpoint_group::{EndpointGroup, EndpointGroupCatalog, GroupFields};
use crate::domain::record::{RawRecord, RecordKind};
use crate::domain::routing_domain::VrfIndex;
use crate::domain::transport::{equals, wildcard, Query};

/// Classes scanned for endpoint groups, in processing order. `fvAREpP` is
/// abstract; the controller answers with its concrete subclasses.
pub const GROUP_CLASSES: [&str; 4] = ["fvAREpP", "vzToEPg", "fvBD", "vnsEPgDef"];

pub const EXTERNAL_SUBNET_CLASS: &str = "l3extSubnet";

/// Which routing domains to build the catalog for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogScope {
    #[default]
    All,
    /// Only these scopes. Classes without a scope attribute are still
    /// fetched whole.
    Scopes(BTreeSet<String>),
}

impl CatalogScope {
    pub fn scopes<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CatalogScope::Scopes(scopes.into_iter().map(Into::into).collect())
    }
}

/// Attribute used to narrow a group class by scope, if it has one.
fn narrowing_attr(class: &str) -> Option<&'static str> {
    match class {
        "fvAREpP" | "vzToEPg" => Some("scopeId"),
        "fvBD" => Some("scope"),
        _ => None,
    }
}

/// External subnets for the default route.
pub fn default_route_subnets_query() -> Query {
    Query::class(EXTERNAL_SUBNET_CLASS).filter(equals(EXTERNAL_SUBNET_CLASS, "ip", "0.0.0.0/0"))
}

pub struct CatalogBuilder<'a> {
    fetcher: PaginatedFetcher<'a>,
    vrfs: &'a VrfIndex,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(fetcher: PaginatedFetcher<'a>, vrfs: &'a VrfIndex) -> Self {
        Self { fetcher, vrfs }
    }

    pub async fn build(&self, scope: &CatalogScope) -> EndpointGroupCatalog {
        let mut catalog = EndpointGroupCatalog::new();
        if self.vrfs.is_empty() {
            warn!("VRF index is empty, skipping endpoint group discovery");
            return catalog;
        }

        for class in GROUP_CLASSES {
            let mut records = Vec::new();
            for query in Self::queries(class, scope) {
                records.extend(self.fetcher.fetch_all(&query).await);
            }

            let default_route_subnets: Vec<String> = if class == "fvAREpP" {
                self.fetcher
                    .fetch_all(&default_route_subnets_query())
                    .await
                    .iter()
                    .filter_map(|subnet| subnet.dn().map(str::to_string))
                    .collect()
            } else {
                Vec::new()
            };

            debug!(class, records = records.len(), "Indexing endpoint groups");
            for record in &records {
                self.ingest(&mut catalog, record, &default_route_subnets);
            }
        }

        catalog.register_global(BLACK_HOLE, self.vrfs.black_hole_name());

        debug!(
            domains = catalog.domains().count(),
            global = catalog.global_len(),
            tags = catalog.len(),
            "Endpoint group catalog built"
        );
        trace!(catalog = ?catalog, "Endpoint group catalog");
        catalog
    }

    fn queries(class: &str, scope: &CatalogScope) -> Vec<Query> {
        match (scope, narrowing_attr(class)) {
            (CatalogScope::Scopes(scopes), Some(attr)) => scopes
                .iter()
                .map(|s| Query::class(class).filter(wildcard(class, attr, s)))
                .collect(),
            _ => vec![Query::class(class)],
        }
    }

    fn ingest(&self, catalog: &mut EndpointGroupCatalog, record: &RawRecord, default_route_subnets: &[String]) {
        let Some(fields) = GroupFields::for_kind(&record.kind) else {
            trace!(kind = %record.kind, "Not an endpoint group record");
            return;
        };
        let tag = match record.attr("pcTag").map(str::parse::<ClassTag>) {
            Some(Ok(tag)) => tag,
            _ => {
                debug!(kind = %record.kind, dn = ?record.dn(), pc_tag = ?record.attr("pcTag"), "Group without a numeric class tag");
                return;
            }
        };
        let identity = record.attributes.get_or_empty(fields.identity_attr);
        let scope_ref = record.attributes.get_or_empty(fields.scope_attr);

        if record.kind == RecordKind::VnsEPgDef {
            self.ingest_shadow(catalog, tag, scope_ref, identity);
            return;
        }

        match self.vrfs.name_for_scope(scope_ref) {
            Some(domain) => {
                let self_tag = self.vrfs.self_tag(domain);
                catalog.register(
                    EndpointGroup {
                        class_tag: tag,
                        name: identity.to_string(),
                        owning_domain: domain.to_string(),
                    },
                    self_tag,
                );

                if record.kind == RecordKind::FvRtdEpP
                    && !identity.is_empty()
                    && default_route_subnets.iter().any(|dn| dn.contains(identity))
                {
                    debug!(domain, group = identity, "Default-route external policy");
                    catalog
                        .domain_entry(domain, self_tag)
                        .register(EXTERNAL_ANY, format!("{}{}", identity, DEFAULT_ROUTE_SUFFIX));
                }
            }
            None => warn!(scope = scope_ref, group = identity, "Undefined scope for endpoint group"),
        }

        if tag.is_fabric_wide() {
            catalog.register_global(tag, identity);
        }
    }

    fn ingest_shadow(&self, catalog: &mut EndpointGroupCatalog, tag: ClassTag, dn: &str, identity: &str) {
        if !tag.is_local() {
            catalog.register_global(tag, strip_shadow_qualifier(identity));
            return;
        }
        match shadow_group_domain(dn).filter(|domain| self.vrfs.contains_domain(domain)) {
            Some(domain) => {
                catalog.register(
                    EndpointGroup {
                        class_tag: tag,
                        name: identity.to_string(),
                        owning_domain: domain.to_string(),
                    },
                    self.vrfs.self_tag(domain),
                );
            }
            None => warn!(dn, group = identity, "Undefined scope for service graph group"),
        }
    }
}
