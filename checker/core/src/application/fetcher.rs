// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Paginated Fetcher
//!
//! "Fetch every record of this query" on top of a page-at-a-time transport.
//!
//! The controller may return overlapping records across pages, so the stop
//! condition uses a duplicate-aware aggregate count (see [`aggregate_count`])
//! instead of the raw number of records received. Transport failures are not
//! escalated: the whole fetch degrades to an empty result so later stages see
//! "nothing found".
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Page aggregation and de-duplication over `FabricTransport`

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace, warn};

use crate::domain::config::DEFAULT_PAGE_SIZE;
use crate::domain::record::RawRecord;
use crate::domain::transport::{FabricTransport, Query};

/// Count accumulated records for the pagination stop test.
///
/// Records are grouped by class. Normally the count is the sum over all
/// groups, but when the single largest group alone already equals
/// `total_count`, that value wins: overlapping pages inflate the sum, and the
/// largest group matching the declared total is the stronger signal.
pub fn aggregate_count(records: &[RawRecord], total_count: usize) -> usize {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *groups.entry(record.kind.class_name()).or_default() += 1;
    }
    let sum: usize = groups.values().sum();
    let largest = groups.values().copied().max().unwrap_or(0);
    if largest == total_count {
        largest
    } else {
        sum
    }
}

#[derive(Clone, Copy)]
pub struct PaginatedFetcher<'a> {
    transport: &'a dyn FabricTransport,
    page_size: u32,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(transport: &'a dyn FabricTransport) -> Self {
        Self::with_page_size(transport, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(transport: &'a dyn FabricTransport, page_size: u32) -> Self {
        Self {
            transport,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch every page of `query`. Returns an empty vector on any transport failure.
    pub async fn fetch_all(&self, query: &Query) -> Vec<RawRecord> {
        let mut page = 0u32;
        let first = match self.transport.fetch_page(query, page, self.page_size).await {
            Ok(response) => response,
            Err(e) => {
                warn!(query = %query, error = %e, "Fetch failed, treating as empty");
                return Vec::new();
            }
        };

        let mut total = first.total_count;
        let mut records = first.imdata;

        while aggregate_count(&records, total) < total {
            page += 1;
            match self.transport.fetch_page(query, page, self.page_size).await {
                Ok(response) => {
                    total = response.total_count;
                    if response.imdata.is_empty() {
                        warn!(
                            query = %query,
                            page,
                            received = records.len(),
                            total,
                            "Controller returned an empty page before totalCount was reached"
                        );
                        break;
                    }
                    records.extend(response.imdata);
                }
                Err(e) => {
                    warn!(query = %query, page, error = %e, "Page fetch failed, treating as empty");
                    return Vec::new();
                }
            }
        }

        let aggregate = aggregate_count(&records, total);
        if aggregate > total {
            warn!(
                query = %query,
                aggregate,
                total,
                "More elements than totalCount, controller pagination overlapped"
            );
        }
        debug!(query = %query, pages = page + 1, received = records.len(), total, "Fetch complete");

        let records = dedup(records);
        trace!(query = %query, records = ?records, "Fetched records");
        records
    }
}

/// Drop records repeated across pages, keeping first-seen order. Records
/// without a DN are compared on their full content.
fn dedup(records: Vec<RawRecord>) -> Vec<RawRecord> {
    let mut seen_dns: HashSet<(String, String)> = HashSet::new();
    let mut seen_content: HashSet<RawRecord> = HashSet::new();
    let mut unique: Vec<RawRecord> = Vec::with_capacity(records.len());
    for record in records {
        let duplicate = match record.dn() {
            Some(dn) => !seen_dns.insert((record.kind.class_name().to_string(), dn.to_string())),
            None => !seen_content.insert(record.clone()),
        };
        if !duplicate {
            unique.push(record);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{Attributes, RecordKind};
    use crate::infrastructure::in_memory::InMemoryTransport;

    fn ctx(dn: &str) -> RawRecord {
        RawRecord::new(RecordKind::FvCtx, Attributes::from_iter([("dn", dn)]))
    }

    fn bd(dn: &str) -> RawRecord {
        RawRecord::new(RecordKind::FvBD, Attributes::from_iter([("dn", dn)]))
    }

    #[test]
    fn test_aggregate_count_sums_groups() {
        let records = vec![ctx("a"), ctx("a"), bd("b")];
        assert_eq!(aggregate_count(&records, 3), 3);
    }

    #[test]
    fn test_aggregate_count_prefers_largest_group_matching_total() {
        let records = vec![ctx("a"), ctx("b"), bd("x")];
        assert_eq!(aggregate_count(&records, 2), 2);
    }

    #[test]
    fn test_aggregate_count_empty() {
        assert_eq!(aggregate_count(&[], 0), 0);
        assert_eq!(aggregate_count(&[], 5), 0);
    }

    #[tokio::test]
    async fn test_fetches_every_page() {
        let query = Query::class("fvCtx");
        let records: Vec<RawRecord> = (0..7).map(|i| ctx(&format!("uni/tn-A/ctx-{}", i))).collect();
        let transport = InMemoryTransport::new().with_records(query.clone(), records);

        let fetcher = PaginatedFetcher::with_page_size(&transport, 3);
        let fetched = fetcher.fetch_all(&query).await;

        assert_eq!(fetched.len(), 7);
        assert_eq!(transport.request_count(&query), 3);
    }

    #[tokio::test]
    async fn test_overlapping_duplicate_stops_at_total() {
        let query = Query::class("fvCtx");
        let transport = InMemoryTransport::new().with_pages(
            query.clone(),
            3,
            vec![vec![ctx("uni/tn-A/ctx-a"), ctx("uni/tn-A/ctx-a")], vec![bd("uni/tn-A/BD-b")]],
        );

        let fetcher = PaginatedFetcher::with_page_size(&transport, 2);
        let fetched = fetcher.fetch_all(&query).await;

        assert_eq!(transport.request_count(&query), 2);
        assert_eq!(fetched, vec![ctx("uni/tn-A/ctx-a"), bd("uni/tn-A/BD-b")]);
    }

    #[tokio::test]
    async fn test_failed_first_page_is_empty() {
        let query = Query::class("fvCtx");
        let transport = InMemoryTransport::new()
            .with_records(query.clone(), vec![ctx("uni/tn-A/ctx-a")])
            .failing(query.clone());

        let fetched = PaginatedFetcher::new(&transport).fetch_all(&query).await;
        assert!(fetched.is_empty());
        assert_eq!(transport.request_count(&query), 1);
    }

    #[tokio::test]
    async fn test_failed_later_page_degrades_to_empty() {
        let query = Query::class("fvCtx");
        let records: Vec<RawRecord> = (0..4).map(|i| ctx(&format!("uni/tn-A/ctx-{}", i))).collect();
        let transport = InMemoryTransport::new()
            .with_records(query.clone(), records)
            .failing_page(query.clone(), 1);

        let fetched = PaginatedFetcher::with_page_size(&transport, 2).fetch_all(&query).await;
        assert!(fetched.is_empty());
    }

    #[tokio::test]
    async fn test_short_page_stops_loop() {
        let query = Query::class("fvCtx");
        let transport = InMemoryTransport::new().with_pages(
            query.clone(),
            10,
            vec![vec![ctx("uni/tn-A/ctx-a")]],
        );

        let fetched = PaginatedFetcher::with_page_size(&transport, 1).fetch_all(&query).await;
        assert_eq!(fetched.len(), 1);
        assert_eq!(transport.request_count(&query), 2);
    }

    #[tokio::test]
    async fn test_overshoot_keeps_every_record() {
        let query = Query::class("fvCtx");
        let epg = RawRecord::new(RecordKind::FvAEPg, Attributes::from_iter([("dn", "uni/tn-A/ap-app/epg-web")]));
        let transport = InMemoryTransport::new().with_pages(
            query.clone(),
            2,
            vec![
                vec![ctx("uni/tn-A/ctx-a")],
                vec![bd("uni/tn-A/BD-b"), epg.clone()],
                vec![ctx("uni/tn-A/ctx-never")],
            ],
        );

        let fetched = PaginatedFetcher::with_page_size(&transport, 2).fetch_all(&query).await;

        assert_eq!(aggregate_count(&fetched, 2), 3);
        assert_eq!(transport.request_count(&query), 2);
        assert_eq!(fetched, vec![ctx("uni/tn-A/ctx-a"), bd("uni/tn-A/BD-b"), epg]);
    }

    #[test]
    fn test_dedup_without_dn_compares_content() {
        let scope = |scope: &str| RawRecord::new(RecordKind::FvCtx, Attributes::from_iter([("scope", scope)]));
        let deduped = dedup(vec![scope("1"), scope("2"), scope("1")]);
        assert_eq!(deduped, vec![scope("1"), scope("2")]);
    }
}
