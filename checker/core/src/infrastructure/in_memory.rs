// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! In-memory fabric transport
//!
//! Serves canned record sets keyed by [`Query`]. Record sets are paginated by
//! the requested page size; explicit page lists can be recorded instead to
//! reproduce controllers that overlap or short-change their pages. Failures
//! can be injected per query or per page. Every request is logged so tests can
//! assert on what the engine asked for.
//!
//! Queries that were never recorded answer with an empty result, like a
//! controller asked for a class with no objects.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use crate::domain::record::{QueryResponse, RawRecord};
use crate::domain::transport::{FabricTransport, Query, TransportError};

#[derive(Debug, Clone)]
enum Recorded {
    Records(Vec<RawRecord>),
    Pages {
        total_count: usize,
        pages: Vec<Vec<RawRecord>>,
    },
}

#[derive(Debug, Default)]
pub struct InMemoryTransport {
    responses: HashMap<Query, Recorded>,
    failing_queries: HashSet<Query>,
    failing_pages: HashSet<(Query, u32)>,
    requests: Mutex<Vec<(Query, u32)>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` for `query`, split into pages of the requested size.
    pub fn with_records(mut self, query: Query, records: Vec<RawRecord>) -> Self {
        self.responses.insert(query, Recorded::Records(records));
        self
    }

    /// Serve exactly these pages for `query`, each declaring `total_count`.
    /// Pages past the end come back empty.
    pub fn with_pages(mut self, query: Query, total_count: usize, pages: Vec<Vec<RawRecord>>) -> Self {
        self.responses
            .insert(query, Recorded::Pages { total_count, pages });
        self
    }

    /// Every page of `query` fails.
    pub fn failing(mut self, query: Query) -> Self {
        self.failing_queries.insert(query);
        self
    }

    /// Page `page` of `query` fails.
    pub fn failing_page(mut self, query: Query, page: u32) -> Self {
        self.failing_pages.insert((query, page));
        self
    }

    /// Every `(query, page)` requested so far, in order.
    pub fn requests(&self) -> Vec<(Query, u32)> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self, query: &Query) -> usize {
        self.requests.lock().iter().filter(|(q, _)| q == query).count()
    }

    pub fn was_requested(&self, query: &Query) -> bool {
        self.request_count(query) > 0
    }
}

#[async_trait]
impl FabricTransport for InMemoryTransport {
    async fn fetch_page(
        &self,
        query: &Query,
        page: u32,
        page_size: u32,
    ) -> Result<QueryResponse, TransportError> {
        self.requests.lock().push((query.clone(), page));

        if self.failing_queries.contains(query) || self.failing_pages.contains(&(query.clone(), page)) {
            return Err(TransportError::Http {
                status: 500,
                locator: query.locator.clone(),
            });
        }

        let response = match self.responses.get(query) {
            None => QueryResponse::new(0, Vec::new()),
            Some(Recorded::Records(records)) => {
                let size = page_size.max(1) as usize;
                let page_records = records
                    .chunks(size)
                    .nth(page as usize)
                    .map(<[RawRecord]>::to_vec)
                    .unwrap_or_default();
                QueryResponse::new(records.len(), page_records)
            }
            Some(Recorded::Pages { total_count, pages }) => QueryResponse::new(
                *total_count,
                pages.get(page as usize).cloned().unwrap_or_default(),
            ),
        };
        Ok(response)
    }
}
