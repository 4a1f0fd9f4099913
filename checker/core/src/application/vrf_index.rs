// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! VRF index stage: fetches every routing domain and builds the [`VrfIndex`].

use tracing::{debug, trace, warn};

use super::fetcher::PaginatedFetcher;
use crate::domain::routing_domain::VrfIndex;
use crate::domain::transport::Query;

pub const ROUTING_DOMAIN_CLASS: &str = "fvCtx";

pub struct VrfIndexBuilder<'a> {
    fetcher: PaginatedFetcher<'a>,
}

impl<'a> VrfIndexBuilder<'a> {
    pub fn new(fetcher: PaginatedFetcher<'a>) -> Self {
        Self { fetcher }
    }

    /// Always fetched fabric-wide: rules may reference domains outside the
    /// scopes being resolved.
    pub async fn build(&self) -> VrfIndex {
        let records = self
            .fetcher
            .fetch_all(&Query::class(ROUTING_DOMAIN_CLASS))
            .await;
        let index = VrfIndex::from_records(&records);

        if index.is_empty() {
            warn!("No routing domains returned by the controller");
        } else {
            debug!(domains = index.len(), "VRF index built");
        }
        trace!(index = ?index, "VRF index");
        index
    }
}
