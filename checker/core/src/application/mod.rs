// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Application
//!
//! The resolution pipeline. Each stage reads the controller through a
//! [`fetcher::PaginatedFetcher`] and hands a finished index to the next;
//! [`session::ResolutionSession`] runs them in order.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Pipeline stages and their orchestration

pub mod catalog;
pub mod contract_loader;
pub mod correlator;
pub mod fetcher;
pub mod rule_loader;
pub mod session;
pub mod vrf_index;

pub use correlator::{ResolvedRule, ResolvedTag, TagOrigin};
pub use session::{ResolutionReport, ResolutionRequest, ResolutionSession};
