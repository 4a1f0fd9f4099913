// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Contract Checker Core
//!
//! Policy resolution engine: turns the zoning rules programmed on a fabric
//! leaf into rows naming the endpoint groups, routing domains and contracts
//! that produced them.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain types, resolution pipeline, controller transport

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
