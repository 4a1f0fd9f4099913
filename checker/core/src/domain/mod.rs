// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Pure types of the resolution engine. Nothing in here talks to the network.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Record vocabulary, indexes, rules, contracts, configuration

pub mod class_tag;
pub mod config;
pub mod contract;
pub mod distinguished_name;
pub mod endpoint_group;
pub mod record;
pub mod routing_domain;
pub mod transport;
pub mod zoning_rule;
