// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure
//!
//! Implementations of [`crate::domain::transport::FabricTransport`].
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Controller HTTP client and an in-memory stand-in

pub mod apic_client;
pub mod in_memory;

pub use apic_client::{ApicClient, AuthError, FirmwareVersion};
pub use in_memory::InMemoryTransport;
