// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Contracts
//!
//! A contract ties consumer and provider endpoint groups together through
//! subjects, each of which references an ordered list of filters.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Tenant-qualified contract name as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractRef {
    pub tenant: String,
    pub name: String,
}

impl ContractRef {
    pub fn new(tenant: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            name: name.into(),
        }
    }

    /// `uni/tn-<tenant>/brc-<name>`
    pub fn dn(&self) -> String {
        format!("uni/tn-{}/brc-{}", self.tenant, self.name)
    }

    /// `uni/tn-<tenant>/brc-<name>/subj-<subject>`
    pub fn subject_dn(&self, subject: &str) -> String {
        format!("{}/subj-{}", self.dn(), subject)
    }

    /// Value of a zoning rule's contract reference attribute: `<tenant>:<name>`.
    pub fn rule_reference(&self) -> String {
        format!("{}:{}", self.tenant, self.name)
    }
}

impl fmt::Display for ContractRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub dn: String,
    pub consumers: BTreeSet<String>,
    pub providers: BTreeSet<String>,
    /// Subject DN → filter DNs, in the order the controller returned them.
    pub subjects: BTreeMap<String, Vec<String>>,
}

impl Contract {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            ..Default::default()
        }
    }

    pub fn filters(&self) -> impl Iterator<Item = &str> {
        self.subjects.values().flatten().map(String::as_str)
    }
}
