// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Distinguished-name helpers
//!
//! Pattern extraction over controller DNs. Bracketed segments (`S-[...]`,
//! `/cdef-[...]`, `GraphInst_C-[...]`) embed other DNs; these helpers pull the
//! embedded DN out.

use regex::Regex;
use std::sync::LazyLock;

static SHADOW_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"S-\[(.+?)\]").expect("static pattern"));

static CONTRACT_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/cdef-\[(.+?)\]").expect("static pattern"));

static GRAPH_INSTANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"GraphInst_C-\[(.+?)\]").expect("static pattern"));

const GRAPH_INSTANCE_MARKER: &str = "GraphInst_C-[";

/// Length of the `/lIfCtx-c-<role>` qualifier trailing a service-graph
/// shadow group's logical-interface DN.
pub const SHADOW_QUALIFIER_LEN: usize = 18;

/// Routing-domain DN embedded in a service-graph shadow group DN (`...S-[<vrf>]...`).
pub fn shadow_group_domain(dn: &str) -> Option<&str> {
    SHADOW_DOMAIN
        .captures(dn)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Contract name referenced by a filter-attachment DN.
///
/// Takes the text inside `/cdef-[...]`. When that definition is a
/// service-graph instance, unwraps one more level to the contract the graph
/// was rendered for.
pub fn contract_definition(dn: &str) -> Option<&str> {
    let caps = CONTRACT_DEFINITION.captures(dn)?;
    let inner = caps.get(1)?;
    if !inner.as_str().contains(GRAPH_INSTANCE_MARKER) {
        return Some(inner.as_str());
    }
    // The lazy match above stops at the graph instance's own closing bracket,
    // so search the rest of the DN from where the definition started.
    GRAPH_INSTANCE
        .captures(&dn[inner.start()..])
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Shadow-group identity with the trailing interface qualifier stripped.
pub fn strip_shadow_qualifier(identity: &str) -> &str {
    if identity.len() <= SHADOW_QUALIFIER_LEN {
        return "";
    }
    let mut cut = identity.len() - SHADOW_QUALIFIER_LEN;
    while !identity.is_char_boundary(cut) {
        cut -= 1;
    }
    &identity[..cut]
}
