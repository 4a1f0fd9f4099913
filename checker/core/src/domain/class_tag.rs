// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Class Tags
//!
//! Numeric policy class tags (pcTag) identify endpoint groups inside zoning
//! rules. The numeric range a tag falls in decides where it can be resolved:
//!
//! | Range | Scope | Resolved through |
//! |-------|-------|------------------|
//! | 0–15 | System reserved | fixed label table (labelled tags other than 0 may be overridden per domain) |
//! | 16–16385 | Global (shared services) | fabric-wide catalog entry |
//! | 16386+ | Local to one routing domain | that domain's catalog |
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Tag parsing, range classification, reserved labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const RESERVED_MAX: u32 = 15;
pub const GLOBAL_MAX: u32 = 16385;

/// Reserved tag for an external 0.0.0.0/0 prefix.
pub const EXTERNAL_ANY: ClassTag = ClassTag(15);

/// Class tag the fabric assigns to its built-in black-hole domain.
pub const BLACK_HOLE: ClassTag = ClassTag(16777200);

pub const BLACK_HOLE_DOMAIN: &str = "uni/tn-infra/black-hole";

/// Suffix appended to a group name that owns a domain's default-route external policy.
pub const DEFAULT_ROUTE_SUFFIX: &str = "(0.0.0.0/0)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassTag(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRange {
    Reserved,
    Global,
    Local,
}

impl ClassTag {
    pub fn range(self) -> TagRange {
        match self.0 {
            0..=RESERVED_MAX => TagRange::Reserved,
            16..=GLOBAL_MAX => TagRange::Global,
            _ => TagRange::Local,
        }
    }

    pub fn is_reserved(self) -> bool {
        self.range() == TagRange::Reserved
    }

    pub fn is_global(self) -> bool {
        self.range() == TagRange::Global
    }

    pub fn is_local(self) -> bool {
        self.range() == TagRange::Local
    }

    /// Below the local range: reserved or global. Only these are indexed fabric-wide.
    pub fn is_fabric_wide(self) -> bool {
        self.0 <= GLOBAL_MAX
    }

    /// Fixed label of a reserved tag, if the fabric documents one.
    pub fn reserved_label(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("any"),
            1 => Some("ignore"),
            10 => Some("pctag10-unknown"),
            13 => Some("ext-shrsvc"),
            14 => Some("int-shrsvc"),
            15 => Some("ext-0.0.0.0/0"),
            _ => None,
        }
    }
}

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClassTag {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ClassTag)
    }
}

/// Tag reference as it appears on a zoning rule: a number, the literal `any`,
/// or something the engine cannot interpret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleTag {
    Any,
    Class(ClassTag),
    Unparsed(String),
}

impl RuleTag {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("any") {
            return RuleTag::Any;
        }
        match raw.parse::<ClassTag>() {
            Ok(tag) => RuleTag::Class(tag),
            Err(_) => RuleTag::Unparsed(raw.to_string()),
        }
    }

    pub fn class_tag(&self) -> Option<ClassTag> {
        match self {
            RuleTag::Class(tag) => Some(*tag),
            _ => None,
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTag::Any => f.write_str("any"),
            RuleTag::Class(tag) => write!(f, "{}", tag),
            RuleTag::Unparsed(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_boundaries() {
        assert_eq!(ClassTag(0).range(), TagRange::Reserved);
        assert_eq!(ClassTag(15).range(), TagRange::Reserved);
        assert_eq!(ClassTag(16).range(), TagRange::Global);
        assert_eq!(ClassTag(16385).range(), TagRange::Global);
        assert_eq!(ClassTag(16386).range(), TagRange::Local);
        assert_eq!(ClassTag(65535).range(), TagRange::Local);
        assert_eq!(BLACK_HOLE.range(), TagRange::Local);
    }

    #[test]
    fn test_ranges_partition_every_tag() {
        for raw in (0..70_000u32).step_by(7).chain([15, 16, 16385, 16386]) {
            let tag = ClassTag(raw);
            let hits = [tag.is_reserved(), tag.is_global(), tag.is_local()]
                .iter()
                .filter(|hit| **hit)
                .count();
            assert_eq!(hits, 1, "tag {} matched {} ranges", raw, hits);
        }
    }

    #[test]
    fn test_reserved_labels() {
        assert_eq!(ClassTag(0).reserved_label(), Some("any"));
        assert_eq!(EXTERNAL_ANY.reserved_label(), Some("ext-0.0.0.0/0"));
        assert_eq!(ClassTag(5).reserved_label(), None);
        assert_eq!(ClassTag(32770).reserved_label(), None);
    }

    #[test]
    fn test_rule_tag_parse() {
        assert_eq!(RuleTag::parse("any"), RuleTag::Any);
        assert_eq!(RuleTag::parse("49153"), RuleTag::Class(ClassTag(49153)));
        assert_eq!(RuleTag::parse(" 15 "), RuleTag::Class(EXTERNAL_ANY));
        assert_eq!(
            RuleTag::parse("not-a-tag"),
            RuleTag::Unparsed("not-a-tag".to_string())
        );
        assert_eq!(RuleTag::parse("49153").to_string(), "49153");
    }
}
