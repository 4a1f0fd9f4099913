// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Raw Controller Records
//!
//! Every object the fabric controller returns is a single-key mapping from a
//! class name to an `attributes` object of string fields:
//!
//! ```json
//! { "fvCtx": { "attributes": { "dn": "uni/tn-A/ctx-default", "scope": "2818048", "pcTag": "32770" } } }
//! ```
//!
//! Records are decoded once, at the fetch boundary, into a [`RawRecord`]
//! carrying a closed [`RecordKind`]. Downstream stages match on the kind
//! instead of probing for keys.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Decode the controller's loosely-typed JSON envelope

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Closed set of controller classes the engine understands.
///
/// The declaration order of [`RecordKind::KNOWN`] decides which kind wins if a
/// record ever carries more than one recognised key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    // Routing domains
    FvCtx,
    FvCtxDef,
    FvTnlCtx,

    // Endpoint groups and their relatives
    FvEpP,
    VzToEPg,
    FvRtdEpP,
    FvInBEpP,
    FvOoBEpP,
    FvBD,
    FvBDDef,
    FvAEPg,
    VnsEPgDef,
    L3extSubnet,

    // Zoning rules and contracts
    ActrlRule,
    VzRsRFltAtt,
    VzBrCP,
    VzRtCons,
    VzRtProv,
    VzSubj,
    VzRsSubjFiltAtt,

    // Session plumbing
    AaaLogin,
    FirmwareCtrlrRunning,

    /// A class the engine does not dispatch on. Still counted by pagination.
    Other(String),
}

impl RecordKind {
    pub const KNOWN: [RecordKind; 22] = [
        RecordKind::FvCtx,
        RecordKind::FvCtxDef,
        RecordKind::FvTnlCtx,
        RecordKind::FvEpP,
        RecordKind::VzToEPg,
        RecordKind::FvRtdEpP,
        RecordKind::FvInBEpP,
        RecordKind::FvOoBEpP,
        RecordKind::FvBD,
        RecordKind::FvBDDef,
        RecordKind::FvAEPg,
        RecordKind::VnsEPgDef,
        RecordKind::L3extSubnet,
        RecordKind::ActrlRule,
        RecordKind::VzRsRFltAtt,
        RecordKind::VzBrCP,
        RecordKind::VzRtCons,
        RecordKind::VzRtProv,
        RecordKind::VzSubj,
        RecordKind::VzRsSubjFiltAtt,
        RecordKind::AaaLogin,
        RecordKind::FirmwareCtrlrRunning,
    ];

    /// Controller class name as it appears on the wire.
    pub fn class_name(&self) -> &str {
        match self {
            RecordKind::FvCtx => "fvCtx",
            RecordKind::FvCtxDef => "fvCtxDef",
            RecordKind::FvTnlCtx => "fvTnlCtx",
            RecordKind::FvEpP => "fvEpP",
            RecordKind::VzToEPg => "vzToEPg",
            RecordKind::FvRtdEpP => "fvRtdEpP",
            RecordKind::FvInBEpP => "fvInBEpP",
            RecordKind::FvOoBEpP => "fvOoBEpP",
            RecordKind::FvBD => "fvBD",
            RecordKind::FvBDDef => "fvBDDef",
            RecordKind::FvAEPg => "fvAEPg",
            RecordKind::VnsEPgDef => "vnsEPgDef",
            RecordKind::L3extSubnet => "l3extSubnet",
            RecordKind::ActrlRule => "actrlRule",
            RecordKind::VzRsRFltAtt => "vzRsRFltAtt",
            RecordKind::VzBrCP => "vzBrCP",
            RecordKind::VzRtCons => "vzRtCons",
            RecordKind::VzRtProv => "vzRtProv",
            RecordKind::VzSubj => "vzSubj",
            RecordKind::VzRsSubjFiltAtt => "vzRsSubjFiltAtt",
            RecordKind::AaaLogin => "aaaLogin",
            RecordKind::FirmwareCtrlrRunning => "firmwareCtrlrRunning",
            RecordKind::Other(name) => name,
        }
    }

    pub fn from_class_name(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|kind| kind.class_name() == name)
            .cloned()
            .unwrap_or_else(|| RecordKind::Other(name.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RecordKind::Other(_))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// The `attributes` object of a record. Non-string scalars are stringified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Attribute value or the empty string.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Hash for Attributes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut entries: Vec<(&String, &String)> = self.0.iter().collect();
        entries.sort_unstable();
        entries.hash(state);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<&Map<String, Value>> for Attributes {
    fn from(map: &Map<String, Value>) -> Self {
        map.iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), text))
            })
            .collect()
    }
}

/// One decoded controller object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRecord {
    pub kind: RecordKind,
    pub attributes: Attributes,
}

impl RawRecord {
    pub fn new(kind: RecordKind, attributes: Attributes) -> Self {
        Self { kind, attributes }
    }

    /// Distinguished name of the object, when the class carries one.
    pub fn dn(&self) -> Option<&str> {
        self.attributes.get("dn")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Decode a record envelope. The first recognised class key wins; a record
    /// with only unrecognised keys keeps its first key as [`RecordKind::Other`].
    pub fn from_envelope(envelope: &Map<String, Value>) -> Option<Self> {
        let kind = RecordKind::KNOWN
            .iter()
            .find(|kind| envelope.contains_key(kind.class_name()))
            .cloned()
            .or_else(|| envelope.keys().next().map(|k| RecordKind::Other(k.clone())))?;

        let attributes = envelope
            .get(kind.class_name())
            .and_then(|body| body.get("attributes"))
            .and_then(Value::as_object)
            .map(Attributes::from)
            .unwrap_or_default();

        Some(Self { kind, attributes })
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let envelope = Map::<String, Value>::deserialize(deserializer)?;
        RawRecord::from_envelope(&envelope)
            .ok_or_else(|| serde::de::Error::custom("record envelope has no class key"))
    }
}

/// A single page of a class or managed-object query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(rename = "totalCount", deserialize_with = "deserialize_count")]
    pub total_count: usize,
    #[serde(default)]
    pub imdata: Vec<RawRecord>,
}

impl QueryResponse {
    pub fn new(total_count: usize, imdata: Vec<RawRecord>) -> Self {
        Self { total_count, imdata }
    }
}

/// `totalCount` arrives as an integer-as-string, but accept plain numbers too.
fn deserialize_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid totalCount '{}': {}", s, e))),
        Value::Number(n) => n
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| serde::de::Error::custom("totalCount must be a non-negative integer")),
        other => Err(serde::de::Error::custom(format!(
            "totalCount must be a string or number, got {}",
            other
        ))),
    }
}
