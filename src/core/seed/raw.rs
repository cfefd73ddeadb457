// src/core/seed/raw.rs

//! A lossless JSON tree used as the first loading stage.
//!
//! `serde_json::Value` collapses repeated object keys, which would hide
//! duplicate usernames and query names. `RawNode` keeps every entry in
//! document order so the validation stage can report them.

use crate::core::errors::SeedError;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;
use std::collections::HashSet;
use std::fmt;

pub(crate) type Entries = Vec<(String, RawNode)>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawNode {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<RawNode>),
    Object(Entries),
}

impl RawNode {
    /// A short type name used in schema violation messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            RawNode::Null => "null",
            RawNode::Bool(_) => "boolean",
            RawNode::Number(_) => "number",
            RawNode::String(_) => "string",
            RawNode::Array(_) => "array",
            RawNode::Object(_) => "object",
        }
    }

    pub(crate) fn as_object(&self, path: &str) -> Result<&Entries, SeedError> {
        match self {
            RawNode::Object(entries) => Ok(entries),
            other => Err(mismatch(path, "object", other)),
        }
    }

    pub(crate) fn as_str(&self, path: &str) -> Result<&str, SeedError> {
        match self {
            RawNode::String(s) => Ok(s.as_str()),
            other => Err(mismatch(path, "string", other)),
        }
    }

    pub(crate) fn as_bool(&self, path: &str) -> Result<bool, SeedError> {
        match self {
            RawNode::Bool(b) => Ok(*b),
            other => Err(mismatch(path, "boolean", other)),
        }
    }

    pub(crate) fn as_array(&self, path: &str) -> Result<&[RawNode], SeedError> {
        match self {
            RawNode::Array(items) => Ok(items.as_slice()),
            other => Err(mismatch(path, "array", other)),
        }
    }

    /// Accepts integral numbers only; `1.5` and `1e3` are rejected.
    pub(crate) fn as_i64(&self, path: &str) -> Result<i64, SeedError> {
        match self {
            RawNode::Number(n) => n.as_i64().ok_or_else(|| {
                let detail = if n.is_u64() {
                    format!("integer {n} is out of range")
                } else {
                    format!("expected an integer, found {n}")
                };
                SeedError::violation(display_path(path), detail)
            }),
            other => Err(mismatch(path, "integer", other)),
        }
    }
}

fn mismatch(path: &str, expected: &str, found: &RawNode) -> SeedError {
    SeedError::violation(
        display_path(path),
        format!("expected {expected}, found {}", found.kind()),
    )
}

/// Joins a parent path and a child key with a dot. The root path is empty.
/// Keys that would make the path ambiguous are written as `["quoted"]`.
pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if needs_quoting(key) {
        format!("{parent}[{key:?}]")
    } else if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key == "$" || key.contains(['.', '[', ']', '"'])
}

pub(crate) fn display_path(path: &str) -> &str {
    if path.is_empty() { "$" } else { path }
}

/// Field-level access to one JSON object, tracking its path for diagnostics.
pub(crate) struct ObjectView<'a> {
    path: &'a str,
    entries: &'a Entries,
}

impl<'a> ObjectView<'a> {
    /// Wraps an object node, rejecting repeated keys up front.
    pub(crate) fn new(node: &'a RawNode, path: &'a str) -> Result<Self, SeedError> {
        let entries = node.as_object(path)?;
        let view = ObjectView { path, entries };
        view.ensure_unique_keys()?;
        Ok(view)
    }

    pub(crate) fn path(&self) -> &'a str {
        self.path
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&'a str, &'a RawNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a RawNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub(crate) fn require(&self, key: &str) -> Result<&'a RawNode, SeedError> {
        self.get(key).ok_or_else(|| {
            SeedError::violation(child_path(self.path, key), "missing required field")
        })
    }

    pub(crate) fn require_str(&self, key: &str) -> Result<&'a str, SeedError> {
        self.require(key)?.as_str(&child_path(self.path, key))
    }

    pub(crate) fn require_bool(&self, key: &str) -> Result<bool, SeedError> {
        self.require(key)?.as_bool(&child_path(self.path, key))
    }

    pub(crate) fn require_i64(&self, key: &str) -> Result<i64, SeedError> {
        self.require(key)?.as_i64(&child_path(self.path, key))
    }

    /// Rejects any field whose name is not in `allowed`.
    pub(crate) fn deny_unknown(&self, allowed: &[&str]) -> Result<(), SeedError> {
        match self.entries.iter().find(|(k, _)| !allowed.contains(&k.as_str())) {
            Some((key, _)) => Err(SeedError::violation(
                child_path(self.path, key),
                format!("unknown field, expected one of: {}", allowed.join(", ")),
            )),
            None => Ok(()),
        }
    }

    fn ensure_unique_keys(&self) -> Result<(), SeedError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (key, _) in self.entries {
            if !seen.insert(key.as_str()) {
                return Err(SeedError::violation(
                    child_path(self.path, key),
                    format!("duplicate key '{key}'"),
                ));
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for RawNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawNodeVisitor)
    }
}

struct RawNodeVisitor;

impl<'de> Visitor<'de> for RawNodeVisitor {
    type Value = RawNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawNode, E> {
        Ok(RawNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawNode, E> {
        Ok(RawNode::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<RawNode, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawNode, E> {
        Ok(RawNode::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawNode, E> {
        Ok(RawNode::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawNode, E> {
        Ok(RawNode::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawNode, E> {
        Number::from_f64(v)
            .map(RawNode::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawNode, E> {
        Ok(RawNode::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawNode, E> {
        Ok(RawNode::String(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<RawNode, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(RawNode::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<RawNode, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, RawNode>()? {
            entries.push((key, value));
        }
        Ok(RawNode::Object(entries))
    }
}
