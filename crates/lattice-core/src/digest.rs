//! Canonical field serialization and the provenance digest.
//!
//! The digest must be reproducible across implementations and across
//! caller iteration orders, so the canonical text form is specified here
//! once and implemented directly rather than delegating to a JSON
//! library's incidental formatting:
//!
//! - map keys sorted lexicographically (byte order), values recursively
//!   canonicalized;
//! - fixed `null` / `true` / `false` literals;
//! - integers in plain decimal;
//! - floats via Rust's shortest round-trip `Display` (deterministic across
//!   platforms; non-finite floats render `NaN`/`inf`/`-inf` and are the
//!   caller's responsibility to keep out of digested fields);
//! - strings double-quoted with `\"`, `\\`, and control characters below
//!   0x20 escaped as `\u00XX`.
//!
//! The canonical text is hashed with SHA-256 and rendered as lowercase hex.
//!
//! Caller obligation (documented, not enforced): the exclude set must cover
//! binary and high-churn fields — at minimum the 28-byte vertex buffer and
//! the digest field itself — to keep the digest meaningful for tamper
//! detection and free of circularity. Callers are also expected to bound
//! input size before digesting; canonicalization allocates in proportion to
//! its input.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A value in canonical-form field maps.
///
/// `BTreeMap` keys give the lexicographic ordering for free, which is what
/// makes the digest independent of the caller's insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Array(Vec<CanonicalValue>),
    Map(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    fn write_canonical(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("null"),
            Self::Bool(true) => out.push_str("true"),
            Self::Bool(false) => out.push_str("false"),
            Self::Int(i) => {
                let _ = write!(out, "{i}");
            }
            Self::UInt(u) => {
                let _ = write!(out, "{u}");
            }
            Self::Float(f) => {
                let _ = write!(out, "{f}");
            }
            Self::Text(s) => write_escaped(out, s),
            Self::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out);
                }
                out.push(']');
            }
            Self::Map(map) => {
                out.push('{');
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_escaped(out, key);
                    out.push(':');
                    value.write_canonical(out);
                }
                out.push('}');
            }
        }
    }
}

fn write_escaped(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl From<serde_json::Value> for CanonicalValue {
    /// The glue layer hands rows over as JSON-like maps; JSON numbers map
    /// to Int/UInt/Float by serde_json's own classification.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Render a value in the canonical text form.
pub fn canonical_text(value: &CanonicalValue) -> String {
    let mut out = String::new();
    value.write_canonical(&mut out);
    out
}

/// Digest a field map: drop excluded keys, canonicalize the rest, SHA-256,
/// lowercase hex.
///
/// Identical fields-after-exclusion always yield an identical digest
/// regardless of how the caller assembled the map.
pub fn digest_fields(
    fields: &BTreeMap<String, CanonicalValue>,
    exclude: &BTreeSet<String>,
) -> String {
    let mut text = String::new();
    text.push('{');
    let mut first = true;
    for (key, value) in fields {
        if exclude.contains(key) {
            continue;
        }
        if !first {
            text.push(',');
        }
        first = false;
        write_escaped(&mut text, key);
        text.push(':');
        value.write_canonical(&mut text);
    }
    text.push('}');

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    format!("{digest:x}")
}
