// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema rendering: Parsing Canonical Form, fingerprints and full JSON.
//!
//! # References
//! - Avro 1.11 specification, "Parsing Canonical Form for Schemas"
//! - Avro 1.11 specification, "Schema Fingerprints"

use super::Schema;
use serde_json::{json, Map, Value as JsonValue};
use std::collections::HashSet;
use std::fmt;

/// MD5 fingerprint of a schema's Parsing Canonical Form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaFingerprint(pub [u8; 16]);

impl SchemaFingerprint {
    pub fn compute(canonical_form: &str) -> Self {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(canonical_form.as_bytes());
        let result = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&result[..16]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Debug for SchemaFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaFingerprint({})", self)
    }
}

impl fmt::Display for SchemaFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl Schema {
    /// Parsing Canonical Form.
    ///
    /// Full names only, attributes restricted to `name`, `type`, `fields`,
    /// `symbols`, `items`, `values`, `size` (in that order), no whitespace.
    /// Named types are written out once and referenced by full name afterwards.
    pub fn canonical_form(&self) -> String {
        let mut out = String::new();
        let mut seen = HashSet::new();
        write_canonical(self, &mut seen, &mut out);
        out
    }

    pub fn fingerprint_md5(&self) -> SchemaFingerprint {
        SchemaFingerprint::compute(&self.canonical_form())
    }

    /// Full JSON schema, including namespaces, docs, aliases and defaults.
    pub fn to_json(&self) -> JsonValue {
        let mut seen = HashSet::new();
        to_json_value(self, &mut seen)
    }
}

fn quoted(s: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

fn write_canonical(schema: &Schema, seen: &mut HashSet<String>, out: &mut String) {
    match schema {
        Schema::Record(r) => {
            let full_name = r.naming.full_name();
            if !seen.insert(full_name.to_string()) {
                out.push_str(&quoted(full_name));
                return;
            }
            out.push_str("{\"name\":");
            out.push_str(&quoted(full_name));
            out.push_str(",\"type\":\"record\",\"fields\":[");
            for (i, field) in r.fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str("{\"name\":");
                out.push_str(&quoted(&field.name));
                out.push_str(",\"type\":");
                write_canonical(&field.schema, seen, out);
                out.push('}');
            }
            out.push_str("]}");
        }
        Schema::Enum(e) => {
            let full_name = e.naming.full_name();
            if !seen.insert(full_name.to_string()) {
                out.push_str(&quoted(full_name));
                return;
            }
            out.push_str("{\"name\":");
            out.push_str(&quoted(full_name));
            out.push_str(",\"type\":\"enum\",\"symbols\":[");
            let symbols: Vec<String> = e.symbols.iter().map(|s| quoted(s)).collect();
            out.push_str(&symbols.join(","));
            out.push_str("]}");
        }
        Schema::Fixed(f) => {
            let full_name = f.naming.full_name();
            if !seen.insert(full_name.to_string()) {
                out.push_str(&quoted(full_name));
                return;
            }
            out.push_str("{\"name\":");
            out.push_str(&quoted(full_name));
            out.push_str(&format!(",\"type\":\"fixed\",\"size\":{}}}", f.size));
        }
        Schema::Array(items) => {
            out.push_str("{\"type\":\"array\",\"items\":");
            write_canonical(items, seen, out);
            out.push('}');
        }
        Schema::Map(values) => {
            out.push_str("{\"type\":\"map\",\"values\":");
            write_canonical(values, seen, out);
            out.push('}');
        }
        Schema::Union(u) => {
            out.push('[');
            for (i, variant) in u.variants().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(variant, seen, out);
            }
            out.push(']');
        }
        Schema::Ref(name) => out.push_str(&quoted(name)),
        primitive => out.push_str(&quoted(primitive.kind().as_str())),
    }
}

fn insert_named(
    obj: &mut Map<String, JsonValue>,
    kind: &str,
    naming: &crate::naming::RecordNaming,
    doc: Option<&String>,
    aliases: &[String],
) {
    obj.insert("type".into(), json!(kind));
    obj.insert("name".into(), json!(naming.name()));
    if let Some(ns) = naming.namespace() {
        obj.insert("namespace".into(), json!(ns));
    }
    if let Some(doc) = doc {
        obj.insert("doc".into(), json!(doc));
    }
    if !aliases.is_empty() {
        obj.insert("aliases".into(), json!(aliases));
    }
}

fn to_json_value(schema: &Schema, seen: &mut HashSet<String>) -> JsonValue {
    if let Some(naming) = schema.naming() {
        if !seen.insert(naming.full_name().to_string()) {
            return json!(naming.full_name());
        }
    }
    match schema {
        Schema::Record(r) => {
            let mut obj = Map::new();
            insert_named(&mut obj, "record", &r.naming, r.doc.as_ref(), &r.aliases);
            let fields: Vec<JsonValue> = r
                .fields
                .iter()
                .map(|field| {
                    let mut f = Map::new();
                    f.insert("name".into(), json!(field.name));
                    f.insert("type".into(), to_json_value(&field.schema, seen));
                    if let Some(doc) = &field.doc {
                        f.insert("doc".into(), json!(doc));
                    }
                    if let Some(default) = &field.default {
                        f.insert("default".into(), default.clone());
                    }
                    if !field.aliases.is_empty() {
                        f.insert("aliases".into(), json!(field.aliases));
                    }
                    JsonValue::Object(f)
                })
                .collect();
            obj.insert("fields".into(), JsonValue::Array(fields));
            JsonValue::Object(obj)
        }
        Schema::Enum(e) => {
            let mut obj = Map::new();
            insert_named(&mut obj, "enum", &e.naming, e.doc.as_ref(), &e.aliases);
            obj.insert("symbols".into(), json!(e.symbols));
            JsonValue::Object(obj)
        }
        Schema::Fixed(f) => {
            let mut obj = Map::new();
            insert_named(&mut obj, "fixed", &f.naming, None, &f.aliases);
            obj.insert("size".into(), json!(f.size));
            JsonValue::Object(obj)
        }
        Schema::Array(items) => json!({ "type": "array", "items": to_json_value(items, seen) }),
        Schema::Map(values) => json!({ "type": "map", "values": to_json_value(values, seen) }),
        Schema::Union(u) => JsonValue::Array(
            u.variants()
                .iter()
                .map(|v| to_json_value(v, seen))
                .collect(),
        ),
        Schema::Ref(name) => json!(name),
        primitive => json!(primitive.kind().as_str()),
    }
}
