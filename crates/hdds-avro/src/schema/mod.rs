// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Avro schema tree.
//!
//! # Overview
//!
//! - **Schema**: one node of the tree (primitive, record, enum, fixed, array,
//!   map, union, or a named back-reference)
//! - **SchemaBuilder**: derives a schema tree from a [`TypeDescriptor`]
//! - **SchemaCache**: concurrent LRU cache keyed by full name
//! - **Canonical form**: Parsing Canonical Form + MD5 fingerprint
//!
//! Children are shared through `Arc<Schema>`. Recursive types are expressed
//! with [`Schema::Ref`], which names a record defined higher up in the same
//! tree; encoders and decoders resolve it through [`SchemaNames`].
//!
//! [`TypeDescriptor`]: crate::descriptor::TypeDescriptor

mod builder;
mod cache;
mod canonical;

pub use builder::SchemaBuilder;
pub use cache::{LookupStats, SchemaCache};
pub use canonical::SchemaFingerprint;

use crate::naming::RecordNaming;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A node in the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record(RecordSchema),
    Enum(EnumSchema),
    Fixed(FixedSchema),
    Array(Arc<Schema>),
    /// Map with string keys.
    Map(Arc<Schema>),
    Union(UnionSchema),
    /// Reference, by full name, to a named type defined elsewhere in the tree.
    Ref(String),
}

/// Schema node discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record,
    Enum,
    Fixed,
    Array,
    Map,
    Union,
    Ref,
}

impl SchemaKind {
    /// Avro type name (`"long"`, `"record"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => crate::config::NULL_TYPE_NAME,
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Record => "record",
            Self::Enum => "enum",
            Self::Fixed => "fixed",
            Self::Array => "array",
            Self::Map => "map",
            Self::Union => "union",
            Self::Ref => "ref",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Schema {
    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::Null => SchemaKind::Null,
            Self::Boolean => SchemaKind::Boolean,
            Self::Int => SchemaKind::Int,
            Self::Long => SchemaKind::Long,
            Self::Float => SchemaKind::Float,
            Self::Double => SchemaKind::Double,
            Self::Bytes => SchemaKind::Bytes,
            Self::String => SchemaKind::String,
            Self::Record(_) => SchemaKind::Record,
            Self::Enum(_) => SchemaKind::Enum,
            Self::Fixed(_) => SchemaKind::Fixed,
            Self::Array(_) => SchemaKind::Array,
            Self::Map(_) => SchemaKind::Map,
            Self::Union(_) => SchemaKind::Union,
            Self::Ref(_) => SchemaKind::Ref,
        }
    }

    /// `["null", inner]`.
    pub fn nullable(inner: Arc<Schema>) -> Self {
        Self::Union(UnionSchema::new(vec![Arc::new(Schema::Null), inner]))
    }

    /// Naming of record, enum and fixed nodes.
    pub fn naming(&self) -> Option<&RecordNaming> {
        match self {
            Self::Record(r) => Some(&r.naming),
            Self::Enum(e) => Some(&e.naming),
            Self::Fixed(f) => Some(&f.naming),
            _ => None,
        }
    }

    /// Full name of named nodes and references.
    pub fn full_name(&self) -> Option<&str> {
        match self {
            Self::Ref(name) => Some(name),
            other => other.naming().map(RecordNaming::full_name),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Union that includes a null branch.
    pub fn is_nullable_union(&self) -> bool {
        matches!(self, Self::Union(u) if u.is_nullable())
    }
}

/// Record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub naming: RecordNaming,
    pub doc: Option<String>,
    pub aliases: Vec<String>,
    pub fields: Vec<RecordField>,
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Record field.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub schema: Arc<Schema>,
    pub doc: Option<String>,
    pub aliases: Vec<String>,
    pub default: Option<serde_json::Value>,
}

impl RecordField {
    pub fn new(name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self {
            name: name.into(),
            schema,
            doc: None,
            aliases: Vec::new(),
            default: None,
        }
    }
}

/// Enum schema.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub naming: RecordNaming,
    pub doc: Option<String>,
    pub aliases: Vec<String>,
    pub symbols: Vec<String>,
}

impl EnumSchema {
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// Fixed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchema {
    pub naming: RecordNaming,
    pub aliases: Vec<String>,
    pub size: usize,
}

/// Union schema: ordered branches.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSchema {
    variants: Vec<Arc<Schema>>,
}

impl UnionSchema {
    pub fn new(variants: Vec<Arc<Schema>>) -> Self {
        Self { variants }
    }

    pub fn variants(&self) -> &[Arc<Schema>] {
        &self.variants
    }

    pub fn null_index(&self) -> Option<usize> {
        self.variants.iter().position(|v| v.is_null())
    }

    pub fn is_nullable(&self) -> bool {
        self.null_index().is_some()
    }

    /// First non-null branch and its wire index.
    pub fn first_non_null(&self) -> Option<(usize, &Arc<Schema>)> {
        self.variants.iter().enumerate().find(|(_, v)| !v.is_null())
    }
}

/// Index of the named types of a schema tree, used to resolve [`Schema::Ref`].
#[derive(Debug, Clone, Default)]
pub struct SchemaNames {
    named: HashMap<String, Arc<Schema>>,
}

impl SchemaNames {
    /// Collect every named node reachable from `root`.
    pub fn from_root(root: &Arc<Schema>) -> Self {
        let mut names = Self::default();
        names.collect(root);
        names
    }

    fn collect(&mut self, schema: &Arc<Schema>) {
        if let Some(naming) = schema.naming() {
            if self.named.contains_key(naming.full_name()) {
                return;
            }
            self.named
                .insert(naming.full_name().to_string(), Arc::clone(schema));
        }
        match schema.as_ref() {
            Schema::Record(r) => {
                for field in &r.fields {
                    self.collect(&field.schema);
                }
            }
            Schema::Array(items) | Schema::Map(items) => self.collect(items),
            Schema::Union(u) => {
                for variant in u.variants() {
                    self.collect(variant);
                }
            }
            _ => {}
        }
    }

    pub fn get(&self, full_name: &str) -> Option<&Arc<Schema>> {
        self.named.get(full_name)
    }

    /// Follow `Ref` nodes to their definition. Other nodes are returned as-is.
    pub fn resolve(&self, schema: &Arc<Schema>) -> Option<Arc<Schema>> {
        match schema.as_ref() {
            Schema::Ref(name) => self.named.get(name).cloned(),
            _ => Some(Arc::clone(schema)),
        }
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }
}

#[cfg(test)]
mod tests;
