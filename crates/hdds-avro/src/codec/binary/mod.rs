// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Avro binary encoding.
//!
//! ```text
//! int/long   zigzag varint
//! float      4 bytes LE        double   8 bytes LE
//! bytes      long length + raw  string   long length + UTF-8
//! fixed      raw               enum     int symbol index
//! union      long branch index + value
//! array/map  blocks: long count, items (map: string key + value), ... 0
//! ```
//!
//! [`BinaryEncoder`] and [`BinaryDecoder`] walk a schema tree with an explicit
//! frame stack: `encode_field` / `decode_field` descend into a record field,
//! `*_items` / `*_entries` into array and map elements, `*_branch` into a
//! union branch. The top frame is what [`SchemaContext::current_field_schema`]
//! returns.
//!
//! [`SchemaContext::current_field_schema`]: crate::codec::SchemaContext::current_field_schema

mod decoder;
mod encoder;

pub use decoder::BinaryDecoder;
pub use encoder::BinaryEncoder;

use crate::config::MAX_NESTING_DEPTH;
use crate::error::AvroError;
use crate::schema::{Schema, SchemaNames};
use crate::value::Value;
use std::sync::Arc;

/// Maximum encoded length of a 64-bit varint.
pub(crate) const MAX_VARINT_LEN: usize = 10;

/// Encode `value` against `schema` in one call.
pub fn encode_to_vec(schema: &Arc<Schema>, value: &Value) -> Result<Vec<u8>, AvroError> {
    let mut encoder = BinaryEncoder::new(schema)?;
    encoder.encode_value(value)?;
    encoder.finish()
}

/// Decode exactly one value for `schema` from `bytes`.
pub fn decode_from_slice(bytes: &[u8], schema: &Arc<Schema>) -> Result<Value, AvroError> {
    let mut decoder = BinaryDecoder::new(bytes, schema)?;
    let value = decoder.decode_value()?;
    decoder.finish()?;
    Ok(value)
}

pub(crate) fn zigzag_encode(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

pub(crate) fn zigzag_decode(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// One level of the traversal.
#[derive(Debug)]
struct Frame {
    schema: Arc<Schema>,
    /// Next field to visit when `schema` is a record.
    next_field: usize,
}

/// Schema position shared by the encoder and the decoder.
#[derive(Debug, Default)]
struct Traversal {
    names: SchemaNames,
    stack: Vec<Frame>,
    /// Nesting of the dynamic value being written or read.
    depth: usize,
}

impl Traversal {
    fn new(root: &Arc<Schema>) -> Result<Self, AvroError> {
        let mut traversal = Self {
            names: SchemaNames::from_root(root),
            stack: Vec::new(),
            depth: 0,
        };
        traversal.push(root)?;
        Ok(traversal)
    }

    fn current(&self, operation: &'static str) -> Result<Arc<Schema>, AvroError> {
        self.stack
            .last()
            .map(|frame| Arc::clone(&frame.schema))
            .ok_or(AvroError::NoCurrentSchema { operation })
    }

    fn resolve(&self, schema: &Arc<Schema>) -> Result<Arc<Schema>, AvroError> {
        self.names.resolve(schema).ok_or_else(|| {
            AvroError::UnresolvedReference(schema.full_name().unwrap_or_default().to_string())
        })
    }

    fn push(&mut self, schema: &Arc<Schema>) -> Result<(), AvroError> {
        if self.stack.len() >= MAX_NESTING_DEPTH {
            return Err(AvroError::DepthExceeded {
                depth: self.stack.len() + 1,
            });
        }
        let schema = self.resolve(schema)?;
        self.stack.push(Frame {
            schema,
            next_field: 0,
        });
        Ok(())
    }

    /// Leave the top frame. A record entered field by field must have visited
    /// every field; a record written or read in one piece is not checked.
    fn pop(&mut self) -> Result<(), AvroError> {
        let frame = self
            .stack
            .pop()
            .ok_or(AvroError::NoCurrentSchema { operation: "leave" })?;
        check_complete(&frame)
    }

    /// One level deeper into a dynamic value.
    fn enter(&mut self) -> Result<(), AvroError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(AvroError::DepthExceeded {
                depth: self.depth + 1,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn check_root(&self) -> Result<(), AvroError> {
        match self.stack.as_slice() {
            [root] => check_complete(root),
            _ => Ok(()),
        }
    }

    /// Schema of field `name` in the current record, which must be next.
    fn field(&self, name: &str, operation: &'static str) -> Result<Arc<Schema>, AvroError> {
        let frame = self
            .stack
            .last()
            .ok_or(AvroError::NoCurrentSchema { operation })?;
        let Schema::Record(record) = frame.schema.as_ref() else {
            return Err(AvroError::SchemaMismatch {
                expected: "record",
                found: frame.schema.kind(),
            });
        };
        let index = record
            .field_index(name)
            .ok_or_else(|| AvroError::UnknownField(name.to_string()))?;
        if index != frame.next_field {
            let expected = record
                .fields
                .get(frame.next_field)
                .map_or_else(|| "end of record".to_string(), |f| f.name.clone());
            return Err(AvroError::FieldOrder {
                expected,
                found: name.to_string(),
            });
        }
        Ok(Arc::clone(&record.fields[index].schema))
    }

    fn advance_field(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.next_field += 1;
        }
    }

    fn items(&self, operation: &'static str) -> Result<Arc<Schema>, AvroError> {
        let current = self.current(operation)?;
        match current.as_ref() {
            Schema::Array(items) => Ok(Arc::clone(items)),
            other => Err(AvroError::SchemaMismatch {
                expected: "array",
                found: other.kind(),
            }),
        }
    }

    fn values(&self, operation: &'static str) -> Result<Arc<Schema>, AvroError> {
        let current = self.current(operation)?;
        match current.as_ref() {
            Schema::Map(values) => Ok(Arc::clone(values)),
            other => Err(AvroError::SchemaMismatch {
                expected: "map",
                found: other.kind(),
            }),
        }
    }

    fn branch(&self, index: usize, operation: &'static str) -> Result<Arc<Schema>, AvroError> {
        let current = self.current(operation)?;
        match current.as_ref() {
            Schema::Union(u) => u.variants().get(index).cloned().ok_or(
                AvroError::UnionBranchOutOfRange {
                    index: i64::try_from(index).unwrap_or(i64::MAX),
                    branches: u.variants().len(),
                },
            ),
            other => Err(AvroError::SchemaMismatch {
                expected: "union",
                found: other.kind(),
            }),
        }
    }
}

/// Fewest bytes one value of `schema` occupies on the wire. References count
/// as zero.
fn min_encoded_len(schema: &Schema) -> usize {
    match schema {
        Schema::Null | Schema::Ref(_) => 0,
        Schema::Float => 4,
        Schema::Double => 8,
        Schema::Fixed(fixed) => fixed.size,
        Schema::Record(record) => record
            .fields
            .iter()
            .fold(0usize, |sum, f| sum.saturating_add(min_encoded_len(&f.schema))),
        _ => 1,
    }
}

fn check_complete(frame: &Frame) -> Result<(), AvroError> {
    if frame.next_field == 0 {
        return Ok(());
    }
    if let Schema::Record(record) = frame.schema.as_ref() {
        if let Some(missing) = record.fields.get(frame.next_field) {
            return Err(AvroError::FieldOrder {
                expected: missing.name.clone(),
                found: "end of record".to_string(),
            });
        }
    }
    Ok(())
}
