// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-directed binary encoder.

use super::{zigzag_encode, Traversal};
use crate::codec::{AvroEncoder, SchemaContext};
use crate::error::AvroError;
use crate::schema::{RecordSchema, Schema, SchemaKind, UnionSchema};
use crate::value::Value;
use std::sync::Arc;

/// Binary encoder positioned on a schema tree.
///
/// The `write_*` methods append raw wire data and never move the position;
/// `encode_field`, `encode_items`, `encode_entries` and `encode_branch` do.
#[derive(Debug, Default)]
pub struct BinaryEncoder {
    buffer: Vec<u8>,
    traversal: Traversal,
}

impl BinaryEncoder {
    /// Encoder positioned on `root`.
    pub fn new(root: &Arc<Schema>) -> Result<Self, AvroError> {
        Ok(Self {
            buffer: Vec::new(),
            traversal: Traversal::new(root)?,
        })
    }

    /// Encoder without a schema: raw writes only.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Take the bytes written so far without checking the traversal.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Take the bytes, failing if a root record was left half written.
    pub fn finish(self) -> Result<Vec<u8>, AvroError> {
        self.traversal.check_root()?;
        log::trace!("[avro] encoded {} bytes", self.buffer.len());
        Ok(self.buffer)
    }

    /// Write record field `name` through `f`. Fields go in declaration order.
    pub fn encode_field<F>(&mut self, name: &str, f: F) -> Result<(), AvroError>
    where
        F: FnOnce(&mut Self) -> Result<(), AvroError>,
    {
        let schema = self.traversal.field(name, "encode_field")?;
        self.within(&schema, f)?;
        self.traversal.advance_field();
        Ok(())
    }

    /// Write an array, one `f` call per item.
    pub fn encode_items<T, F>(&mut self, items: &[T], mut f: F) -> Result<(), AvroError>
    where
        F: FnMut(&mut Self, &T) -> Result<(), AvroError>,
    {
        let schema = self.traversal.items("encode_items")?;
        if !items.is_empty() {
            self.write_count(items.len())?;
            for item in items {
                self.within(&schema, |enc| f(enc, item))?;
            }
        }
        self.write_long(0)
    }

    /// Write a map, one `f` call per value after its key.
    pub fn encode_entries<'k, V, I, F>(&mut self, entries: I, mut f: F) -> Result<(), AvroError>
    where
        I: IntoIterator<Item = (&'k str, V)>,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(&mut Self, V) -> Result<(), AvroError>,
    {
        let schema = self.traversal.values("encode_entries")?;
        let entries = entries.into_iter();
        if entries.len() > 0 {
            self.write_count(entries.len())?;
            for (key, value) in entries {
                self.write_string(key)?;
                self.within(&schema, |enc| f(enc, value))?;
            }
        }
        self.write_long(0)
    }

    /// Select union branch `index` and write its value through `f`.
    pub fn encode_branch<F>(&mut self, index: usize, f: F) -> Result<(), AvroError>
    where
        F: FnOnce(&mut Self) -> Result<(), AvroError>,
    {
        let schema = self.traversal.branch(index, "encode_branch")?;
        self.write_union_index(index)?;
        self.within(&schema, f)
    }

    /// Write a dynamic value for the current schema.
    pub fn encode_value(&mut self, value: &Value) -> Result<(), AvroError> {
        let schema = self.traversal.current("encode_value")?;
        self.write_value(&schema, value)
    }

    fn within<F>(&mut self, schema: &Arc<Schema>, f: F) -> Result<(), AvroError>
    where
        F: FnOnce(&mut Self) -> Result<(), AvroError>,
    {
        self.traversal.push(schema)?;
        let result = f(self);
        let closed = self.traversal.pop();
        result.and(closed)
    }

    fn write_varint(&mut self, mut n: u64) {
        while n >= 0x80 {
            self.buffer.push((n as u8) | 0x80);
            n >>= 7;
        }
        self.buffer.push(n as u8);
    }

    fn write_count(&mut self, count: usize) -> Result<(), AvroError> {
        let count = i64::try_from(count).map_err(|_| AvroError::ValueMismatch {
            schema: SchemaKind::Long,
            value: format!("length {}", count),
        })?;
        self.write_long(count)
    }

    fn write_value(&mut self, schema: &Arc<Schema>, value: &Value) -> Result<(), AvroError> {
        self.traversal.enter()?;
        let written = self.write_nested(schema, value);
        self.traversal.leave();
        written
    }

    fn write_nested(&mut self, schema: &Arc<Schema>, value: &Value) -> Result<(), AvroError> {
        let schema = self.traversal.resolve(schema)?;
        let value = if matches!(schema.as_ref(), Schema::Union(_)) {
            value
        } else {
            value.unwrap_union()
        };
        let mismatch = || AvroError::ValueMismatch {
            schema: schema.kind(),
            value: value.kind_name().to_string(),
        };

        match (schema.as_ref(), value) {
            (Schema::Null, Value::Null) => self.write_null(),
            (Schema::Boolean, Value::Boolean(b)) => self.write_boolean(*b),
            (Schema::Int, Value::Int(v)) => self.write_int(*v),
            (Schema::Long, Value::Long(v)) => self.write_long(*v),
            (Schema::Long, Value::Int(v)) => self.write_long(i64::from(*v)),
            (Schema::Float, Value::Float(v)) => self.write_float(*v),
            (Schema::Float, Value::Int(v)) => self.write_float(*v as f32),
            (Schema::Float, Value::Long(v)) => self.write_float(*v as f32),
            (Schema::Double, Value::Double(v)) => self.write_double(*v),
            (Schema::Double, Value::Float(v)) => self.write_double(f64::from(*v)),
            (Schema::Double, Value::Int(v)) => self.write_double(f64::from(*v)),
            (Schema::Double, Value::Long(v)) => self.write_double(*v as f64),
            (Schema::Bytes, Value::Bytes(b)) => self.write_bytes(b),
            (Schema::String, Value::String(s)) => self.write_string(s),
            (Schema::Record(record), Value::Record(fields)) => self.write_record(record, fields),
            (Schema::Enum(e), Value::Enum(_, symbol) | Value::String(symbol)) => {
                let index = e.symbol_index(symbol).ok_or_else(mismatch)?;
                self.write_enum(index)
            }
            (Schema::Fixed(fixed), Value::Fixed(bytes) | Value::Bytes(bytes)) => {
                if bytes.len() != fixed.size {
                    return Err(AvroError::FixedSizeMismatch {
                        expected: fixed.size,
                        found: bytes.len(),
                    });
                }
                self.write_fixed(bytes)
            }
            (Schema::Array(items), Value::Array(values)) => {
                if !values.is_empty() {
                    self.write_count(values.len())?;
                    for item in values {
                        self.write_value(items, item)?;
                    }
                }
                self.write_long(0)
            }
            (Schema::Map(values_schema), Value::Map(entries)) => {
                if !entries.is_empty() {
                    self.write_count(entries.len())?;
                    for (key, item) in entries {
                        self.write_string(key)?;
                        self.write_value(values_schema, item)?;
                    }
                }
                self.write_long(0)
            }
            (Schema::Union(union), _) => {
                let (index, inner) = self.select_branch(union, value)?;
                self.write_union_index(index)?;
                self.write_value(&union.variants()[index], inner)
            }
            _ => Err(mismatch()),
        }
    }

    fn write_record(
        &mut self,
        record: &RecordSchema,
        fields: &[(String, Value)],
    ) -> Result<(), AvroError> {
        if let Some((unknown, _)) = fields.iter().find(|(n, _)| record.field(n).is_none()) {
            return Err(AvroError::UnknownField(unknown.clone()));
        }
        for field in &record.fields {
            match fields.iter().find(|(n, _)| *n == field.name) {
                Some((_, value)) => self.write_value(&field.schema, value)?,
                None if field.default == Some(serde_json::Value::Null) => {
                    self.write_value(&field.schema, &Value::Null)?;
                }
                None => return Err(AvroError::MissingField(field.name.clone())),
            }
        }
        Ok(())
    }

    /// Branch for `value`: explicit index first, then the first branch of
    /// exactly the value's type, then the first branch it promotes to.
    fn select_branch<'v>(
        &self,
        union: &UnionSchema,
        value: &'v Value,
    ) -> Result<(usize, &'v Value), AvroError> {
        if let Value::Union(raw, inner) = value {
            let index = *raw as usize;
            if index >= union.variants().len() {
                return Err(AvroError::UnionBranchOutOfRange {
                    index: i64::from(*raw),
                    branches: union.variants().len(),
                });
            }
            return Ok((index, inner));
        }
        let find = |exact: bool| {
            union
                .variants()
                .iter()
                .position(|branch| self.accepts(branch, value, exact))
        };
        find(true)
            .or_else(|| find(false))
            .map(|index| (index, value))
            .ok_or_else(|| {
                if value.is_null() {
                    AvroError::NoNullBranch
                } else {
                    AvroError::NoMatchingBranch(value.kind_name().to_string())
                }
            })
    }

    fn accepts(&self, schema: &Arc<Schema>, value: &Value, exact: bool) -> bool {
        let Ok(schema) = self.traversal.resolve(schema) else {
            return false;
        };
        match (schema.as_ref(), value) {
            (Schema::Null, Value::Null)
            | (Schema::Boolean, Value::Boolean(_))
            | (Schema::Int, Value::Int(_))
            | (Schema::Long, Value::Long(_))
            | (Schema::Float, Value::Float(_))
            | (Schema::Double, Value::Double(_))
            | (Schema::Bytes, Value::Bytes(_))
            | (Schema::String, Value::String(_))
            | (Schema::Array(_), Value::Array(_))
            | (Schema::Map(_), Value::Map(_)) => true,
            (Schema::Record(record), Value::Record(fields)) => {
                fields.iter().all(|(name, _)| record.field(name).is_some())
            }
            (Schema::Enum(e), Value::Enum(_, symbol)) => e.symbol_index(symbol).is_some(),
            (Schema::Fixed(f), Value::Fixed(bytes)) => bytes.len() == f.size,
            _ if exact => false,
            (Schema::Long, Value::Int(_))
            | (Schema::Float, Value::Int(_) | Value::Long(_))
            | (Schema::Double, Value::Int(_) | Value::Long(_) | Value::Float(_)) => true,
            (Schema::Enum(e), Value::String(symbol)) => e.symbol_index(symbol).is_some(),
            (Schema::Fixed(f), Value::Bytes(bytes)) => bytes.len() == f.size,
            _ => false,
        }
    }
}

impl SchemaContext for BinaryEncoder {
    fn current_field_schema(&self) -> Result<Arc<Schema>, AvroError> {
        self.traversal.current("encode")
    }

    fn resolve_schema(&self, schema: &Arc<Schema>) -> Result<Arc<Schema>, AvroError> {
        self.traversal.resolve(schema)
    }
}

impl AvroEncoder for BinaryEncoder {
    fn write_null(&mut self) -> Result<(), AvroError> {
        Ok(())
    }

    fn write_boolean(&mut self, value: bool) -> Result<(), AvroError> {
        self.buffer.push(u8::from(value));
        Ok(())
    }

    fn write_int(&mut self, value: i32) -> Result<(), AvroError> {
        self.write_long(i64::from(value))
    }

    fn write_long(&mut self, value: i64) -> Result<(), AvroError> {
        self.write_varint(zigzag_encode(value));
        Ok(())
    }

    fn write_float(&mut self, value: f32) -> Result<(), AvroError> {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write_double(&mut self, value: f64) -> Result<(), AvroError> {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write_bytes(&mut self, value: &[u8]) -> Result<(), AvroError> {
        self.write_count(value.len())?;
        self.buffer.extend_from_slice(value);
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<(), AvroError> {
        self.write_bytes(value.as_bytes())
    }

    fn write_fixed(&mut self, value: &[u8]) -> Result<(), AvroError> {
        self.buffer.extend_from_slice(value);
        Ok(())
    }

    fn write_enum(&mut self, index: usize) -> Result<(), AvroError> {
        self.write_count(index)
    }

    fn write_union_index(&mut self, index: usize) -> Result<(), AvroError> {
        self.write_count(index)
    }
}
