// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-directed binary decoder.

use super::{min_encoded_len, zigzag_decode, Traversal, MAX_VARINT_LEN};
use crate::codec::{AvroDecoder, SchemaContext};
use crate::config::MAX_COLLECTION_ITEMS;
use crate::error::AvroError;
use crate::schema::{Schema, SchemaKind};
use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Binary decoder over a borrowed buffer, positioned on a schema tree.
#[derive(Debug)]
pub struct BinaryDecoder<'a> {
    buffer: &'a [u8],
    offset: usize,
    traversal: Traversal,
}

impl<'a> BinaryDecoder<'a> {
    pub fn new(buffer: &'a [u8], root: &Arc<Schema>) -> Result<Self, AvroError> {
        Ok(Self {
            buffer,
            offset: 0,
            traversal: Traversal::new(root)?,
        })
    }

    /// Decoder without a schema: raw reads only.
    pub fn detached(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            traversal: Traversal::default(),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    /// Check that the whole input was consumed.
    pub fn finish(&self) -> Result<(), AvroError> {
        self.traversal.check_root()?;
        if self.remaining() > 0 {
            return Err(AvroError::TrailingBytes {
                remaining: self.remaining(),
            });
        }
        log::trace!("[avro] decoded {} bytes", self.offset);
        Ok(())
    }

    /// Read record field `name` through `f`. Fields go in declaration order.
    pub fn decode_field<T, F>(&mut self, name: &str, f: F) -> Result<T, AvroError>
    where
        F: FnOnce(&mut Self) -> Result<T, AvroError>,
    {
        let schema = self.traversal.field(name, "decode_field")?;
        let value = self.within(&schema, f)?;
        self.traversal.advance_field();
        Ok(value)
    }

    /// Read an array, one `f` call per item (with its position). Returns the
    /// item count.
    pub fn decode_items<F>(&mut self, mut f: F) -> Result<usize, AvroError>
    where
        F: FnMut(&mut Self, usize) -> Result<(), AvroError>,
    {
        let schema = self.traversal.items("decode_items")?;
        let width = self.item_width(&schema);
        self.read_blocks(width, |dec, position| dec.within(&schema, |dec| f(dec, position)))
    }

    /// Read a map, one `f` call per value with its key. Returns the entry count.
    pub fn decode_entries<F>(&mut self, mut f: F) -> Result<usize, AvroError>
    where
        F: FnMut(&mut Self, String) -> Result<(), AvroError>,
    {
        let schema = self.traversal.values("decode_entries")?;
        let width = 1 + self.item_width(&schema);
        self.read_blocks(width, |dec, _| {
            let key = dec.read_string()?;
            dec.within(&schema, |dec| f(dec, key))
        })
    }

    /// Read a union branch index and decode the branch through `f`.
    pub fn decode_branch<T, F>(&mut self, f: F) -> Result<T, AvroError>
    where
        F: FnOnce(&mut Self, usize) -> Result<T, AvroError>,
    {
        let index = self.read_union_index()?;
        let schema = self.traversal.branch(index, "decode_branch")?;
        self.within(&schema, |dec| f(dec, index))
    }

    /// Read a dynamic value for the current schema.
    pub fn decode_value(&mut self) -> Result<Value, AvroError> {
        let schema = self.traversal.current("decode_value")?;
        self.read_value(&schema)
    }

    fn within<T, F>(&mut self, schema: &Arc<Schema>, f: F) -> Result<T, AvroError>
    where
        F: FnOnce(&mut Self) -> Result<T, AvroError>,
    {
        self.traversal.push(schema)?;
        let result = f(self);
        let closed = self.traversal.pop();
        let value = result?;
        closed?;
        Ok(value)
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], AvroError> {
        if self.remaining() < count {
            return Err(AvroError::UnexpectedEof {
                offset: self.offset,
                needed: count,
            });
        }
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], AvroError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_varint(&mut self) -> Result<u64, AvroError> {
        let start = self.offset;
        let mut result = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let byte = *self.buffer.get(self.offset).ok_or(AvroError::UnexpectedEof {
                offset: self.offset,
                needed: 1,
            })?;
            self.offset += 1;
            // The last byte holds only bit 63.
            if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
                return Err(AvroError::InvalidVarint { offset: start });
            }
            result |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(AvroError::InvalidVarint { offset: start })
    }

    fn read_length(&mut self) -> Result<usize, AvroError> {
        let offset = self.offset;
        let length = self.read_long()?;
        usize::try_from(length).map_err(|_| AvroError::NegativeLength { offset, length })
    }

    /// Item count of the next block; a negative count carries a byte size.
    fn read_block_count(&mut self) -> Result<usize, AvroError> {
        let offset = self.offset;
        let count = self.read_long()?;
        if count >= 0 {
            return usize::try_from(count)
                .map_err(|_| AvroError::NegativeLength { offset, length: count });
        }
        let _block_size = self.read_long()?;
        count
            .checked_neg()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(AvroError::NegativeLength {
                offset,
                length: count,
            })
    }

    /// Read blocks of items at least `item_width` bytes wide each.
    fn read_blocks<F>(&mut self, item_width: usize, mut f: F) -> Result<usize, AvroError>
    where
        F: FnMut(&mut Self, usize) -> Result<(), AvroError>,
    {
        let mut total = 0usize;
        loop {
            let offset = self.offset;
            let count = self.read_block_count()?;
            if count == 0 {
                return Ok(total);
            }
            let declared = total.saturating_add(count);
            if declared > MAX_COLLECTION_ITEMS {
                return Err(AvroError::CollectionTooLarge {
                    offset,
                    count: declared,
                });
            }
            let needed = count.saturating_mul(item_width);
            if needed > self.remaining() {
                return Err(AvroError::UnexpectedEof {
                    offset: self.offset,
                    needed,
                });
            }
            for _ in 0..count {
                f(self, total)?;
                total += 1;
            }
        }
    }

    fn item_width(&self, schema: &Arc<Schema>) -> usize {
        self.traversal
            .resolve(schema)
            .map_or(0, |schema| min_encoded_len(&schema))
    }

    /// Branch or symbol count for range errors of raw reads. An enum read
    /// while positioned on a union reports the union's enum branch.
    fn current_arity(&self, kind: SchemaKind) -> usize {
        let Ok(current) = self.traversal.current("decode") else {
            return 0;
        };
        match (current.as_ref(), kind) {
            (Schema::Union(u), SchemaKind::Union) => u.variants().len(),
            (Schema::Enum(e), SchemaKind::Enum) => e.symbols.len(),
            (Schema::Union(u), SchemaKind::Enum) => u
                .variants()
                .iter()
                .filter_map(|branch| self.traversal.resolve(branch).ok())
                .find_map(|branch| match branch.as_ref() {
                    Schema::Enum(e) => Some(e.symbols.len()),
                    _ => None,
                })
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Raw index in `0..arity`; `None` when the wire value is out of range.
    fn read_index(&mut self, arity: usize) -> Result<(i64, Option<usize>), AvroError> {
        let raw = self.read_long()?;
        let index = usize::try_from(raw).ok().filter(|i| *i < arity);
        Ok((raw, index))
    }

    fn read_value(&mut self, schema: &Arc<Schema>) -> Result<Value, AvroError> {
        self.traversal.enter()?;
        let value = self.read_nested(schema);
        self.traversal.leave();
        value
    }

    fn read_nested(&mut self, schema: &Arc<Schema>) -> Result<Value, AvroError> {
        let schema = self.traversal.resolve(schema)?;
        match schema.as_ref() {
            Schema::Null => self.read_null().map(|()| Value::Null),
            Schema::Boolean => self.read_boolean().map(Value::Boolean),
            Schema::Int => self.read_int().map(Value::Int),
            Schema::Long => self.read_long().map(Value::Long),
            Schema::Float => self.read_float().map(Value::Float),
            Schema::Double => self.read_double().map(Value::Double),
            Schema::Bytes => self.read_bytes().map(Value::Bytes),
            Schema::String => self.read_string().map(Value::String),
            Schema::Record(record) => {
                let mut fields = Vec::with_capacity(record.fields.len());
                for field in &record.fields {
                    fields.push((field.name.clone(), self.read_value(&field.schema)?));
                }
                Ok(Value::Record(fields))
            }
            Schema::Enum(e) => {
                let symbols = e.symbols.len();
                let (raw, index) = self.read_index(symbols)?;
                let index = index
                    .and_then(|i| u32::try_from(i).ok())
                    .ok_or(AvroError::EnumIndexOutOfRange { index: raw, symbols })?;
                Ok(Value::Enum(index, e.symbols[index as usize].clone()))
            }
            Schema::Fixed(fixed) => self.read_fixed(fixed.size).map(Value::Fixed),
            Schema::Array(items) => {
                let mut values = Vec::new();
                let width = self.item_width(items);
                self.read_blocks(width, |dec, _| {
                    values.push(dec.read_value(items)?);
                    Ok(())
                })?;
                Ok(Value::Array(values))
            }
            Schema::Map(values_schema) => {
                let mut entries = BTreeMap::new();
                let width = 1 + self.item_width(values_schema);
                self.read_blocks(width, |dec, _| {
                    let key = dec.read_string()?;
                    let value = dec.read_value(values_schema)?;
                    entries.insert(key, value);
                    Ok(())
                })?;
                Ok(Value::Map(entries))
            }
            Schema::Union(union) => {
                let branches = union.variants().len();
                let (raw, index) = self.read_index(branches)?;
                let index = index
                    .and_then(|i| u32::try_from(i).ok())
                    .ok_or(AvroError::UnionBranchOutOfRange { index: raw, branches })?;
                let inner = self.read_value(&union.variants()[index as usize])?;
                Ok(Value::Union(index, Box::new(inner)))
            }
            Schema::Ref(name) => Err(AvroError::UnresolvedReference(name.clone())),
        }
    }
}

impl SchemaContext for BinaryDecoder<'_> {
    fn current_field_schema(&self) -> Result<Arc<Schema>, AvroError> {
        self.traversal.current("decode")
    }

    fn resolve_schema(&self, schema: &Arc<Schema>) -> Result<Arc<Schema>, AvroError> {
        self.traversal.resolve(schema)
    }
}

impl AvroDecoder for BinaryDecoder<'_> {
    fn read_null(&mut self) -> Result<(), AvroError> {
        Ok(())
    }

    fn read_boolean(&mut self) -> Result<bool, AvroError> {
        let offset = self.offset;
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(AvroError::InvalidBoolean { offset, byte }),
        }
    }

    fn read_int(&mut self) -> Result<i32, AvroError> {
        let offset = self.offset;
        let value = self.read_long()?;
        i32::try_from(value).map_err(|_| AvroError::IntOutOfRange { offset, value })
    }

    fn read_long(&mut self) -> Result<i64, AvroError> {
        self.read_varint().map(zigzag_decode)
    }

    fn read_float(&mut self) -> Result<f32, AvroError> {
        self.take_array().map(f32::from_le_bytes)
    }

    fn read_double(&mut self) -> Result<f64, AvroError> {
        self.take_array().map(f64::from_le_bytes)
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>, AvroError> {
        let length = self.read_length()?;
        self.take(length).map(<[u8]>::to_vec)
    }

    fn read_string(&mut self) -> Result<String, AvroError> {
        let bytes = self.read_bytes()?;
        Ok(String::from_utf8(bytes)?)
    }

    fn read_fixed(&mut self, size: usize) -> Result<Vec<u8>, AvroError> {
        self.take(size).map(<[u8]>::to_vec)
    }

    fn read_enum(&mut self) -> Result<usize, AvroError> {
        let symbols = self.current_arity(SchemaKind::Enum);
        let index = self.read_long()?;
        usize::try_from(index).map_err(|_| AvroError::EnumIndexOutOfRange { index, symbols })
    }

    fn read_union_index(&mut self) -> Result<usize, AvroError> {
        let branches = self.current_arity(SchemaKind::Union);
        let index = self.read_long()?;
        usize::try_from(index).map_err(|_| AvroError::UnionBranchOutOfRange { index, branches })
    }
}
