// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-aware encode/decode contract.
//!
//! # Schema context
//!
//! Encoders and decoders track which schema node applies to the value about
//! to be written or read. [`SchemaContext`] exposes that node and is a
//! supertrait of both [`AvroEncoder`] and [`AvroDecoder`], so every codec can
//! ask for it without narrowing the capability it was handed.
//!
//! # Typed codecs
//!
//! Custom codecs implement [`AvroCodec`] (`encode_value` / `decode_value`)
//! and are always driven through [`encode`] and [`decode`], which own the
//! union policy:
//!
//! - **encode**: a nullable union is resolved to its first non-null branch
//!   (the branch index is written to the wire) before `encode_value` runs.
//!   Codecs never see nullable unions on this path.
//! - **decode**: the current node is passed through unchanged, unions
//!   included. Which branch applies depends on the wire data, so the codec
//!   decides (see [`read_union_branch`]).
//!
//! ```text
//! encoder.current_field_schema() -> ["null", long]
//!      | encode(): write branch 1, unwrap
//!      v
//! codec.encode_value(long, encoder, value)
//! ```

pub mod binary;
pub mod logical;

use crate::error::AvroError;
use crate::schema::Schema;
use std::sync::Arc;

/// "What schema applies here" for the current traversal position.
pub trait SchemaContext {
    /// Schema node for the value about to be written or read.
    ///
    /// Errors with [`AvroError::NoCurrentSchema`] when the traversal state is
    /// inconsistent; callers propagate it without retrying.
    fn current_field_schema(&self) -> Result<Arc<Schema>, AvroError>;

    /// Follow a [`Schema::Ref`] to its definition.
    fn resolve_schema(&self, schema: &Arc<Schema>) -> Result<Arc<Schema>, AvroError> {
        match schema.as_ref() {
            Schema::Ref(name) => Err(AvroError::UnresolvedReference(name.clone())),
            _ => Ok(Arc::clone(schema)),
        }
    }
}

/// Write capability.
pub trait AvroEncoder: SchemaContext {
    fn write_null(&mut self) -> Result<(), AvroError>;
    fn write_boolean(&mut self, value: bool) -> Result<(), AvroError>;
    fn write_int(&mut self, value: i32) -> Result<(), AvroError>;
    fn write_long(&mut self, value: i64) -> Result<(), AvroError>;
    fn write_float(&mut self, value: f32) -> Result<(), AvroError>;
    fn write_double(&mut self, value: f64) -> Result<(), AvroError>;
    fn write_bytes(&mut self, value: &[u8]) -> Result<(), AvroError>;
    fn write_string(&mut self, value: &str) -> Result<(), AvroError>;
    fn write_fixed(&mut self, value: &[u8]) -> Result<(), AvroError>;
    fn write_enum(&mut self, index: usize) -> Result<(), AvroError>;
    fn write_union_index(&mut self, index: usize) -> Result<(), AvroError>;
}

/// Read capability.
pub trait AvroDecoder: SchemaContext {
    fn read_null(&mut self) -> Result<(), AvroError>;
    fn read_boolean(&mut self) -> Result<bool, AvroError>;
    fn read_int(&mut self) -> Result<i32, AvroError>;
    fn read_long(&mut self) -> Result<i64, AvroError>;
    fn read_float(&mut self) -> Result<f32, AvroError>;
    fn read_double(&mut self) -> Result<f64, AvroError>;
    fn read_bytes(&mut self) -> Result<Vec<u8>, AvroError>;
    fn read_string(&mut self) -> Result<String, AvroError>;
    fn read_fixed(&mut self, size: usize) -> Result<Vec<u8>, AvroError>;
    fn read_enum(&mut self) -> Result<usize, AvroError>;
    fn read_union_index(&mut self) -> Result<usize, AvroError>;
}

/// Type-specific value logic for a custom codec.
///
/// Implementors only provide `encode_value` / `decode_value`; dispatch goes
/// through [`encode`] / [`decode`].
pub trait AvroCodec {
    type Value;

    /// Write `value` for `schema`. Never called with a nullable union.
    fn encode_value<E: AvroEncoder + ?Sized>(
        &self,
        schema: &Schema,
        encoder: &mut E,
        value: &Self::Value,
    ) -> Result<(), AvroError>;

    /// Read a value for `schema`, which may be a union.
    fn decode_value<D: AvroDecoder + ?Sized>(
        &self,
        schema: &Schema,
        decoder: &mut D,
    ) -> Result<Self::Value, AvroError>;
}

/// Encode `value` at the encoder's current position.
pub fn encode<C, E>(codec: &C, encoder: &mut E, value: &C::Value) -> Result<(), AvroError>
where
    C: AvroCodec + ?Sized,
    E: AvroEncoder + ?Sized,
{
    let schema = encoder.current_field_schema()?;
    let branch = match schema.as_ref() {
        Schema::Union(u) if u.is_nullable() => {
            let (index, branch) = u
                .first_non_null()
                .ok_or_else(|| AvroError::NoMatchingBranch("non-null value".into()))?;
            Some((index, Arc::clone(branch)))
        }
        _ => None,
    };
    let schema = match branch {
        Some((index, branch)) => {
            encoder.write_union_index(index)?;
            encoder.resolve_schema(&branch)?
        }
        None => schema,
    };
    codec.encode_value(&schema, encoder, value)
}

/// Decode a value at the decoder's current position.
pub fn decode<C, D>(codec: &C, decoder: &mut D) -> Result<C::Value, AvroError>
where
    C: AvroCodec + ?Sized,
    D: AvroDecoder + ?Sized,
{
    let schema = decoder.current_field_schema()?;
    codec.decode_value(&schema, decoder)
}

/// Encode an optional value: `None` selects the null branch.
pub fn encode_optional<C, E>(
    codec: &C,
    encoder: &mut E,
    value: Option<&C::Value>,
) -> Result<(), AvroError>
where
    C: AvroCodec + ?Sized,
    E: AvroEncoder + ?Sized,
{
    let Some(value) = value else {
        let schema = encoder.current_field_schema()?;
        return match schema.as_ref() {
            Schema::Union(u) => {
                let index = u.null_index().ok_or(AvroError::NoNullBranch)?;
                encoder.write_union_index(index)
            }
            Schema::Null => encoder.write_null(),
            _ => Err(AvroError::NoNullBranch),
        };
    };
    encode(codec, encoder, value)
}

/// Decode an optional value, selecting the union branch from the wire.
pub fn decode_optional<C, D>(codec: &C, decoder: &mut D) -> Result<Option<C::Value>, AvroError>
where
    C: AvroCodec + ?Sized,
    D: AvroDecoder + ?Sized,
{
    let schema = decoder.current_field_schema()?;
    match schema.as_ref() {
        Schema::Union(_) => {
            let branch = read_union_branch(&schema, decoder)?;
            if branch.is_null() {
                Ok(None)
            } else {
                codec.decode_value(&branch, decoder).map(Some)
            }
        }
        Schema::Null => decoder.read_null().map(|()| None),
        _ => codec.decode_value(&schema, decoder).map(Some),
    }
}

/// Read a union branch index and return the (resolved) branch schema.
///
/// For use by `decode_value` implementations handed a union.
pub fn read_union_branch<D>(schema: &Schema, decoder: &mut D) -> Result<Arc<Schema>, AvroError>
where
    D: AvroDecoder + ?Sized,
{
    let Schema::Union(u) = schema else {
        return Err(AvroError::SchemaMismatch {
            expected: "union",
            found: schema.kind(),
        });
    };
    let index = decoder.read_union_index()?;
    let branch = u
        .variants()
        .get(index)
        .ok_or(AvroError::UnionBranchOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            branches: u.variants().len(),
        })?;
    decoder.resolve_schema(branch)
}

#[cfg(test)]
mod tests;
