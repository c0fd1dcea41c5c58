// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in typed codecs.
//!
//! | Codec | Rust value | Accepted schemas |
//! |-------|------------|------------------|
//! | [`TimestampMillisCodec`] | `SystemTime` | `long` (ms since epoch) |
//! | [`BytesCodec`] | `Vec<u8>` | `bytes`, `fixed` |
//! | [`StringCodec`] | `String` | `string`, `enum` (symbol) |
//!
//! On decode each codec also accepts a union and follows the branch read
//! from the wire.

use super::{read_union_branch, AvroCodec, AvroDecoder, AvroEncoder};
use crate::error::AvroError;
use crate::schema::{Schema, SchemaKind};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn mismatch(expected: &'static str, schema: &Schema) -> AvroError {
    AvroError::SchemaMismatch {
        expected,
        found: schema.kind(),
    }
}

/// `SystemTime` as a `long` count of milliseconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampMillisCodec;

impl TimestampMillisCodec {
    fn to_millis(time: SystemTime) -> Result<i64, AvroError> {
        let out_of_range = || AvroError::ValueMismatch {
            schema: SchemaKind::Long,
            value: format!("{:?}", time),
        };
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).map_err(|_| out_of_range()),
            Err(before) => i64::try_from(before.duration().as_millis())
                .map(|ms| -ms)
                .map_err(|_| out_of_range()),
        }
    }

    fn from_millis(ms: i64) -> Result<SystemTime, AvroError> {
        let magnitude = Duration::from_millis(ms.unsigned_abs());
        let time = if ms >= 0 {
            UNIX_EPOCH.checked_add(magnitude)
        } else {
            UNIX_EPOCH.checked_sub(magnitude)
        };
        time.ok_or_else(|| AvroError::ValueMismatch {
            schema: SchemaKind::Long,
            value: format!("{} ms", ms),
        })
    }
}

impl AvroCodec for TimestampMillisCodec {
    type Value = SystemTime;

    fn encode_value<E: AvroEncoder + ?Sized>(
        &self,
        schema: &Schema,
        encoder: &mut E,
        value: &SystemTime,
    ) -> Result<(), AvroError> {
        match schema {
            Schema::Long => encoder.write_long(Self::to_millis(*value)?),
            other => Err(mismatch("long", other)),
        }
    }

    fn decode_value<D: AvroDecoder + ?Sized>(
        &self,
        schema: &Schema,
        decoder: &mut D,
    ) -> Result<SystemTime, AvroError> {
        match schema {
            Schema::Long => Self::from_millis(decoder.read_long()?),
            Schema::Union(_) => {
                let branch = read_union_branch(schema, decoder)?;
                self.decode_value(&branch, decoder)
            }
            other => Err(mismatch("long", other)),
        }
    }
}

/// Raw bytes, written as `bytes` or as a `fixed` of matching size.
#[derive(Debug, Default, Clone, Copy)]
pub struct BytesCodec;

impl AvroCodec for BytesCodec {
    type Value = Vec<u8>;

    fn encode_value<E: AvroEncoder + ?Sized>(
        &self,
        schema: &Schema,
        encoder: &mut E,
        value: &Vec<u8>,
    ) -> Result<(), AvroError> {
        match schema {
            Schema::Bytes => encoder.write_bytes(value),
            Schema::Fixed(fixed) if fixed.size == value.len() => encoder.write_fixed(value),
            Schema::Fixed(fixed) => Err(AvroError::FixedSizeMismatch {
                expected: fixed.size,
                found: value.len(),
            }),
            other => Err(mismatch("bytes", other)),
        }
    }

    fn decode_value<D: AvroDecoder + ?Sized>(
        &self,
        schema: &Schema,
        decoder: &mut D,
    ) -> Result<Vec<u8>, AvroError> {
        match schema {
            Schema::Bytes => decoder.read_bytes(),
            Schema::Fixed(fixed) => decoder.read_fixed(fixed.size),
            Schema::Union(_) => {
                let branch = read_union_branch(schema, decoder)?;
                self.decode_value(&branch, decoder)
            }
            other => Err(mismatch("bytes", other)),
        }
    }
}

/// Text, written as `string` or as an `enum` symbol.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringCodec;

impl AvroCodec for StringCodec {
    type Value = String;

    fn encode_value<E: AvroEncoder + ?Sized>(
        &self,
        schema: &Schema,
        encoder: &mut E,
        value: &String,
    ) -> Result<(), AvroError> {
        match schema {
            Schema::String => encoder.write_string(value),
            Schema::Enum(e) => {
                let index = e.symbol_index(value).ok_or_else(|| AvroError::ValueMismatch {
                    schema: SchemaKind::Enum,
                    value: value.clone(),
                })?;
                encoder.write_enum(index)
            }
            other => Err(mismatch("string", other)),
        }
    }

    fn decode_value<D: AvroDecoder + ?Sized>(
        &self,
        schema: &Schema,
        decoder: &mut D,
    ) -> Result<String, AvroError> {
        match schema {
            Schema::String => decoder.read_string(),
            Schema::Enum(e) => {
                let index = decoder.read_enum()?;
                e.symbols
                    .get(index)
                    .cloned()
                    .ok_or(AvroError::EnumIndexOutOfRange {
                        index: i64::try_from(index).unwrap_or(i64::MAX),
                        symbols: e.symbols.len(),
                    })
            }
            Schema::Union(_) => {
                let branch = read_union_branch(schema, decoder)?;
                self.decode_value(&branch, decoder)
            }
            other => Err(mismatch("string", other)),
        }
    }
}
