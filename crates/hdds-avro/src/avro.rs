// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Configured entry point: naming, cached schema derivation, encode/decode.

use crate::codec::binary::{self, BinaryDecoder, BinaryEncoder};
use crate::codec::{self, AvroCodec};
use crate::config::AvroConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::{AvroError, ConfigError, SchemaBuildError};
use crate::naming::RecordNaming;
use crate::schema::{LookupStats, Schema, SchemaBuilder, SchemaCache};
use crate::value::Value;
use std::sync::Arc;

/// Shared, thread-safe Avro context.
///
/// Named descriptors are derived once and cached by full name (suffixed with
/// `?` when nullable); anonymous descriptors (primitives, lists, maps) are
/// derived on every call.
pub struct Avro {
    config: AvroConfig,
    cache: SchemaCache,
}

impl Avro {
    pub fn new(config: AvroConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "[avro] strategy={:?} implicit_nulls={} cache_capacity={}",
            config.naming_strategy,
            config.implicit_nulls,
            config.cache_capacity
        );
        Ok(Self {
            cache: SchemaCache::new(config.cache_capacity),
            config,
        })
    }

    pub fn config(&self) -> &AvroConfig {
        &self.config
    }

    fn builder(&self) -> SchemaBuilder<'static> {
        SchemaBuilder::new(self.config.strategy()).implicit_nulls(self.config.implicit_nulls)
    }

    /// Naming of `descriptor` under the configured strategy.
    pub fn record_naming(&self, descriptor: &TypeDescriptor) -> RecordNaming {
        self.builder().naming_for(descriptor)
    }

    /// Schema for `descriptor`, served from the cache when possible.
    pub fn schema(&self, descriptor: &TypeDescriptor) -> Result<Arc<Schema>, SchemaBuildError> {
        if !descriptor.is_named() || descriptor.base_serial_name().is_empty() {
            return self.builder().build(descriptor);
        }
        let mut key = self.record_naming(descriptor).full_name().to_string();
        if descriptor.nullable {
            key.push(crate::descriptor::NULLABLE_SUFFIX);
        }
        self.cache
            .get_or_try_build(&key, || self.builder().build(descriptor))
    }

    /// Encode a dynamic value.
    pub fn encode_value(&self, schema: &Arc<Schema>, value: &Value) -> Result<Vec<u8>, AvroError> {
        binary::encode_to_vec(schema, value)
    }

    /// Decode one dynamic value; the whole input must be consumed.
    pub fn decode_value(&self, bytes: &[u8], schema: &Arc<Schema>) -> Result<Value, AvroError> {
        binary::decode_from_slice(bytes, schema)
    }

    /// Encode a typed value through `codec`.
    pub fn encode_with<C: AvroCodec>(
        &self,
        schema: &Arc<Schema>,
        codec: &C,
        value: &C::Value,
    ) -> Result<Vec<u8>, AvroError> {
        let mut encoder = BinaryEncoder::new(schema)?;
        codec::encode(codec, &mut encoder, value)?;
        encoder.finish()
    }

    /// Decode a typed value through `codec`.
    pub fn decode_with<C: AvroCodec>(
        &self,
        bytes: &[u8],
        schema: &Arc<Schema>,
        codec: &C,
    ) -> Result<C::Value, AvroError> {
        let mut decoder = BinaryDecoder::new(bytes, schema)?;
        let value = codec::decode(codec, &mut decoder)?;
        decoder.finish()?;
        Ok(value)
    }

    pub fn cache_stats(&self) -> LookupStats {
        self.cache.stats()
    }
}

impl Default for Avro {
    fn default() -> Self {
        let config = AvroConfig::default();
        Self {
            cache: SchemaCache::new(config.cache_capacity),
            config,
        }
    }
}
