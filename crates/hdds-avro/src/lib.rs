// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-avro
//!
//! Avro schema derivation and binary encoding for structural type descriptors.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdds_avro::{Avro, PrimitiveKind, RecordDescriptorBuilder, Value};
//!
//! let avro = Avro::default();
//! let sensor = RecordDescriptorBuilder::new("com.acme.Sensor")
//!     .field("id", PrimitiveKind::Long)
//!     .optional_field("label", PrimitiveKind::String)
//!     .build();
//!
//! let schema = avro.schema(&sensor).unwrap();
//! assert_eq!(schema.full_name(), Some("com.acme.Sensor"));
//!
//! let value = Value::Record(vec![
//!     ("id".into(), Value::Long(7)),
//!     ("label".into(), Value::Null),
//! ]);
//! let bytes = avro.encode_value(&schema, &value).unwrap();
//! assert_eq!(bytes, vec![0x0e, 0x00]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                    Avro (facade, config)                    |
//! +-------------------------------------------------------------+
//! | RecordNaming | AnnotationExtractor | NamingStrategy          |
//! +-------------------------------------------------------------+
//! | SchemaBuilder -> Schema tree -> SchemaCache / canonical form |
//! +-------------------------------------------------------------+
//! | SchemaContext | AvroEncoder/AvroDecoder | AvroCodec dispatch |
//! | BinaryEncoder / BinaryDecoder | logical codecs              |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`naming`] - schema identity (name, namespace, full name)
//! - [`annotations`] - declared annotations and first-wins lookup
//! - [`descriptor`] - structural type descriptions
//! - [`schema`] - schema tree, builder, cache, canonical form
//! - [`codec`] - schema context, typed codec base, binary codec
//! - [`config`] - defaults and YAML/JSON loading

pub mod annotations;
pub mod avro;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod naming;
pub mod schema;
pub mod value;

pub use annotations::{Annotation, AnnotationExtractor};
pub use avro::Avro;
pub use codec::binary::{BinaryDecoder, BinaryEncoder};
pub use codec::{AvroCodec, AvroDecoder, AvroEncoder, SchemaContext};
pub use config::{AvroConfig, NamingStrategyKind};
pub use descriptor::{FieldDescriptor, PrimitiveKind, RecordDescriptorBuilder, TypeDescriptor, TypeKind};
pub use error::{AvroError, ConfigError, SchemaBuildError};
pub use naming::{
    DefaultNamingStrategy, NamingStrategy, PascalCaseNamingStrategy, RecordNaming,
    SnakeCaseNamingStrategy,
};
pub use schema::{Schema, SchemaBuilder, SchemaCache, SchemaFingerprint, SchemaKind};
pub use value::Value;
