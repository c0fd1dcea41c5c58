// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema building, encoding/decoding and configuration.

use crate::schema::SchemaKind;
use std::fmt;

/// Errors raised by the binary codec and the typed codec base.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroError {
    /// The traversal has no current schema where a codec expects one.
    ///
    /// The surrounding encoder/decoder and the codec are out of sync. This is
    /// an invariant violation, never a data problem: see [`AvroError::is_fatal`].
    NoCurrentSchema {
        /// Operation that asked for the schema.
        operation: &'static str,
    },
    /// The current schema has a different kind than the operation requires.
    SchemaMismatch {
        expected: &'static str,
        found: SchemaKind,
    },
    /// The value cannot be written with the current schema.
    ValueMismatch { schema: SchemaKind, value: String },
    /// Field name not present in the current record schema.
    UnknownField(String),
    /// Record value lacks a field the schema requires.
    MissingField(String),
    /// Fields must be written/read in schema declaration order.
    FieldOrder { expected: String, found: String },
    /// Union branch index read from the wire (or supplied) is out of range.
    UnionBranchOutOfRange { index: i64, branches: usize },
    /// A null value was written to a union without a null branch.
    NoNullBranch,
    /// No union branch accepts the value.
    NoMatchingBranch(String),
    /// Named reference to a type not defined in the schema tree.
    UnresolvedReference(String),
    /// Input ended before the value was complete.
    UnexpectedEof { offset: usize, needed: usize },
    /// Varint longer than 10 bytes.
    InvalidVarint { offset: usize },
    /// Decoded long does not fit the 32-bit int it was read as.
    IntOutOfRange { offset: usize, value: i64 },
    /// Boolean byte other than 0 or 1.
    InvalidBoolean { offset: usize, byte: u8 },
    /// String payload is not UTF-8.
    InvalidUtf8(String),
    /// Enum index outside the symbol list.
    EnumIndexOutOfRange { index: i64, symbols: usize },
    /// Fixed value has the wrong length.
    FixedSizeMismatch { expected: usize, found: usize },
    /// Negative length prefix for bytes/string.
    NegativeLength { offset: usize, length: i64 },
    /// Bytes left over after the root value was decoded.
    TrailingBytes { remaining: usize },
    /// Value nesting went past [`MAX_NESTING_DEPTH`](crate::config::MAX_NESTING_DEPTH).
    DepthExceeded { depth: usize },
    /// Array or map declared more than
    /// [`MAX_COLLECTION_ITEMS`](crate::config::MAX_COLLECTION_ITEMS) items.
    CollectionTooLarge { offset: usize, count: usize },
}

impl AvroError {
    /// Whether this error is an invariant violation rather than bad input.
    ///
    /// Fatal errors indicate a desynchronized traversal and are never retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoCurrentSchema { .. })
    }
}

impl fmt::Display for AvroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCurrentSchema { operation } => {
                write!(f, "no current schema during {}", operation)
            }
            Self::SchemaMismatch { expected, found } => {
                write!(f, "schema mismatch: expected {}, found {}", expected, found)
            }
            Self::ValueMismatch { schema, value } => {
                write!(f, "value {} does not match schema {}", value, schema)
            }
            Self::UnknownField(name) => write!(f, "unknown field: {}", name),
            Self::MissingField(name) => write!(f, "missing field: {}", name),
            Self::FieldOrder { expected, found } => {
                write!(f, "field order: expected {}, found {}", expected, found)
            }
            Self::UnionBranchOutOfRange { index, branches } => {
                write!(
                    f,
                    "union branch {} out of range ({} branches)",
                    index, branches
                )
            }
            Self::NoNullBranch => write!(f, "union has no null branch"),
            Self::NoMatchingBranch(value) => {
                write!(f, "no union branch matches value {}", value)
            }
            Self::UnresolvedReference(name) => write!(f, "unresolved reference: {}", name),
            Self::UnexpectedEof { offset, needed } => {
                write!(
                    f,
                    "unexpected end of input at offset {}: need {} bytes",
                    offset, needed
                )
            }
            Self::InvalidVarint { offset } => write!(f, "invalid varint at offset {}", offset),
            Self::IntOutOfRange { offset, value } => {
                write!(f, "int out of range at offset {}: {}", offset, value)
            }
            Self::InvalidBoolean { offset, byte } => {
                write!(f, "invalid boolean byte 0x{:02x} at offset {}", byte, offset)
            }
            Self::InvalidUtf8(msg) => write!(f, "UTF-8 error: {}", msg),
            Self::EnumIndexOutOfRange { index, symbols } => {
                write!(f, "enum index {} out of range ({} symbols)", index, symbols)
            }
            Self::FixedSizeMismatch { expected, found } => {
                write!(
                    f,
                    "fixed size mismatch: expected {} bytes, found {}",
                    expected, found
                )
            }
            Self::NegativeLength { offset, length } => {
                write!(f, "negative length {} at offset {}", length, offset)
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{} trailing bytes after value", remaining)
            }
            Self::DepthExceeded { depth } => write!(
                f,
                "nesting depth {} exceeds limit {}",
                depth,
                crate::config::MAX_NESTING_DEPTH
            ),
            Self::CollectionTooLarge { offset, count } => write!(
                f,
                "collection of {} items at offset {} exceeds limit {}",
                count,
                offset,
                crate::config::MAX_COLLECTION_ITEMS
            ),
        }
    }
}

impl std::error::Error for AvroError {}

impl From<std::string::FromUtf8Error> for AvroError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::InvalidUtf8(e.to_string())
    }
}

/// Schema builder failure modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaBuildError {
    /// `TypeKind::Reference` to a serial name never seen in the tree.
    UnresolvedReference {
        /// Serial name of the missing type.
        serial_name: String,
    },
    /// Two distinct definitions resolved to the same full name.
    DuplicateName {
        /// Colliding full name.
        full_name: String,
    },
    /// Fixed types need a positive size.
    InvalidFixedSize {
        /// Full name of the fixed type.
        full_name: String,
    },
    /// Enums need at least one symbol.
    EmptyEnum {
        /// Full name of the enum.
        full_name: String,
    },
}

impl fmt::Display for SchemaBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference { serial_name } => {
                write!(f, "unresolved type reference: {}", serial_name)
            }
            Self::DuplicateName { full_name } => {
                write!(f, "conflicting definitions for {}", full_name)
            }
            Self::InvalidFixedSize { full_name } => {
                write!(f, "fixed type {} must have a positive size", full_name)
            }
            Self::EmptyEnum { full_name } => write!(f, "enum {} has no symbols", full_name),
        }
    }
}

impl std::error::Error for SchemaBuildError {}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading the config file failed.
    Io(std::io::Error),
    /// The document could not be parsed.
    Parse(String),
    /// The document parsed but a value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse(msg) => write!(f, "parse error: {}", msg),
            Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
