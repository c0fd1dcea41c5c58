// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch tests against a scripted encoder/decoder.

use super::*;
use crate::naming::RecordNaming;
use crate::schema::{RecordField, RecordSchema, SchemaKind, UnionSchema};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Encoder that records every write and reports a fixed schema.
#[derive(Default)]
struct ScriptedEncoder {
    schema: Option<Arc<Schema>>,
    writes: Vec<String>,
}

impl ScriptedEncoder {
    fn with_schema(schema: Schema) -> Self {
        Self {
            schema: Some(Arc::new(schema)),
            writes: Vec::new(),
        }
    }
}

impl SchemaContext for ScriptedEncoder {
    fn current_field_schema(&self) -> Result<Arc<Schema>, AvroError> {
        self.schema
            .clone()
            .ok_or(AvroError::NoCurrentSchema { operation: "encode" })
    }
}

impl AvroEncoder for ScriptedEncoder {
    fn write_null(&mut self) -> Result<(), AvroError> {
        self.writes.push("null".into());
        Ok(())
    }
    fn write_boolean(&mut self, value: bool) -> Result<(), AvroError> {
        self.writes.push(format!("boolean {}", value));
        Ok(())
    }
    fn write_int(&mut self, value: i32) -> Result<(), AvroError> {
        self.writes.push(format!("int {}", value));
        Ok(())
    }
    fn write_long(&mut self, value: i64) -> Result<(), AvroError> {
        self.writes.push(format!("long {}", value));
        Ok(())
    }
    fn write_float(&mut self, value: f32) -> Result<(), AvroError> {
        self.writes.push(format!("float {}", value));
        Ok(())
    }
    fn write_double(&mut self, value: f64) -> Result<(), AvroError> {
        self.writes.push(format!("double {}", value));
        Ok(())
    }
    fn write_bytes(&mut self, value: &[u8]) -> Result<(), AvroError> {
        self.writes.push(format!("bytes {}", value.len()));
        Ok(())
    }
    fn write_string(&mut self, value: &str) -> Result<(), AvroError> {
        self.writes.push(format!("string {}", value));
        Ok(())
    }
    fn write_fixed(&mut self, value: &[u8]) -> Result<(), AvroError> {
        self.writes.push(format!("fixed {}", value.len()));
        Ok(())
    }
    fn write_enum(&mut self, index: usize) -> Result<(), AvroError> {
        self.writes.push(format!("enum {}", index));
        Ok(())
    }
    fn write_union_index(&mut self, index: usize) -> Result<(), AvroError> {
        self.writes.push(format!("union {}", index));
        Ok(())
    }
}

/// Decoder fed from queues of pre-scripted wire values.
#[derive(Default)]
struct ScriptedDecoder {
    schema: Option<Arc<Schema>>,
    union_indices: VecDeque<usize>,
    longs: VecDeque<i64>,
    nulls_read: usize,
}

impl SchemaContext for ScriptedDecoder {
    fn current_field_schema(&self) -> Result<Arc<Schema>, AvroError> {
        self.schema
            .clone()
            .ok_or(AvroError::NoCurrentSchema { operation: "decode" })
    }
}

impl AvroDecoder for ScriptedDecoder {
    fn read_null(&mut self) -> Result<(), AvroError> {
        self.nulls_read += 1;
        Ok(())
    }
    fn read_boolean(&mut self) -> Result<bool, AvroError> {
        Ok(false)
    }
    fn read_int(&mut self) -> Result<i32, AvroError> {
        Ok(0)
    }
    fn read_long(&mut self) -> Result<i64, AvroError> {
        self.longs
            .pop_front()
            .ok_or(AvroError::UnexpectedEof { offset: 0, needed: 1 })
    }
    fn read_float(&mut self) -> Result<f32, AvroError> {
        Ok(0.0)
    }
    fn read_double(&mut self) -> Result<f64, AvroError> {
        Ok(0.0)
    }
    fn read_bytes(&mut self) -> Result<Vec<u8>, AvroError> {
        Ok(Vec::new())
    }
    fn read_string(&mut self) -> Result<String, AvroError> {
        Ok(String::new())
    }
    fn read_fixed(&mut self, size: usize) -> Result<Vec<u8>, AvroError> {
        Ok(vec![0; size])
    }
    fn read_enum(&mut self) -> Result<usize, AvroError> {
        Ok(0)
    }
    fn read_union_index(&mut self) -> Result<usize, AvroError> {
        self.union_indices
            .pop_front()
            .ok_or(AvroError::UnexpectedEof { offset: 0, needed: 1 })
    }
}

/// Codec that remembers the schema kind it was handed and writes a long.
#[derive(Default)]
struct ProbeCodec {
    encoded_with: Cell<Option<SchemaKind>>,
    decoded_with: RefCell<Vec<SchemaKind>>,
}

impl AvroCodec for ProbeCodec {
    type Value = i64;

    fn encode_value<E: AvroEncoder + ?Sized>(
        &self,
        schema: &Schema,
        encoder: &mut E,
        value: &i64,
    ) -> Result<(), AvroError> {
        self.encoded_with.set(Some(schema.kind()));
        encoder.write_long(*value)
    }

    fn decode_value<D: AvroDecoder + ?Sized>(
        &self,
        schema: &Schema,
        decoder: &mut D,
    ) -> Result<i64, AvroError> {
        self.decoded_with.borrow_mut().push(schema.kind());
        match schema {
            Schema::Union(_) => {
                let branch = read_union_branch(schema, decoder)?;
                self.decode_value(&branch, decoder)
            }
            _ => decoder.read_long(),
        }
    }
}

fn record() -> Arc<Schema> {
    Arc::new(Schema::Record(RecordSchema {
        naming: RecordNaming::from_path("a.Probe", &[]),
        doc: None,
        aliases: Vec::new(),
        fields: vec![RecordField::new("v", Arc::new(Schema::Long))],
    }))
}

fn union(variants: Vec<Arc<Schema>>) -> Schema {
    Schema::Union(UnionSchema::new(variants))
}

#[test]
fn test_encode_unwraps_null_first_union() {
    let codec = ProbeCodec::default();
    let mut encoder = ScriptedEncoder::with_schema(union(vec![Arc::new(Schema::Null), record()]));

    encode(&codec, &mut encoder, &5).expect("encode");

    assert_eq!(codec.encoded_with.get(), Some(SchemaKind::Record));
    assert_eq!(encoder.writes, vec!["union 1", "long 5"]);
}

#[test]
fn test_encode_unwraps_null_last_union() {
    let codec = ProbeCodec::default();
    let mut encoder = ScriptedEncoder::with_schema(union(vec![record(), Arc::new(Schema::Null)]));

    encode(&codec, &mut encoder, &5).expect("encode");

    assert_eq!(codec.encoded_with.get(), Some(SchemaKind::Record));
    assert_eq!(encoder.writes, vec!["union 0", "long 5"]);
}

#[test]
fn test_encode_picks_first_non_null_of_several() {
    let codec = ProbeCodec::default();
    let mut encoder = ScriptedEncoder::with_schema(union(vec![
        Arc::new(Schema::Null),
        Arc::new(Schema::Long),
        Arc::new(Schema::String),
    ]));

    encode(&codec, &mut encoder, &1).expect("encode");
    assert_eq!(codec.encoded_with.get(), Some(SchemaKind::Long));
    assert_eq!(encoder.writes[0], "union 1");
}

#[test]
fn test_encode_passes_plain_schema_through() {
    let codec = ProbeCodec::default();
    let mut encoder = ScriptedEncoder::with_schema(Schema::Long);

    encode(&codec, &mut encoder, &9).expect("encode");
    assert_eq!(codec.encoded_with.get(), Some(SchemaKind::Long));
    assert_eq!(encoder.writes, vec!["long 9"]);
}

#[test]
fn test_encode_keeps_non_nullable_union() {
    let codec = ProbeCodec::default();
    let mut encoder =
        ScriptedEncoder::with_schema(union(vec![Arc::new(Schema::Long), Arc::new(Schema::String)]));

    encode(&codec, &mut encoder, &3).expect("encode");
    assert_eq!(codec.encoded_with.get(), Some(SchemaKind::Union));
    assert_eq!(encoder.writes, vec!["long 3"]);
}

#[test]
fn test_encode_without_schema_is_fatal() {
    let codec = ProbeCodec::default();
    let mut encoder = ScriptedEncoder::default();

    let err = encode(&codec, &mut encoder, &1).expect_err("no schema");
    assert!(err.is_fatal());
    assert!(codec.encoded_with.get().is_none());
    assert!(encoder.writes.is_empty());
}

#[test]
fn test_encode_null_only_union_fails() {
    let codec = ProbeCodec::default();
    let mut encoder = ScriptedEncoder::with_schema(union(vec![Arc::new(Schema::Null)]));

    let err = encode(&codec, &mut encoder, &1).expect_err("nothing to encode into");
    assert!(matches!(err, AvroError::NoMatchingBranch(_)));
    assert!(!err.is_fatal());
}

#[test]
fn test_decode_receives_raw_union() {
    let codec = ProbeCodec::default();
    let mut decoder = ScriptedDecoder {
        schema: Some(Arc::new(union(vec![Arc::new(Schema::Null), Arc::new(Schema::Long)]))),
        union_indices: VecDeque::from([1]),
        longs: VecDeque::from([42]),
        ..Default::default()
    };

    assert_eq!(decode(&codec, &mut decoder).expect("decode"), 42);
    assert_eq!(
        *codec.decoded_with.borrow(),
        vec![SchemaKind::Union, SchemaKind::Long]
    );
}

#[test]
fn test_decode_without_schema_is_fatal() {
    let codec = ProbeCodec::default();
    let mut decoder = ScriptedDecoder::default();

    let err = decode(&codec, &mut decoder).expect_err("no schema");
    assert_eq!(err, AvroError::NoCurrentSchema { operation: "decode" });
    assert!(codec.decoded_with.borrow().is_empty());
}

#[test]
fn test_optional_none_writes_null_branch() {
    let codec = ProbeCodec::default();
    let mut encoder = ScriptedEncoder::with_schema(union(vec![Arc::new(Schema::Long), Arc::new(Schema::Null)]));
    encode_optional(&codec, &mut encoder, None).expect("encode");
    assert_eq!(encoder.writes, vec!["union 1"]);

    let mut encoder = ScriptedEncoder::with_schema(Schema::Long);
    assert_eq!(
        encode_optional(&codec, &mut encoder, None),
        Err(AvroError::NoNullBranch)
    );

    let mut encoder = ScriptedEncoder::with_schema(union(vec![Arc::new(Schema::Null), Arc::new(Schema::Long)]));
    encode_optional(&codec, &mut encoder, Some(&8)).expect("encode");
    assert_eq!(encoder.writes, vec!["union 1", "long 8"]);
}

#[test]
fn test_optional_decode_selects_branch() {
    let codec = ProbeCodec::default();
    let nullable = Arc::new(union(vec![Arc::new(Schema::Null), Arc::new(Schema::Long)]));
    let mut decoder = ScriptedDecoder {
        schema: Some(nullable),
        union_indices: VecDeque::from([0, 1]),
        longs: VecDeque::from([11]),
        ..Default::default()
    };

    assert_eq!(decode_optional(&codec, &mut decoder).expect("null"), None);
    assert_eq!(decode_optional(&codec, &mut decoder).expect("value"), Some(11));
    assert_eq!(*codec.decoded_with.borrow(), vec![SchemaKind::Long]);
}

#[test]
fn test_read_union_branch_checks_range_and_kind() {
    let mut decoder = ScriptedDecoder {
        union_indices: VecDeque::from([5]),
        ..Default::default()
    };
    let schema = union(vec![Arc::new(Schema::Null), Arc::new(Schema::Long)]);
    assert_eq!(
        read_union_branch(&schema, &mut decoder),
        Err(AvroError::UnionBranchOutOfRange {
            index: 5,
            branches: 2
        })
    );
    assert!(matches!(
        read_union_branch(&Schema::Long, &mut decoder),
        Err(AvroError::SchemaMismatch { expected: "union", .. })
    ));
}

#[test]
fn test_unresolved_branch_reference_reported() {
    let codec = ProbeCodec::default();
    let mut encoder = ScriptedEncoder::with_schema(union(vec![
        Arc::new(Schema::Null),
        Arc::new(Schema::Ref("a.Elsewhere".into())),
    ]));
    assert_eq!(
        encode(&codec, &mut encoder, &1),
        Err(AvroError::UnresolvedReference("a.Elsewhere".into()))
    );
    assert_eq!(encoder.writes, vec!["union 1"]);
}
