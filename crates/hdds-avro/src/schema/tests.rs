// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tests for schema derivation and rendering.

use super::*;
use crate::annotations::Annotation;
use crate::descriptor::{FieldDescriptor, PrimitiveKind, RecordDescriptorBuilder, TypeDescriptor};
use crate::error::SchemaBuildError;
use crate::naming::{DefaultNamingStrategy, SnakeCaseNamingStrategy};

fn build(desc: &TypeDescriptor) -> Arc<Schema> {
    SchemaBuilder::new(&DefaultNamingStrategy)
        .build(desc)
        .expect("schema builds")
}

fn as_record(schema: &Schema) -> &RecordSchema {
    match schema {
        Schema::Record(r) => r,
        other => panic!("expected record, got {:?}", other.kind()),
    }
}

#[test]
fn test_flat_record() {
    let desc = RecordDescriptorBuilder::new("com.acme.Sensor")
        .field("id", PrimitiveKind::Long)
        .field("temperature", PrimitiveKind::Double)
        .field("active", PrimitiveKind::Boolean)
        .build();
    let schema = build(&desc);
    let record = as_record(&schema);

    assert_eq!(record.naming.full_name(), "com.acme.Sensor");
    assert_eq!(record.fields.len(), 3);
    assert_eq!(*record.fields[0].schema, Schema::Long);
    assert_eq!(*record.fields[1].schema, Schema::Double);
    assert_eq!(*record.fields[2].schema, Schema::Boolean);
}

#[test]
fn test_nullable_field_becomes_union_with_null_default() {
    let desc = RecordDescriptorBuilder::new("a.Reading")
        .optional_field("label", PrimitiveKind::String)
        .build();
    let schema = build(&desc);
    let field = &as_record(&schema).fields[0];

    match field.schema.as_ref() {
        Schema::Union(u) => {
            assert_eq!(u.null_index(), Some(0));
            assert_eq!(u.first_non_null().map(|(i, s)| (i, s.kind())), Some((1, SchemaKind::String)));
        }
        other => panic!("expected union, got {:?}", other.kind()),
    }
    assert_eq!(field.default, Some(serde_json::Value::Null));

    let no_default = SchemaBuilder::new(&DefaultNamingStrategy)
        .implicit_nulls(false)
        .build(&desc)
        .expect("build");
    assert_eq!(as_record(&no_default).fields[0].default, None);
}

#[test]
fn test_field_names_follow_strategy_and_annotations() {
    let desc = RecordDescriptorBuilder::new("a.SensorReading")
        .field("sensorId", PrimitiveKind::Int)
        .field_descriptor(
            FieldDescriptor::new("rawValue", Arc::new(TypeDescriptor::primitive(PrimitiveKind::Float)))
                .with_annotation(Annotation::Name("value".into()))
                .with_annotation(Annotation::Doc("calibrated".into())),
        )
        .build();
    let schema = SchemaBuilder::new(&SnakeCaseNamingStrategy)
        .build(&desc)
        .expect("build");
    let record = as_record(&schema);

    assert_eq!(record.naming.name(), "sensor_reading");
    assert_eq!(record.naming.namespace(), Some("a"));
    assert_eq!(record.fields[0].name, "sensor_id");
    assert_eq!(record.fields[1].name, "value");
    assert_eq!(record.fields[1].doc.as_deref(), Some("calibrated"));
}

#[test]
fn test_recursive_type_uses_reference() {
    let desc = RecordDescriptorBuilder::new("a.Node")
        .field("value", PrimitiveKind::Int)
        .recursive_field("next", "a.Node")
        .build();
    let schema = build(&desc);
    let record = as_record(&schema);

    match record.fields[1].schema.as_ref() {
        Schema::Union(u) => assert_eq!(*u.variants()[1], Schema::Ref("a.Node".into())),
        other => panic!("expected union, got {:?}", other.kind()),
    }
    assert_eq!(
        schema.canonical_form(),
        r#"{"name":"a.Node","type":"record","fields":[{"name":"value","type":"int"},{"name":"next","type":["null","a.Node"]}]}"#
    );
}

#[test]
fn test_reference_follows_renamed_type() {
    let desc = RecordDescriptorBuilder::new("a.Node")
        .annotation(Annotation::Name("TreeNode".into()))
        .annotation(Annotation::Namespace("trees".into()))
        .list_field("children", Arc::new(TypeDescriptor::reference("a.Node")))
        .build();
    let schema = build(&desc);
    let children = &as_record(&schema).fields[0].schema;
    assert_eq!(
        **children,
        Schema::Array(Arc::new(Schema::Ref("trees.TreeNode".into())))
    );
}

#[test]
fn test_unresolved_reference_fails() {
    let desc = RecordDescriptorBuilder::new("a.Holder")
        .field_with_type("missing", Arc::new(TypeDescriptor::reference("a.Elsewhere")))
        .build();
    let err = SchemaBuilder::new(&DefaultNamingStrategy)
        .build(&desc)
        .expect_err("reference cannot resolve");
    assert_eq!(
        err,
        SchemaBuildError::UnresolvedReference {
            serial_name: "a.Elsewhere".into()
        }
    );
}

#[test]
fn test_repeated_type_defined_once() {
    let point = Arc::new(
        RecordDescriptorBuilder::new("geo.Point")
            .field("x", PrimitiveKind::Double)
            .field("y", PrimitiveKind::Double)
            .build(),
    );
    let desc = RecordDescriptorBuilder::new("geo.Segment")
        .field_with_type("from", point.clone())
        .field_with_type("to", point)
        .build();
    let schema = build(&desc);
    let record = as_record(&schema);

    assert_eq!(record.fields[0].schema.kind(), SchemaKind::Record);
    assert_eq!(*record.fields[1].schema, Schema::Ref("geo.Point".into()));
    assert_eq!(SchemaNames::from_root(&schema).len(), 2);
}

#[test]
fn test_conflicting_definitions_rejected() {
    let first = Arc::new(RecordDescriptorBuilder::new("a.Thing").field("x", PrimitiveKind::Int).build());
    let second = Arc::new(
        RecordDescriptorBuilder::new("b.Other")
            .annotation(Annotation::Namespace("a".into()))
            .annotation(Annotation::Name("Thing".into()))
            .field("y", PrimitiveKind::Long)
            .build(),
    );
    let desc = RecordDescriptorBuilder::new("a.Pair")
        .field_with_type("first", first)
        .field_with_type("second", second)
        .build();
    let err = SchemaBuilder::new(&DefaultNamingStrategy)
        .build(&desc)
        .expect_err("duplicate name");
    assert_eq!(
        err,
        SchemaBuildError::DuplicateName {
            full_name: "a.Thing".into()
        }
    );
}

#[test]
fn test_generic_record_name() {
    let sensor = Arc::new(RecordDescriptorBuilder::new("a.Sensor").field("id", PrimitiveKind::Int).build());
    let page = RecordDescriptorBuilder::new("a.Page")
        .type_param(sensor.clone())
        .type_param(Arc::new(TypeDescriptor::primitive(PrimitiveKind::String)))
        .list_field("items", sensor.clone())
        .build();
    let schema = build(&page);
    assert_eq!(schema.full_name(), Some("a.Page__Sensor_string"));

    let erased = RecordDescriptorBuilder::new("a.Page")
        .annotation(Annotation::ErasedName)
        .type_param(sensor.clone())
        .list_field("items", sensor)
        .build();
    assert_eq!(build(&erased).full_name(), Some("a.Page"));
}

#[test]
fn test_generic_collection_params_keep_element_type() {
    let page = |element: PrimitiveKind| {
        let list = Arc::new(TypeDescriptor::list(Arc::new(TypeDescriptor::primitive(element))));
        RecordDescriptorBuilder::new("a.Page")
            .type_param(list.clone())
            .field_with_type("items", list)
            .build()
    };
    assert_eq!(build(&page(PrimitiveKind::Int)).full_name(), Some("a.Page__array_int"));
    assert_eq!(
        build(&page(PrimitiveKind::String)).full_name(),
        Some("a.Page__array_string")
    );

    let nested = RecordDescriptorBuilder::new("a.Index")
        .type_param(Arc::new(TypeDescriptor::map(Arc::new(TypeDescriptor::list(
            Arc::new(TypeDescriptor::primitive(PrimitiveKind::Long)),
        )))))
        .build();
    assert_eq!(build(&nested).full_name(), Some("a.Index__map_array_long"));
}

#[test]
fn test_generic_variants_coexist_in_one_tree() {
    let page = |element: PrimitiveKind| {
        let list = Arc::new(TypeDescriptor::list(Arc::new(TypeDescriptor::primitive(element))));
        Arc::new(
            RecordDescriptorBuilder::new("a.Page")
                .type_param(list.clone())
                .field_with_type("items", list)
                .build(),
        )
    };
    let holder = RecordDescriptorBuilder::new("a.Holder")
        .field_with_type("ints", page(PrimitiveKind::Int))
        .field_with_type("names", page(PrimitiveKind::String))
        .build();
    let schema = build(&holder);
    let record = as_record(&schema);
    assert_eq!(record.fields[0].schema.full_name(), Some("a.Page__array_int"));
    assert_eq!(record.fields[1].schema.full_name(), Some("a.Page__array_string"));
}

#[test]
fn test_fixed_field_named_from_position() {
    let desc = RecordDescriptorBuilder::new("net.Device")
        .fixed_field("mac", 6)
        .build();
    let schema = build(&desc);
    match as_record(&schema).fields[0].schema.as_ref() {
        Schema::Fixed(f) => {
            assert_eq!(f.naming.full_name(), "net.mac");
            assert_eq!(f.size, 6);
        }
        other => panic!("expected fixed, got {:?}", other.kind()),
    }
}

#[test]
fn test_enum_and_map() {
    let color = Arc::new(TypeDescriptor::enumeration("a.Color", ["RED", "GREEN"]));
    let desc = RecordDescriptorBuilder::new("a.Palette")
        .field_with_type("primary", color)
        .map_field("weights", Arc::new(TypeDescriptor::primitive(PrimitiveKind::Float)))
        .build();
    let schema = build(&desc);
    assert_eq!(
        schema.canonical_form(),
        r#"{"name":"a.Palette","type":"record","fields":[{"name":"primary","type":{"name":"a.Color","type":"enum","symbols":["RED","GREEN"]}},{"name":"weights","type":{"type":"map","values":"float"}}]}"#
    );

    let empty = TypeDescriptor::enumeration("a.Empty", Vec::<String>::new());
    assert!(matches!(
        SchemaBuilder::new(&DefaultNamingStrategy).build(&empty),
        Err(SchemaBuildError::EmptyEnum { .. })
    ));
}

#[test]
fn test_fingerprint_stable_and_distinct() {
    let a = build(&RecordDescriptorBuilder::new("a.A").field("x", PrimitiveKind::Int).build());
    let a_again = build(&RecordDescriptorBuilder::new("a.A").field("x", PrimitiveKind::Int).build());
    let b = build(&RecordDescriptorBuilder::new("a.A").field("x", PrimitiveKind::Long).build());

    assert_eq!(a.fingerprint_md5(), a_again.fingerprint_md5());
    assert_ne!(a.fingerprint_md5(), b.fingerprint_md5());
    assert_eq!(a.fingerprint_md5().to_string().len(), 32);
}

#[test]
fn test_primitive_canonical_form() {
    // md5(b"\"int\"")
    assert_eq!(Schema::Int.canonical_form(), "\"int\"");
    assert_eq!(
        Schema::Int.fingerprint_md5().to_string(),
        "ef524ea1b91e73173d938ade36c1db32"
    );
}

#[test]
fn test_to_json_keeps_metadata() {
    let desc = RecordDescriptorBuilder::new("a.b.Sensor")
        .annotation(Annotation::Doc("A sensor".into()))
        .annotation(Annotation::Alias("OldSensor".into()))
        .optional_field("label", PrimitiveKind::String)
        .build();
    let json = build(&desc).to_json();

    assert_eq!(json["type"], "record");
    assert_eq!(json["name"], "Sensor");
    assert_eq!(json["namespace"], "a.b");
    assert_eq!(json["doc"], "A sensor");
    assert_eq!(json["aliases"][0], "OldSensor");
    assert_eq!(json["fields"][0]["type"], serde_json::json!(["null", "string"]));
    assert!(json["fields"][0]["default"].is_null());
}

#[test]
fn test_schema_names_resolve_refs() {
    let desc = RecordDescriptorBuilder::new("a.Node")
        .recursive_field("next", "a.Node")
        .build();
    let schema = build(&desc);
    let names = SchemaNames::from_root(&schema);
    let reference = Arc::new(Schema::Ref("a.Node".into()));
    let resolved = names.resolve(&reference).expect("resolves");
    assert!(Arc::ptr_eq(&resolved, &schema));
    assert!(names.resolve(&Arc::new(Schema::Ref("a.Missing".into()))).is_none());
}
