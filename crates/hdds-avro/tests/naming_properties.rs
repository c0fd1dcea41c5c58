// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test readability over pedantic
#![allow(clippy::doc_markdown)] // Test documentation
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Naming resolution properties through the public API.

use hdds_avro::{
    Annotation, DefaultNamingStrategy, NamingStrategy, PrimitiveKind, RecordDescriptorBuilder,
    RecordNaming, SnakeCaseNamingStrategy, TypeDescriptor,
};
use std::sync::{Arc, Barrier};
use std::thread;

const PATHS: &[&str] = &[
    "com.acme.Sensor",
    "com.acme.Outer.Inner",
    "com.acme.Factory.<init>",
    "com.acme.Handler.<anonymous>",
    "a.b.<init>.Local",
    "TopLevel",
    "",
    "x.HTTPServer",
];

#[test]
fn path_roundtrips_through_full_name() {
    for path in ["com.acme.Sensor", "a.b.c.D", "Solo"] {
        let naming = RecordNaming::from_path(path, &[]);
        assert_eq!(naming.full_name(), path);
        let again = RecordNaming::from_path(naming.full_name(), &[]);
        assert_eq!(again, naming);
    }
}

#[test]
fn synthetic_markers_never_reach_identity() {
    let cases = [
        ("com.acme.Factory.<init>", "com.acme.Factory"),
        ("com.acme.Handler.<anonymous>", "com.acme.Handler"),
        ("a.b.<init>.Local", "a.b.Local"),
        ("a.Outer.<anonymous>.<init>", "a.Outer"),
    ];
    for (path, expected) in cases {
        let naming = RecordNaming::from_path(path, &[]);
        assert_eq!(naming.full_name(), expected, "path {}", path);
        assert!(!naming.full_name().contains('<'));
    }
}

#[test]
fn overrides_replace_derived_parts() {
    let renamed = RecordNaming::from_path("com.acme.Sensor", &[Annotation::Name("Probe".into())]);
    assert_eq!(renamed.name(), "Probe");
    assert_eq!(renamed.namespace(), Some("com.acme"));

    let moved = RecordNaming::from_path(
        "com.acme.Sensor",
        &[Annotation::Namespace("telemetry.v2".into())],
    );
    assert_eq!(moved.full_name(), "telemetry.v2.Sensor");

    let cleared = RecordNaming::from_path("com.acme.Sensor", &[Annotation::Namespace(String::new())]);
    assert_eq!(cleared.namespace(), None);
    assert_eq!(cleared.full_name(), "Sensor");
}

#[test]
fn strategy_touches_only_the_simple_name() {
    let naming = RecordNaming::new(
        "com.AcmeCorp.SensorReading",
        &[],
        &SnakeCaseNamingStrategy,
    );
    assert_eq!(naming.name(), "sensor_reading");
    assert_eq!(naming.namespace(), Some("com.AcmeCorp"));

    let explicit = RecordNaming::new(
        "com.acme.Ignored",
        &[Annotation::Name("MyRecord".into())],
        &SnakeCaseNamingStrategy,
    );
    assert_eq!(explicit.name(), "my_record");
}

#[test]
fn full_name_never_starts_with_a_dot() {
    for path in PATHS {
        let naming = RecordNaming::from_path(path, &[]);
        assert!(!naming.full_name().starts_with('.'), "path {:?}", path);
        if naming.namespace().is_none() {
            assert_eq!(naming.full_name(), naming.name());
        }
    }
}

#[test]
fn descriptor_and_field_naming() {
    let desc = RecordDescriptorBuilder::new("com.acme.Sensor")
        .annotation(Annotation::Namespace("telemetry".into()))
        .field("readingId", PrimitiveKind::Long)
        .build()
        .into_nullable();

    let naming = RecordNaming::from_descriptor_default(&desc);
    assert_eq!(naming.full_name(), "telemetry.Sensor");

    let field = RecordNaming::for_field(&desc, 0, &SnakeCaseNamingStrategy).expect("field 0");
    assert_eq!(field.name(), "reading_id");
    assert!(RecordNaming::for_field(&desc, 1, &DefaultNamingStrategy).is_none());
    assert!(RecordNaming::for_field(
        &TypeDescriptor::primitive(PrimitiveKind::Int),
        0,
        &DefaultNamingStrategy
    )
    .is_none());
}

#[test]
fn concurrent_resolution_matches_sequential() {
    let strategies: [Arc<dyn NamingStrategy>; 2] =
        [Arc::new(DefaultNamingStrategy), Arc::new(SnakeCaseNamingStrategy)];
    let annotations = Arc::new(vec![
        Annotation::Doc("ignored by naming".into()),
        Annotation::Namespace("shared.ns".into()),
    ]);

    let sequential: Vec<Vec<RecordNaming>> = strategies
        .iter()
        .map(|s| {
            PATHS
                .iter()
                .map(|p| RecordNaming::new(p, &annotations, s.as_ref()))
                .collect()
        })
        .collect();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let strategy = Arc::clone(&strategies[i % 2]);
            let annotations = Arc::clone(&annotations);
            thread::spawn(move || {
                barrier.wait();
                let mut out = Vec::new();
                for _ in 0..100 {
                    out = PATHS
                        .iter()
                        .map(|p| RecordNaming::new(p, &annotations, strategy.as_ref()))
                        .collect::<Vec<_>>();
                }
                (i % 2, out)
            })
        })
        .collect();

    for handle in handles {
        let (strategy_index, namings) = handle.join().expect("thread");
        assert_eq!(namings, sequential[strategy_index]);
    }
}
