// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural type descriptions.
//!
//! A [`TypeDescriptor`] carries everything schema derivation needs to know
//! about a type: its serial name (a dot-delimited type path), nullability,
//! declared annotations, type parameters and shape. Field positions carry
//! their own name and annotations independently of the field's value type.
//!
//! Nullable descriptors follow the serial-name convention of a trailing `?`
//! (`com.acme.Sensor?`); naming strips it again.

mod builder;

pub use builder::RecordDescriptorBuilder;

use crate::annotations::Annotation;
use std::sync::Arc;

/// Suffix appended to the serial name of nullable descriptors.
pub const NULLABLE_SUFFIX: char = '?';

/// Primitive kinds understood by the default type mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Bytes,
}

impl PrimitiveKind {
    /// Conventional serial name for the primitive.
    pub fn serial_name(&self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::Byte => "i8",
            Self::Short => "i16",
            Self::Int => "i32",
            Self::Long => "i64",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::Char => "char",
            Self::String => "String",
            Self::Bytes => "Bytes",
        }
    }
}

/// Shape of a described type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    /// Aggregate with named fields, in declaration order.
    Record(Vec<FieldDescriptor>),
    /// Enumeration with ordered symbols.
    Enum(Vec<String>),
    List(Arc<TypeDescriptor>),
    /// Map with string keys.
    Map(Arc<TypeDescriptor>),
    /// Fixed-size byte array.
    Fixed(usize),
    /// Back-reference, by serial name, to a type defined elsewhere in the
    /// same tree. Used for recursive types.
    Reference(String),
}

/// A complete structural description of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Dot-delimited type path, e.g. `com.acme.Sensor`.
    pub serial_name: String,
    pub nullable: bool,
    /// Annotations declared on the type, in declaration order.
    pub annotations: Vec<Annotation>,
    /// Type arguments of a generic type, e.g. `T` of `Page<T>`.
    pub type_params: Vec<Arc<TypeDescriptor>>,
    pub kind: TypeKind,
}

impl TypeDescriptor {
    pub fn new(serial_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            serial_name: serial_name.into(),
            nullable: false,
            annotations: Vec::new(),
            type_params: Vec::new(),
            kind,
        }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.serial_name(), TypeKind::Primitive(kind))
    }

    pub fn record(serial_name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(serial_name, TypeKind::Record(fields))
    }

    pub fn enumeration<S: Into<String>>(
        serial_name: impl Into<String>,
        symbols: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            serial_name,
            TypeKind::Enum(symbols.into_iter().map(Into::into).collect()),
        )
    }

    pub fn list(element: Arc<TypeDescriptor>) -> Self {
        Self::new("List", TypeKind::List(element))
    }

    pub fn map(value: Arc<TypeDescriptor>) -> Self {
        Self::new("Map", TypeKind::Map(value))
    }

    /// Fixed-size bytes. An empty serial name makes the schema builder take
    /// the identity from the enclosing field position.
    pub fn fixed(serial_name: impl Into<String>, size: usize) -> Self {
        Self::new(serial_name, TypeKind::Fixed(size))
    }

    /// Back-reference to the type with the given serial name.
    pub fn reference(serial_name: impl Into<String>) -> Self {
        let serial_name = serial_name.into();
        Self::new(serial_name.clone(), TypeKind::Reference(serial_name))
    }

    /// Nullable variant of this descriptor (serial name gains a `?`).
    pub fn into_nullable(mut self) -> Self {
        if !self.nullable {
            self.nullable = true;
            self.serial_name.push(NULLABLE_SUFFIX);
        }
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_type_param(mut self, param: Arc<TypeDescriptor>) -> Self {
        self.type_params.push(param);
        self
    }

    /// Serial name without the nullable marker.
    pub fn base_serial_name(&self) -> &str {
        if self.nullable {
            self.serial_name
                .strip_suffix(NULLABLE_SUFFIX)
                .unwrap_or(&self.serial_name)
        } else {
            &self.serial_name
        }
    }

    /// Whether the type maps to a named schema (record, enum, fixed).
    pub fn is_named(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Record(_) | TypeKind::Enum(_) | TypeKind::Fixed(_)
        )
    }

    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Number of element (field) positions.
    pub fn elements_count(&self) -> usize {
        self.fields().map_or(0, <[FieldDescriptor]>::len)
    }

    /// Local name of the field at `index`.
    pub fn element_name(&self, index: usize) -> Option<&str> {
        self.fields()?.get(index).map(|f| f.name.as_str())
    }

    /// Annotations declared on the field at `index`, not on its type.
    pub fn element_annotations(&self, index: usize) -> Option<&[Annotation]> {
        self.fields()?.get(index).map(|f| f.annotations.as_slice())
    }
}

/// A named field position within a record descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Annotations on the field itself.
    pub annotations: Vec<Annotation>,
    pub type_desc: Arc<TypeDescriptor>,
    /// Default value written to the generated schema.
    pub default: Option<serde_json::Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            type_desc,
            default: None,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_marks_serial_name() {
        let desc = TypeDescriptor::record("a.b.Sensor", Vec::new()).into_nullable();
        assert!(desc.nullable);
        assert_eq!(desc.serial_name, "a.b.Sensor?");
        assert_eq!(desc.base_serial_name(), "a.b.Sensor");

        // Idempotent
        let again = desc.into_nullable();
        assert_eq!(again.serial_name, "a.b.Sensor?");
    }

    #[test]
    fn test_element_accessors() {
        let int = Arc::new(TypeDescriptor::primitive(PrimitiveKind::Int));
        let desc = TypeDescriptor::record(
            "a.Point",
            vec![
                FieldDescriptor::new("x", int.clone()),
                FieldDescriptor::new("y", int).with_annotation(Annotation::Name("why".into())),
            ],
        );
        assert_eq!(desc.elements_count(), 2);
        assert_eq!(desc.element_name(1), Some("y"));
        assert_eq!(
            desc.element_annotations(1),
            Some(&[Annotation::Name("why".into())][..])
        );
        assert_eq!(desc.element_name(2), None);
        assert!(desc.field("x").is_some());
        assert!(desc.is_named());
    }

    #[test]
    fn test_primitive_has_no_elements() {
        let desc = TypeDescriptor::primitive(PrimitiveKind::Long);
        assert_eq!(desc.serial_name, "i64");
        assert_eq!(desc.elements_count(), 0);
        assert_eq!(desc.element_annotations(0), None);
        assert!(!desc.is_named());
    }
}
