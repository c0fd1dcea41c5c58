// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for record descriptors.

use crate::annotations::Annotation;
use crate::descriptor::{FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
use std::sync::Arc;

/// Builder for record [`TypeDescriptor`]s.
#[derive(Debug)]
pub struct RecordDescriptorBuilder {
    serial_name: String,
    annotations: Vec<Annotation>,
    type_params: Vec<Arc<TypeDescriptor>>,
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptorBuilder {
    /// Create a new builder for the record at `serial_name` (e.g. `com.acme.Sensor`).
    pub fn new(serial_name: impl Into<String>) -> Self {
        Self {
            serial_name: serial_name.into(),
            annotations: Vec::new(),
            type_params: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Add a type-level annotation.
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add a type argument (for generic records).
    pub fn type_param(mut self, param: Arc<TypeDescriptor>) -> Self {
        self.type_params.push(param);
        self
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind)))
    }

    /// Add a nullable primitive field.
    pub fn optional_field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind).into_nullable()))
    }

    /// Add a field with a type descriptor.
    pub fn field_with_type(mut self, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a fully configured field (annotations, default).
    pub fn field_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a list field.
    pub fn list_field(self, name: impl Into<String>, element: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::list(element)))
    }

    /// Add a string-keyed map field.
    pub fn map_field(self, name: impl Into<String>, value: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::map(value)))
    }

    /// Add a fixed field named after the field position.
    pub fn fixed_field(self, name: impl Into<String>, size: usize) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::fixed("", size)))
    }

    /// Add a recursive back-reference field (nullable, like `next: Option<Node>`).
    pub fn recursive_field(self, name: impl Into<String>, serial_name: impl Into<String>) -> Self {
        let reference = TypeDescriptor::reference(serial_name).into_nullable();
        self.field_with_type(name, Arc::new(reference))
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            serial_name: self.serial_name,
            nullable: false,
            annotations: self.annotations,
            type_params: self.type_params,
            kind: TypeKind::Record(self.fields),
        }
    }
}
