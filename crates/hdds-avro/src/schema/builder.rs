// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema derivation from structural type descriptors.
//!
//! The builder walks a [`TypeDescriptor`] depth-first. Named types (records,
//! enums, fixed) are interned by full name: the first occurrence is written
//! out in full, later occurrences (including recursive ones) become
//! [`Schema::Ref`].

use super::{EnumSchema, FixedSchema, RecordField, RecordSchema, Schema};
use crate::annotations::AnnotationExtractor;
use crate::descriptor::{PrimitiveKind, TypeDescriptor, TypeKind};
use crate::error::SchemaBuildError;
use crate::naming::{NamingStrategy, RecordNaming};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Identity of the field position a type is built for.
struct FieldPosition<'n> {
    naming: RecordNaming,
    enclosing_namespace: Option<&'n str>,
}

/// One-shot builder turning a descriptor into a schema tree.
pub struct SchemaBuilder<'a> {
    strategy: &'a dyn NamingStrategy,
    implicit_nulls: bool,
    /// Full name -> (base serial name, kind) of each completed named type.
    defined: HashMap<String, (String, TypeKind)>,
    in_progress: HashSet<String>,
    /// Base serial name -> full name, for `TypeKind::Reference`.
    serial_names: HashMap<String, String>,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(strategy: &'a dyn NamingStrategy) -> Self {
        Self {
            strategy,
            implicit_nulls: true,
            defined: HashMap::new(),
            in_progress: HashSet::new(),
            serial_names: HashMap::new(),
        }
    }

    /// Give nullable fields a `null` default (on by default).
    pub fn implicit_nulls(mut self, enabled: bool) -> Self {
        self.implicit_nulls = enabled;
        self
    }

    /// Build the schema tree for `descriptor`.
    pub fn build(mut self, descriptor: &TypeDescriptor) -> Result<Arc<Schema>, SchemaBuildError> {
        self.build_type(descriptor, None)
    }

    /// Naming of a named descriptor, including the generic suffix.
    pub fn naming_for(&self, descriptor: &TypeDescriptor) -> RecordNaming {
        let naming = RecordNaming::from_descriptor(descriptor, self.strategy);
        if descriptor.type_params.is_empty() {
            return naming;
        }
        let erase = AnnotationExtractor::new(&descriptor.annotations).erase_generics();
        let params: Vec<String> = descriptor
            .type_params
            .iter()
            .map(|p| self.param_name(p))
            .collect();
        naming.with_type_parameters(&params, erase, self.strategy)
    }

    fn param_name(&self, param: &TypeDescriptor) -> String {
        match &param.kind {
            TypeKind::Primitive(p) => primitive_schema(*p).kind().as_str().to_string(),
            TypeKind::Record(_) | TypeKind::Enum(_) | TypeKind::Fixed(_) => {
                self.naming_for(param).name().to_string()
            }
            TypeKind::List(element) => format!("array_{}", self.param_name(element)),
            TypeKind::Map(value) => format!("map_{}", self.param_name(value)),
            TypeKind::Reference(serial) => self
                .serial_names
                .get(serial)
                .map(|full| full.rsplit('.').next().unwrap_or(full).to_string())
                .unwrap_or_else(|| RecordNaming::new(serial, &[], self.strategy).name().to_string()),
        }
    }

    fn build_type(
        &mut self,
        descriptor: &TypeDescriptor,
        position: Option<FieldPosition<'_>>,
    ) -> Result<Arc<Schema>, SchemaBuildError> {
        let schema = match &descriptor.kind {
            TypeKind::Primitive(p) => Arc::new(primitive_schema(*p)),
            TypeKind::Record(_) => self.build_record(descriptor)?,
            TypeKind::Enum(symbols) => self.build_enum(descriptor, symbols)?,
            TypeKind::Fixed(size) => self.build_fixed(descriptor, *size, position)?,
            TypeKind::List(element) => {
                let items = self.build_type(element, None)?;
                Arc::new(Schema::Array(items))
            }
            TypeKind::Map(value) => {
                let values = self.build_type(value, None)?;
                Arc::new(Schema::Map(values))
            }
            TypeKind::Reference(serial) => {
                let full_name = self.serial_names.get(serial).cloned().ok_or_else(|| {
                    SchemaBuildError::UnresolvedReference {
                        serial_name: serial.clone(),
                    }
                })?;
                Arc::new(Schema::Ref(full_name))
            }
        };

        if descriptor.nullable && !schema.is_nullable_union() {
            Ok(Arc::new(Schema::nullable(schema)))
        } else {
            Ok(schema)
        }
    }

    /// Returns `Some(Ref)` when `naming` was already defined by an equivalent
    /// descriptor (or is being defined), and registers the serial name.
    fn intern(
        &mut self,
        naming: &RecordNaming,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<Arc<Schema>>, SchemaBuildError> {
        let full_name = naming.full_name();
        let serial = descriptor.base_serial_name();

        if let Some((defined_serial, defined_kind)) = self.defined.get(full_name) {
            if defined_serial != serial || *defined_kind != descriptor.kind {
                return Err(SchemaBuildError::DuplicateName {
                    full_name: full_name.to_string(),
                });
            }
            return Ok(Some(Arc::new(Schema::Ref(full_name.to_string()))));
        }
        if self.in_progress.contains(full_name) {
            log::trace!("[schema] recursive reference to {}", full_name);
            return Ok(Some(Arc::new(Schema::Ref(full_name.to_string()))));
        }

        if !serial.is_empty() {
            self.serial_names
                .insert(serial.to_string(), full_name.to_string());
        }
        Ok(None)
    }

    fn finish(&mut self, naming: &RecordNaming, descriptor: &TypeDescriptor) {
        self.in_progress.remove(naming.full_name());
        self.defined.insert(
            naming.full_name().to_string(),
            (
                descriptor.base_serial_name().to_string(),
                descriptor.kind.clone(),
            ),
        );
        log::debug!("[schema] defined {}", naming.full_name());
    }

    fn build_record(&mut self, descriptor: &TypeDescriptor) -> Result<Arc<Schema>, SchemaBuildError> {
        let naming = self.naming_for(descriptor);
        if let Some(reference) = self.intern(&naming, descriptor)? {
            return Ok(reference);
        }
        self.in_progress.insert(naming.full_name().to_string());

        let fields = descriptor.fields().unwrap_or_default();
        let mut record_fields = Vec::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            let field_naming = RecordNaming::for_field(descriptor, index, self.strategy)
                .unwrap_or_else(|| RecordNaming::new(&field.name, &[], self.strategy));
            let position = FieldPosition {
                naming: field_naming.clone(),
                enclosing_namespace: naming.namespace(),
            };
            let schema = self.build_type(&field.type_desc, Some(position))?;

            let extractor = AnnotationExtractor::new(&field.annotations);
            let default = match &field.default {
                Some(value) => Some(value.clone()),
                None if self.implicit_nulls && starts_with_null(&schema) => {
                    Some(serde_json::Value::Null)
                }
                None => None,
            };
            record_fields.push(RecordField {
                name: field_naming.name().to_string(),
                schema,
                doc: extractor.doc().map(str::to_string),
                aliases: extractor.aliases().into_iter().map(str::to_string).collect(),
                default,
            });
        }

        let extractor = AnnotationExtractor::new(&descriptor.annotations);
        let record = RecordSchema {
            naming: naming.clone(),
            doc: extractor.doc().map(str::to_string),
            aliases: extractor.aliases().into_iter().map(str::to_string).collect(),
            fields: record_fields,
        };
        self.finish(&naming, descriptor);
        Ok(Arc::new(Schema::Record(record)))
    }

    fn build_enum(
        &mut self,
        descriptor: &TypeDescriptor,
        symbols: &[String],
    ) -> Result<Arc<Schema>, SchemaBuildError> {
        let naming = self.naming_for(descriptor);
        if symbols.is_empty() {
            return Err(SchemaBuildError::EmptyEnum {
                full_name: naming.full_name().to_string(),
            });
        }
        if let Some(reference) = self.intern(&naming, descriptor)? {
            return Ok(reference);
        }

        let extractor = AnnotationExtractor::new(&descriptor.annotations);
        let schema = EnumSchema {
            naming: naming.clone(),
            doc: extractor.doc().map(str::to_string),
            aliases: extractor.aliases().into_iter().map(str::to_string).collect(),
            symbols: symbols.to_vec(),
        };
        self.finish(&naming, descriptor);
        Ok(Arc::new(Schema::Enum(schema)))
    }

    fn build_fixed(
        &mut self,
        descriptor: &TypeDescriptor,
        size: usize,
        position: Option<FieldPosition<'_>>,
    ) -> Result<Arc<Schema>, SchemaBuildError> {
        let naming = if descriptor.base_serial_name().is_empty() {
            match position {
                Some(position) => position.naming.or_namespace(position.enclosing_namespace),
                None => RecordNaming::from_parts(format!("fixed{}", size), None),
            }
        } else {
            self.naming_for(descriptor)
        };
        if size == 0 {
            return Err(SchemaBuildError::InvalidFixedSize {
                full_name: naming.full_name().to_string(),
            });
        }
        if let Some(reference) = self.intern(&naming, descriptor)? {
            return Ok(reference);
        }

        let extractor = AnnotationExtractor::new(&descriptor.annotations);
        let schema = FixedSchema {
            naming: naming.clone(),
            aliases: extractor.aliases().into_iter().map(str::to_string).collect(),
            size,
        };
        self.finish(&naming, descriptor);
        Ok(Arc::new(Schema::Fixed(schema)))
    }
}

/// Default primitive mapping.
pub(crate) fn primitive_schema(kind: PrimitiveKind) -> Schema {
    match kind {
        PrimitiveKind::Boolean => Schema::Boolean,
        PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int | PrimitiveKind::Char => {
            Schema::Int
        }
        PrimitiveKind::Long => Schema::Long,
        PrimitiveKind::Float => Schema::Float,
        PrimitiveKind::Double => Schema::Double,
        PrimitiveKind::String => Schema::String,
        PrimitiveKind::Bytes => Schema::Bytes,
    }
}

fn starts_with_null(schema: &Schema) -> bool {
    match schema {
        Schema::Union(u) => u.variants().first().is_some_and(|v| v.is_null()),
        _ => false,
    }
}
