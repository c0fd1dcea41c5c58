// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record naming: schema identity derived from type paths.
//!
//! A [`RecordNaming`] is the `(name, namespace)` pair assigned to a named
//! schema (record, enum, fixed). Its [`full_name`](RecordNaming::full_name) is
//! the schema-cache key and the target of named back-references, so it must
//! be reproducible for a given `(type path, annotations, strategy)` triple.
//!
//! # Resolution
//!
//! ```text
//! "com.acme.Outer.Inner.<init>"   raw type path
//!        | strip .<init> / .<anonymous> markers
//!        v
//! "com.acme.Outer.Inner"
//!        | split on last '.'
//!        v
//! namespace "com.acme.Outer"   name "Inner"
//!        | Namespace(..) / Name(..) annotations override, first wins
//!        | NamingStrategy applied to the name only
//!        v
//! RecordNaming { name, namespace }   full_name "com.acme.Outer.Inner"
//! ```

mod strategy;

pub use strategy::{
    DefaultNamingStrategy, NamingStrategy, PascalCaseNamingStrategy, SnakeCaseNamingStrategy,
};

use crate::annotations::{Annotation, AnnotationExtractor};
use crate::descriptor::TypeDescriptor;
use std::fmt;

/// Synthetic constructor segment that must not leak into schema identity.
const CONSTRUCTOR_MARKER: &str = ".<init>";
/// Synthetic anonymous-type segment that must not leak into schema identity.
const ANONYMOUS_MARKER: &str = ".<anonymous>";
/// Delimiter between base name and type parameters in generic record names.
const TYPE_PARAMS_DELIMITER: &str = "__";

/// Schema identity of a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordNaming {
    name: String,
    namespace: Option<String>,
    full_name: String,
}

impl RecordNaming {
    /// Resolve a raw dot-delimited type path.
    pub fn new(type_path: &str, annotations: &[Annotation], strategy: &dyn NamingStrategy) -> Self {
        let class_name = type_path
            .replace(CONSTRUCTOR_MARKER, "")
            .replace(ANONYMOUS_MARKER, "");
        let (derived_namespace, derived_name) = match class_name.rsplit_once('.') {
            Some((namespace, name)) => (namespace, name),
            None => ("", class_name.as_str()),
        };

        let extractor = AnnotationExtractor::new(annotations);
        let namespace = extractor.namespace().unwrap_or(derived_namespace);
        let name = extractor.name().unwrap_or(derived_name);

        Self::from_parts(strategy.to(name), Some(namespace.to_string()))
    }

    /// Resolve a raw type path with the identity strategy.
    pub fn from_path(type_path: &str, annotations: &[Annotation]) -> Self {
        Self::new(type_path, annotations, &DefaultNamingStrategy)
    }

    /// Resolve a type from its own serial name and annotations.
    pub fn from_descriptor(descriptor: &TypeDescriptor, strategy: &dyn NamingStrategy) -> Self {
        Self::new(
            descriptor.base_serial_name(),
            &descriptor.annotations,
            strategy,
        )
    }

    /// [`from_descriptor`](Self::from_descriptor) with the identity strategy.
    pub fn from_descriptor_default(descriptor: &TypeDescriptor) -> Self {
        Self::from_descriptor(descriptor, &DefaultNamingStrategy)
    }

    /// Resolve the field position `index` of a record descriptor.
    ///
    /// Uses the field's local name and the field's own annotations, not those
    /// of the field's value type. Returns `None` when `descriptor` has no such
    /// element.
    pub fn for_field(
        descriptor: &TypeDescriptor,
        index: usize,
        strategy: &dyn NamingStrategy,
    ) -> Option<Self> {
        let name = descriptor.element_name(index)?;
        let annotations = descriptor.element_annotations(index)?;
        Some(Self::new(name, annotations, strategy))
    }

    /// Build directly from already-resolved parts. An empty namespace is
    /// treated as absent.
    pub fn from_parts(name: impl Into<String>, namespace: Option<String>) -> Self {
        let name = name.into();
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let full_name = match &namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.clone(),
        };
        Self {
            name,
            namespace,
            full_name,
        }
    }

    /// Generic record name: `name__a_b` for type parameters `a`, `b`.
    ///
    /// Parameter names go through `strategy`. With `erase` set (the
    /// `ErasedName` annotation) or without parameters the naming is returned
    /// unchanged.
    pub fn with_type_parameters<S: AsRef<str>>(
        &self,
        params: &[S],
        erase: bool,
        strategy: &dyn NamingStrategy,
    ) -> Self {
        if erase || params.is_empty() {
            return self.clone();
        }
        let suffix = params
            .iter()
            .map(|p| strategy.to(p.as_ref()))
            .collect::<Vec<_>>()
            .join("_");
        Self::from_parts(
            format!("{}{}{}", self.name, TYPE_PARAMS_DELIMITER, suffix),
            self.namespace.clone(),
        )
    }

    /// Same naming moved into `namespace` when it has none of its own.
    pub fn or_namespace(self, namespace: Option<&str>) -> Self {
        if self.namespace.is_some() {
            return self;
        }
        Self::from_parts(self.name, namespace.map(str::to_string))
    }

    /// Simple, post-strategy name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// `namespace.name`, or `name` alone without a namespace.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl fmt::Display for RecordNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}
