// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Annotations attached to type descriptors and fields.
//!
//! Annotations are an ordered, explicit list carried next to each structural
//! description. Lookups are first-declared-wins; duplicates of a single-valued
//! kind are reported through `log::warn!` but never rejected.

/// A single annotation on a type or a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// Explicit record/field name, replacing the derived simple name.
    Name(String),
    /// Explicit namespace, replacing the derived namespace.
    Namespace(String),
    /// Do not append type parameters to the record name.
    ErasedName,
    /// Documentation copied into the generated schema.
    Doc(String),
    /// Alternative name for the record or field. May be repeated.
    Alias(String),
    /// Application-defined tag, ignored by naming and schema generation.
    Custom { key: String, value: String },
}

/// Pure lookup over a declared annotation list.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationExtractor<'a> {
    annotations: &'a [Annotation],
}

impl<'a> AnnotationExtractor<'a> {
    pub fn new(annotations: &'a [Annotation]) -> Self {
        Self { annotations }
    }

    /// Explicit name override, if any.
    pub fn name(&self) -> Option<&'a str> {
        self.first("name", |a| match a {
            Annotation::Name(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Explicit namespace override, if any.
    pub fn namespace(&self) -> Option<&'a str> {
        self.first("namespace", |a| match a {
            Annotation::Namespace(ns) => Some(ns.as_str()),
            _ => None,
        })
    }

    /// Whether type parameters must be left out of the record name.
    pub fn erase_generics(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::ErasedName))
    }

    pub fn doc(&self) -> Option<&'a str> {
        self.first("doc", |a| match a {
            Annotation::Doc(doc) => Some(doc.as_str()),
            _ => None,
        })
    }

    /// All aliases, in declaration order.
    pub fn aliases(&self) -> Vec<&'a str> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Alias(alias) => Some(alias.as_str()),
                _ => None,
            })
            .collect()
    }

    fn first<F>(&self, kind: &str, select: F) -> Option<&'a str>
    where
        F: Fn(&'a Annotation) -> Option<&'a str>,
    {
        let mut matches = self.annotations.iter().filter_map(select);
        let first = matches.next()?;
        let ignored = matches.count();
        if ignored > 0 {
            log::warn!(
                "[naming] {} conflicting {} annotations, using first ({:?})",
                ignored + 1,
                kind,
                first
            );
        }
        Some(first)
    }
}
