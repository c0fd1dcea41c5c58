// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Naming strategies applied to derived simple names.

/// Stateless transform applied to a simple record or field name.
///
/// Strategies are never applied to namespaces.
pub trait NamingStrategy: Send + Sync {
    fn to(&self, name: &str) -> String;
}

/// Identity strategy: names are used exactly as declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultNamingStrategy;

impl NamingStrategy for DefaultNamingStrategy {
    fn to(&self, name: &str) -> String {
        name.to_string()
    }
}

/// `MyType` -> `my_type`, `HTTPServer` -> `http_server`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnakeCaseNamingStrategy;

impl NamingStrategy for SnakeCaseNamingStrategy {
    fn to(&self, name: &str) -> String {
        let chars: Vec<char> = name.chars().collect();
        let mut out = String::with_capacity(name.len() + 4);

        for (i, &c) in chars.iter().enumerate() {
            if c.is_uppercase() {
                let prev = i.checked_sub(1).map(|p| chars[p]);
                let next = chars.get(i + 1).copied();
                let boundary = match prev {
                    None | Some('_') => false,
                    Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                    // End of an acronym: `HTTPServer` splits before `S`.
                    Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                    Some(_) => false,
                };
                if boundary {
                    out.push('_');
                }
                out.extend(c.to_lowercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

/// `my_type` -> `MyType`, `myType` -> `MyType`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PascalCaseNamingStrategy;

impl NamingStrategy for PascalCaseNamingStrategy {
    fn to(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for part in name.split('_').filter(|p| !p.is_empty()) {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        assert_eq!(DefaultNamingStrategy.to("MyType"), "MyType");
        assert_eq!(DefaultNamingStrategy.to(""), "");
    }

    #[test]
    fn test_snake_case() {
        let s = SnakeCaseNamingStrategy;
        assert_eq!(s.to("MyType"), "my_type");
        assert_eq!(s.to("myField"), "my_field");
        assert_eq!(s.to("HTTPServer"), "http_server");
        assert_eq!(s.to("Vector3D"), "vector3_d");
        assert_eq!(s.to("already_snake"), "already_snake");
        assert_eq!(s.to("Snake_Case"), "snake_case");
        assert_eq!(s.to("ID"), "id");
    }

    #[test]
    fn test_pascal_case() {
        let s = PascalCaseNamingStrategy;
        assert_eq!(s.to("my_type"), "MyType");
        assert_eq!(s.to("myType"), "MyType");
        assert_eq!(s.to("__leading"), "Leading");
        assert_eq!(s.to("MyType"), "MyType");
    }
}
