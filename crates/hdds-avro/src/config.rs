// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Configuration: defaults and YAML/JSON loading.
//!
//! All default values live here; nothing else in the crate hardcodes them.
//!
//! # Example YAML
//!
//! ```yaml
//! # avro.yaml
//! naming_strategy: snake_case
//! implicit_nulls: true
//! cache_capacity: 512
//! ```

use crate::error::ConfigError;
use crate::naming::{
    DefaultNamingStrategy, NamingStrategy, PascalCaseNamingStrategy, SnakeCaseNamingStrategy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Avro type name of the null schema.
pub const NULL_TYPE_NAME: &str = "null";

/// Derived schemas kept by the facade cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Nullable fields get a `null` default unless disabled.
pub const DEFAULT_IMPLICIT_NULLS: bool = true;

/// Deepest value nesting the binary codec follows before giving up.
///
/// Every value on the path from the root counts once, so a recursive chain
/// of `Node { value, next: Node? }` uses two levels per node.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Most items one array or map may declare on the wire. Guards against
/// allocation bombs from zero-width items.
pub const MAX_COLLECTION_ITEMS: usize = 1_000_000;

/// Naming strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategyKind {
    /// Names unchanged.
    #[default]
    Default,
    SnakeCase,
    PascalCase,
}

impl NamingStrategyKind {
    pub fn strategy(self) -> &'static dyn NamingStrategy {
        match self {
            Self::Default => &DefaultNamingStrategy,
            Self::SnakeCase => &SnakeCaseNamingStrategy,
            Self::PascalCase => &PascalCaseNamingStrategy,
        }
    }
}

/// Facade configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvroConfig {
    /// Strategy applied to record and field names.
    pub naming_strategy: NamingStrategyKind,

    /// Give nullable fields a `null` default.
    pub implicit_nulls: bool,

    /// Maximum number of cached schemas (> 0).
    pub cache_capacity: usize,
}

impl Default for AvroConfig {
    fn default() -> Self {
        Self {
            naming_strategy: NamingStrategyKind::default(),
            implicit_nulls: DEFAULT_IMPLICIT_NULLS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl AvroConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: AvroConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AvroConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported config extension: {}",
                    other.unwrap_or("<none>")
                )))
            }
        };
        log::debug!(
            "[config] loaded {} (strategy={:?}, cache_capacity={})",
            path.display(),
            config.naming_strategy,
            config.cache_capacity
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn strategy(&self) -> &'static dyn NamingStrategy {
        self.naming_strategy.strategy()
    }
}
