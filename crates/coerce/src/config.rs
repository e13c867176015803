// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry configuration.
//!
//! With the `config-loaders` feature a configuration can be read from YAML:
//!
//! ```yaml
//! negative_cache: sticky        # or invalidate_on_register (default)
//! identity_factory: true
//! builtin_catalog: true
//! ```

#[cfg(feature = "config-loaders")]
use std::path::Path;

#[cfg(feature = "config-loaders")]
use crate::error::{Error, Result};

/// What happens to cached "no handler" markers when the registry grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(rename_all = "snake_case"))]
pub enum NegativeCachePolicy {
    /// Markers survive registrations until `clear_cache`.
    Sticky,
    /// Registering a handler or factory drops every marker.
    #[default]
    InvalidateOnRegister,
}

/// Construction options for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(default, deny_unknown_fields))]
pub struct RegistryConfig {
    pub negative_cache: NegativeCachePolicy,
    /// Register the identity factory first.
    pub identity_factory: bool,
    /// Load the built-in converter catalog after construction.
    pub builtin_catalog: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            negative_cache: NegativeCachePolicy::default(),
            identity_factory: true,
            builtin_catalog: false,
        }
    }
}

impl RegistryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_negative_cache(mut self, policy: NegativeCachePolicy) -> Self {
        self.negative_cache = policy;
        self
    }

    #[must_use]
    pub fn with_builtin_catalog(mut self, enabled: bool) -> Self {
        self.builtin_catalog = enabled;
        self
    }

    #[must_use]
    pub fn without_identity_factory(mut self) -> Self {
        self.identity_factory = false;
        self
    }

    /// Parse a YAML document. Missing keys keep their defaults.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("invalid YAML: {}", e)))
    }

    /// Read and parse a YAML file.
    #[cfg(feature = "config-loaders")]
    pub fn load_yaml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!("[config] loaded {:?} from {}", config, path.display());
        Ok(config)
    }
}
