// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collaborator registration.
//!
//! Converter collections implement [`ConverterLoader`] and are handed to
//! [`Registry::load`](crate::Registry::load). A static list of loaders is the
//! discovery mechanism: there is no runtime scanning.

use crate::registry::Registry;

/// Registers a related group of handlers and factories.
pub trait ConverterLoader: Send + Sync {
    fn name(&self) -> &str;

    /// Register everything this loader provides. Called once per registry.
    fn load(&self, registry: &Registry);
}
