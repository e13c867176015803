// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type model: descriptors, identity handles and the global type table.

pub mod builtin;
mod descriptor;
mod table;


pub use descriptor::{PrimitiveKind, Type, TypeDescriptor, TypeKind};
pub use table::{TypeBuilder, TypeTable};
