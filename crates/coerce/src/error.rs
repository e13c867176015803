// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for resolution, conversion and type definition.
//!
//! Two failure classes are kept strictly apart:
//!
//! - [`Error::NoHandlerFound`]: no handler exists for a `(source, target)` pair.
//!   This is a structural outcome and is cached by the registry.
//! - [`Error::ConversionFailed`]: a handler was found but rejected the value.
//!   This depends on the value and is never cached.

use std::fmt;
use std::net::AddrParseError;
use std::num::{ParseFloatError, ParseIntError, TryFromIntError};

use crate::types::Type;

/// Category of a handler-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionErrorKind {
    /// Input text or structure could not be parsed.
    Malformed,
    /// Value does not fit in the target representation.
    OutOfRange,
    /// Payload carried by the value is not what the handler expects.
    UnexpectedPayload,
    /// Handler cannot convert this particular value.
    Unsupported,
    /// Underlying I/O failed while converting.
    Io,
}

impl ConversionErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConversionErrorKind::Malformed => "malformed input",
            ConversionErrorKind::OutOfRange => "out of range",
            ConversionErrorKind::UnexpectedPayload => "unexpected payload",
            ConversionErrorKind::Unsupported => "unsupported value",
            ConversionErrorKind::Io => "i/o failure",
        }
    }
}

impl fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a handler's `apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    kind: ConversionErrorKind,
    message: String,
}

impl ConversionError {
    pub fn new(kind: ConversionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::Malformed, message)
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::OutOfRange, message)
    }

    pub fn unexpected_payload(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::UnexpectedPayload, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::Unsupported, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::Io, message)
    }

    #[must_use]
    #[inline]
    pub fn kind(&self) -> ConversionErrorKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefix the message with extra context (e.g. the element index in a collection).
    #[must_use]
    pub fn with_context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ConversionError {}

impl From<ParseIntError> for ConversionError {
    fn from(e: ParseIntError) -> Self {
        use std::num::IntErrorKind;
        match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                ConversionError::out_of_range(e.to_string())
            }
            _ => ConversionError::malformed(e.to_string()),
        }
    }
}

impl From<ParseFloatError> for ConversionError {
    fn from(e: ParseFloatError) -> Self {
        ConversionError::malformed(e.to_string())
    }
}

impl From<AddrParseError> for ConversionError {
    fn from(e: AddrParseError) -> Self {
        ConversionError::malformed(e.to_string())
    }
}

impl From<TryFromIntError> for ConversionError {
    fn from(e: TryFromIntError) -> Self {
        ConversionError::out_of_range(e.to_string())
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(e: std::io::Error) -> Self {
        ConversionError::io(e.to_string())
    }
}

/// Failure while defining or interning a runtime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Type names must be non-empty.
    EmptyName,
    /// A type with this name already exists with a different shape.
    Conflict { name: String },
    /// A declared supertype has the wrong kind (e.g. a class used as an interface).
    InvalidSupertype {
        name: String,
        supertype: String,
        reason: &'static str,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::EmptyName => write!(f, "type name must not be empty"),
            TypeError::Conflict { name } => {
                write!(f, "type '{}' is already defined with a different shape", name)
            }
            TypeError::InvalidSupertype {
                name,
                supertype,
                reason,
            } => write!(
                f,
                "type '{}' cannot use '{}' as supertype: {}",
                name, supertype, reason
            ),
        }
    }
}

impl std::error::Error for TypeError {}

/// Public error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Dispatch Errors
    // ========================================================================
    /// No handler (registered or synthesised) exists for this pair.
    NoHandlerFound { source_type: Type, target_type: Type },
    /// A handler was selected but failed on the given value.
    ConversionFailed {
        source_type: Type,
        target_type: Type,
        cause: ConversionError,
    },

    // ========================================================================
    // Type Table Errors
    // ========================================================================
    /// Defining a runtime type failed.
    Type(TypeError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Registry configuration could not be read or parsed.
    Config(String),
}

impl Error {
    #[must_use]
    pub fn is_no_handler(&self) -> bool {
        matches!(self, Error::NoHandlerFound { .. })
    }

    #[must_use]
    pub fn is_conversion_failed(&self) -> bool {
        matches!(self, Error::ConversionFailed { .. })
    }

    /// Handler-level cause, when this is a conversion failure.
    #[must_use]
    pub fn cause(&self) -> Option<&ConversionError> {
        match self {
            Error::ConversionFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoHandlerFound {
                source_type,
                target_type,
            } => write!(
                f,
                "No handler found for {} -> {}",
                source_type, target_type
            ),
            Error::ConversionFailed {
                source_type,
                target_type,
                cause,
            } => write!(
                f,
                "Conversion {} -> {} failed: {}",
                source_type, target_type, cause
            ),
            Error::Type(e) => write!(f, "Type error: {}", e),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConversionFailed { cause, .. } => Some(cause),
            Error::Type(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TypeError> for Error {
    fn from(e: TypeError) -> Self {
        Error::Type(e)
    }
}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
