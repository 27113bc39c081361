use alloc::string::{String, ToString};
use core::fmt::Display;

use mw_value::PathError;
use mw_value::registry::ResolveError;
use thiserror::Error;

// -----------------------------------------------------------------------------
// ErrorKind

/// The three families of [`SerializeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A path could not be resolved to an importable object.
    Resolution,
    /// A callable was defined where an import cannot reach it.
    Scope,
    /// No rule can render the value.
    Unsupported,
}

// -----------------------------------------------------------------------------
// SerializeError

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerializeError {
    #[error("No module named '{module}'")]
    ModuleNotFound { module: String },

    #[error("Could not find object {name} in {module}.")]
    ObjectNotFound { module: String, name: String },

    #[error("Cannot serialize object with path `{path}`: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: PathError,
    },

    #[error("Cannot serialize function: lambda (defined in {module})")]
    Lambda { module: String },

    #[error("Cannot serialize function {name}: No module")]
    NoModule { name: String },

    #[error(
        "Could not find function {name} in {module}.\n\
         It is defined in the local scope `{scope}`, which a migration file cannot import. \
         Move the function into the main module body to use it in migrations."
    )]
    LocalScope {
        name: String,
        module: String,
        scope: String,
    },

    #[error(
        "Cannot serialize: {repr}\n\
         There are some values that cannot be serialized into migration files (type `{type_name}`)."
    )]
    Unsupported { type_name: String, repr: String },

    #[error("Cannot serialize `{value}`: sub-microsecond precision cannot be written to a migration file")]
    SubMicrosecond { value: String },

    #[error("{0}")]
    Custom(String),
}

impl SerializeError {
    /// An error raised by a [`SerializeProcessor`](crate::SerializeProcessor).
    #[inline]
    pub fn custom(msg: impl Display) -> Self {
        Self::Custom(msg.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ModuleNotFound { .. } | Self::ObjectNotFound { .. } | Self::InvalidPath { .. } => {
                ErrorKind::Resolution
            }
            Self::Lambda { .. } | Self::NoModule { .. } | Self::LocalScope { .. } => {
                ErrorKind::Scope
            }
            Self::Unsupported { .. } | Self::SubMicrosecond { .. } | Self::Custom(_) => {
                ErrorKind::Unsupported
            }
        }
    }
}

impl From<ResolveError> for SerializeError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::ModuleNotFound { module } => Self::ModuleNotFound { module },
            ResolveError::ObjectNotFound { module, name } => Self::ObjectNotFound { module, name },
            other => Self::custom(other),
        }
    }
}
