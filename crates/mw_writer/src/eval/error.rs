use alloc::string::String;

use thiserror::Error;

/// Errors from reading serializer output back into a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid syntax at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// The code uses a name that no import binds.
    #[error("name '{name}' is not defined")]
    Name { name: String },

    #[error("unrecognized import statement `{line}`")]
    ImportSyntax { line: String },

    #[error("bad call to `{path}`: {message}")]
    Call { path: String, message: String },

    #[error("setting `{name}` has no value")]
    UnknownSetting { name: String },
}

impl EvalError {
    #[inline]
    pub(super) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    #[inline]
    pub(super) fn call(path: &str, message: impl Into<String>) -> Self {
        Self::Call {
            path: path.into(),
            message: message.into(),
        }
    }
}
