use alloc::string::{String, ToString};
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    #[error("import path is empty")]
    Empty,

    #[error("`{0}` is not a qualified path, expected `module.name`")]
    Unqualified(String),

    #[error("`{path}` contains an invalid segment `{segment}`")]
    InvalidSegment { path: String, segment: String },
}

// -----------------------------------------------------------------------------
// ImportPath

/// A dotted path of an importable object, e.g. `django.core.validators.RegexValidator`.
///
/// The path always has at least two segments: the last one is the object
/// [`name`](Self::name), the rest is its [`module`](Self::module).
///
/// # Examples
///
/// ```
/// # use mw_value::ImportPath;
/// let path = ImportPath::parse("django.core.validators.RegexValidator").unwrap();
///
/// assert_eq!(path.module(), "django.core.validators");
/// assert_eq!(path.name(), "RegexValidator");
/// assert_eq!(path.root(), "django");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImportPath {
    path: String,
    // Byte offset of the last `.`.
    split: usize,
}

impl ImportPath {
    /// Parses a dotted path, validating every segment as an identifier.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let Some(split) = path.rfind('.') else {
            return Err(PathError::Unqualified(path.to_string()));
        };

        for segment in path.split('.') {
            if !is_identifier(segment) {
                return Err(PathError::InvalidSegment {
                    path: path.to_string(),
                    segment: segment.to_string(),
                });
            }
        }

        Ok(Self {
            path: path.to_string(),
            split,
        })
    }

    /// Joins a module path and an object name.
    pub fn join(module: &str, name: &str) -> Result<Self, PathError> {
        let mut path = String::with_capacity(module.len() + name.len() + 1);
        path.push_str(module);
        path.push('.');
        path.push_str(name);
        Self::parse(&path)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// The module part, everything before the last `.`.
    #[inline]
    pub fn module(&self) -> &str {
        &self.path[..self.split]
    }

    /// The object name, the last segment.
    #[inline]
    pub fn name(&self) -> &str {
        &self.path[self.split + 1..]
    }

    /// The top-level package, the first segment.
    #[inline]
    pub fn root(&self) -> &str {
        match self.path.find('.') {
            Some(index) => &self.path[..index],
            None => &self.path,
        }
    }
}

impl fmt::Display for ImportPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Returns `true` if `segment` is a valid Python identifier.
pub(crate) fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

// -----------------------------------------------------------------------------
// Tests
