use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Value;

// -----------------------------------------------------------------------------
// Deconstruct

/// The capability of describing a value as a constructor call.
///
/// Implementors return the importable path of their type together with the
/// positional and keyword arguments that rebuild an equal value. Fields,
/// validators and migration operations are the usual implementors.
///
/// # Examples
///
/// ```
/// use mw_value::{Deconstruct, Deconstructed, Value};
///
/// #[derive(Debug)]
/// struct CharField {
///     max_length: i64,
/// }
///
/// impl Deconstruct for CharField {
///     fn deconstruct(&self) -> Deconstructed {
///         Deconstructed::new("django.db.models.CharField")
///             .kwarg("max_length", self.max_length)
///     }
/// }
///
/// let field = CharField { max_length: 255 };
/// let parts = field.deconstruct();
///
/// assert_eq!(parts.path, "django.db.models.CharField");
/// assert_eq!(parts.kwargs["max_length"], Value::Int(255));
/// ```
pub trait Deconstruct: fmt::Debug + Send + Sync {
    fn deconstruct(&self) -> Deconstructed;
}

// -----------------------------------------------------------------------------
// Deconstructed

/// The three parts a [`Deconstruct`] implementor describes itself with.
///
/// Keyword arguments are kept ordered by name, so the rendered call is
/// stable no matter how they were inserted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deconstructed {
    /// Full dotted path of the type, e.g. `django.core.validators.RegexValidator`.
    pub path: String,
    pub args: Vec<Value>,
    pub kwargs: BTreeMap<String, Value>,
}

impl Deconstructed {
    /// Creates an entry with no arguments.
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Appends a positional argument.
    #[inline]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Inserts a keyword argument, replacing a previous one of the same name.
    #[inline]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }
}

impl Deconstruct for Deconstructed {
    #[inline]
    fn deconstruct(&self) -> Deconstructed {
        self.clone()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Deconstruct, Deconstructed};
    use crate::Value;
    use alloc::vec;

    #[test]
    fn kwargs_are_ordered() {
        let parts = Deconstructed::new("django.core.validators.RegexValidator")
            .kwarg("message", "hello")
            .kwarg("code", "invalid");

        let names: vec::Vec<_> = parts.kwargs.keys().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["code", "message"]);
    }

    #[test]
    fn deconstructs_to_itself() {
        let parts = Deconstructed::new("app.Thing").arg(1).arg("x");
        assert_eq!(parts.deconstruct(), parts);
        assert_eq!(parts.args, vec![Value::Int(1), Value::from("x")]);
    }
}
