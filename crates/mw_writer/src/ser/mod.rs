//! Serialize values into Python source text plus the imports it needs.
//!
//! ## Overview
//!
//! - [`Serializer`]: The standard serializer, dispatching on the [`Value`] variant.
//!     - First attempts to use the [`SerializeProcessor`]; if it takes the value, returns its result immediately.
//!     - Then applies the built-in rule for the variant, recursing into containers and arguments.
//!     - [`Value::Opaque`] has no rule and always fails.
//! - [`SerializeProcessor`]: A hook that lets callers render some values their own way.
//! - [`Serialized`]: The output, code text plus an [`ImportSet`].
//! - [`serialize_datetime`]: The datetime rule on its own.
//!
//! [`Value`]: mw_value::Value
//! [`Value::Opaque`]: mw_value::Value::Opaque

use alloc::string::String;

use crate::ImportSet;

// -----------------------------------------------------------------------------
// Modules

mod driver;
mod literal;
mod processor;

mod callable_serializer;
mod datetime;
mod list_serializer;
mod map_serializer;
mod object_serializer;
mod pattern_serializer;
mod set_serializer;
mod tuple_serializer;

// -----------------------------------------------------------------------------
// Exports

pub use datetime::serialize_datetime;
pub use driver::{Serializer, serialize};
pub use processor::SerializeProcessor;

// -----------------------------------------------------------------------------
// Serialized

/// Source text of a Python expression and the imports it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Serialized {
    pub code: String,
    pub imports: ImportSet,
}

impl Serialized {
    /// Code that needs no import.
    #[inline]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            imports: ImportSet::new(),
        }
    }

    #[inline]
    pub fn with_import(mut self, statement: impl Into<String>) -> Self {
        self.imports.insert(statement);
        self
    }

    #[inline]
    pub fn into_parts(self) -> (String, ImportSet) {
        (self.code, self.imports)
    }
}
