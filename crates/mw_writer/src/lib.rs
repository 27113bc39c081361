//! Writes [`Value`](mw_value::Value)s as Python source for migration files.
//!
//! ## Menu
//!
//! - [`ser`]: [`Serializer`] turns a value into a [`Serialized`], the code
//!   text of one expression plus the [`ImportSet`] that code needs.
//! - [`writer`]: renders whole migration modules from operations built on
//!   the same serializer.
//! - [`eval`]: reads serializer output back into a value, for checking that
//!   written code means what was serialized.
//! - [`WriterConfig`]: names imported for UTC, settings and translations,
//!   module aliases and indentation. Loadable with `serde`.
//!
//! # Examples
//!
//! ```
//! # use mw_value::{Deconstructed, Value, registry::ModuleRegistry};
//! let mut registry = ModuleRegistry::new();
//! registry.register("django.db.models.SET").unwrap();
//!
//! let value = Value::list([
//!     Value::from(Deconstructed::new("django.db.models.SET").arg(42)),
//!     Value::Str("x".into()),
//! ]);
//!
//! let output = mw_writer::serialize(&value, &registry).unwrap();
//! assert_eq!(output.code, "[models.SET(42), 'x']");
//! assert_eq!(output.imports.iter().collect::<Vec<_>>(), ["from django.db import models"]);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;
mod imports;

pub mod eval;
pub mod ser;
pub mod writer;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use config::{ImportedName, LazyTextMode, ModuleAlias, WriterConfig};
pub use error::{ErrorKind, SerializeError};
pub use imports::ImportSet;
pub use ser::{SerializeProcessor, Serialized, Serializer, serialize, serialize_datetime};
