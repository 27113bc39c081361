//! Write Django migration files from Rust.
//!
//! - [`value`]: the values a migration can contain, import paths and the
//!   module registry used to resolve them.
//! - [`writer`]: the serializer turning values into Python source with the
//!   imports it needs, the evaluator reading that source back, and the
//!   migration file writer.
//!
//! ```
//! use mw_core::value::{Value, registry::ModuleRegistry};
//!
//! let registry = ModuleRegistry::new();
//! let output = mw_core::writer::serialize(&Value::set([3, 1, 2]), &registry).unwrap();
//! assert_eq!(output.code, "{1, 2, 3}");
//! assert!(output.imports.is_empty());
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use mw_value as value;
pub use mw_writer as writer;
