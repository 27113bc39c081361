//! Value model for the migration serializer.
//!
//! ## Menu
//!
//! - [`Value`]: A closed enum of everything the serializer can be handed,
//!   including [`Value::Opaque`] for values of types with no rule.
//! - [`ValueKind`]: The kind of a [`Value`], used in logs and errors.
//! - [`Deconstruct`]: The capability of describing oneself as an importable
//!   path plus constructor arguments, see [`Deconstructed`].
//! - [`Callable`], [`Constant`], [`SettingsReference`]: symbolic references.
//! - [`Pattern`] and [`RegexFlags`]: compiled regular expressions.
//! - [`LazyText`], [`Decimal`]: text-like scalars.
//! - [`ImportPath`]: A dotted path split into module and name.
//! - [`registry::ModuleRegistry`]: Known modules and the names they export,
//!   used to check that a deconstruct path can be imported again.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod callable;
mod decimal;
mod deconstruct;
mod lazy;
mod path;
mod pattern;
mod reference;
mod value;

pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use callable::Callable;
pub use decimal::{Decimal, DecimalError};
pub use deconstruct::{Deconstruct, Deconstructed};
pub use lazy::LazyText;
pub use path::{ImportPath, PathError};
pub use pattern::{Pattern, RegexFlags};
pub use reference::{Constant, SettingsReference};
pub use value::{Opaque, Value, ValueKind};

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}
