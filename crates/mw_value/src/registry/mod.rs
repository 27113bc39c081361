//! Provide a module registry for resolving import paths.
//!
//! ## Menu
//!
//! - [`ModuleRegistry`]: Known modules and the names each of them exports.
//! - [`ResolveError`]: Why an [`ImportPath`] cannot be imported.
//! - [`ModuleExport`]: A static registration entry, see [`export_module!`].
//!
//! ## auto_register
//!
//! See [`ModuleRegistry::auto_register`] .
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//! If it is not supported, the function returns false without causing any errors.
//!
//! [`ImportPath`]: crate::ImportPath
//! [`export_module!`]: crate::export_module
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod module_registry;

// -----------------------------------------------------------------------------
// Exports

pub use auto_register::ModuleExport;
pub use module_registry::{ModuleRegistry, ResolveError};
