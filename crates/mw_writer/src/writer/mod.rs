//! Write whole migration modules.
//!
//! ## Menu
//!
//! - [`Migration`]: name, app, [`Dependency`]s, [`Operation`]s and the
//!   migrations it replaces.
//! - [`OperationCall`]: an [`Operation`] described by its constructor call.
//! - [`OperationWriter`]: one operation as an indented multi-line call.
//! - [`MigrationWriter`]: the text of the migration file and where it goes.

mod migration;
mod migration_writer;
mod operation_writer;

pub use migration::{Dependency, Migration, Operation, OperationCall};
pub use migration_writer::MigrationWriter;
pub use operation_writer::OperationWriter;
