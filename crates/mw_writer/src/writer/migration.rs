use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use mw_value::{Deconstruct, Deconstructed, Value};

// -----------------------------------------------------------------------------
// Operation

/// A migration operation: a [`Deconstruct`] type written as one call in the
/// `operations` list.
///
/// Keyword arguments named by [`expand_args`](Self::expand_args) holding a
/// list, tuple or dict are written one item per line.
pub trait Operation: Deconstruct {
    fn expand_args(&self) -> &[&str] {
        &[]
    }
}

/// An operation described directly by its constructor call.
///
/// # Examples
///
/// ```
/// # use mw_value::{Deconstruct, Value};
/// # use mw_writer::writer::{Operation, OperationCall};
/// let create = OperationCall::migrations("CreateModel")
///     .kwarg("name", "Author")
///     .kwarg("fields", Value::list(Vec::<Value>::new()))
///     .expand("fields");
///
/// assert_eq!(create.deconstruct().path, "django.db.migrations.CreateModel");
/// assert_eq!(create.expand_args(), ["fields"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OperationCall {
    parts: Deconstructed,
    expand_args: Vec<&'static str>,
}

impl OperationCall {
    /// An operation of any importable class.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            parts: Deconstructed::new(path),
            expand_args: Vec::new(),
        }
    }

    /// An operation class of `django.db.migrations`.
    pub fn migrations(name: &str) -> Self {
        Self::new(alloc::format!("django.db.migrations.{name}"))
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.parts = self.parts.arg(value);
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parts = self.parts.kwarg(name, value);
        self
    }

    /// Writes the keyword argument `name` one item per line.
    pub fn expand(mut self, name: &'static str) -> Self {
        if !self.expand_args.contains(&name) {
            self.expand_args.push(name);
        }
        self
    }
}

impl Deconstruct for OperationCall {
    fn deconstruct(&self) -> Deconstructed {
        self.parts.clone()
    }
}

impl Operation for OperationCall {
    fn expand_args(&self) -> &[&str] {
        &self.expand_args
    }
}

// -----------------------------------------------------------------------------
// Dependency

/// Something a migration must run after.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// `(app_label, migration_name)`.
    Migration(String, String),
    /// The app a swappable model setting points to, e.g. `AUTH_USER_MODEL`.
    Swappable(String),
}

impl Dependency {
    #[inline]
    pub fn migration(app_label: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Migration(app_label.into(), name.into())
    }

    #[inline]
    pub fn swappable(setting: impl Into<String>) -> Self {
        Self::Swappable(setting.into())
    }
}

// -----------------------------------------------------------------------------
// Migration

/// The contents of one migration file.
///
/// # Examples
///
/// ```
/// # use mw_writer::writer::{Dependency, Migration, OperationCall};
/// let migration = Migration::new("0002_author", "library")
///     .dependency(Dependency::migration("library", "0001_initial"))
///     .operation(OperationCall::migrations("DeleteModel").arg("Author"));
///
/// assert_eq!(migration.operations.len(), 1);
/// ```
#[derive(Debug)]
pub struct Migration {
    pub name: String,
    pub app_label: String,
    pub dependencies: Vec<Dependency>,
    pub operations: Vec<Box<dyn Operation>>,
    /// Squashed migrations this one stands in for, as `(app_label, name)`.
    pub replaces: Vec<(String, String)>,
}

impl Migration {
    pub fn new(name: impl Into<String>, app_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            app_label: app_label.into(),
            dependencies: Vec::new(),
            operations: Vec::new(),
            replaces: Vec::new(),
        }
    }

    pub fn dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn operation(mut self, operation: impl Operation + 'static) -> Self {
        self.operations.push(Box::new(operation));
        self
    }

    pub fn replaces(mut self, app_label: impl Into<String>, name: impl Into<String>) -> Self {
        self.replaces.push((app_label.into(), name.into()));
        self
    }
}
