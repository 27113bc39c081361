use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use mw_value::Value;
use mw_value::registry::ModuleRegistry;

use super::{Dependency, Migration, OperationWriter};
use crate::{ImportSet, SerializeError, SerializeProcessor, Serializer, WriterConfig};

/// Imported by the fixed header of every migration file.
const HEADER_IMPORTS: [&str; 2] = [
    "from django.db import models",
    "from django.db import migrations",
];

/// Renders a [`Migration`] as the source of a migration module.
///
/// The file starts with a fixed header, then the imports the serialized
/// dependencies and operations need, sorted by module. Functions referenced
/// from other numbered migration modules cannot be imported; those imports
/// are dropped, listed in a comment, and
/// [`needs_manual_porting`](Self::needs_manual_porting) is set.
///
/// # Examples
///
/// ```
/// # use mw_value::registry::ModuleRegistry;
/// # use mw_writer::writer::{Dependency, Migration, MigrationWriter, OperationCall};
/// let registry = ModuleRegistry::new();
/// let migration = Migration::new("0002_author", "library")
///     .dependency(Dependency::migration("library", "0001_initial"))
///     .operation(OperationCall::migrations("DeleteModel").kwarg("name", "Author"));
///
/// let mut writer = MigrationWriter::new(&migration, &registry);
/// assert_eq!(writer.filename(), "0002_author.py");
/// assert_eq!(
///     writer.as_string().unwrap(),
///     "# -*- coding: utf-8 -*-
/// from __future__ import unicode_literals
///
/// from django.db import models, migrations
///
///
/// class Migration(migrations.Migration):
///
///     dependencies = [
///         ('library', '0001_initial'),
///     ]
///
///     operations = [
///         migrations.DeleteModel(
///             name='Author',
///         ),
///     ]
/// ",
/// );
/// ```
pub struct MigrationWriter<'a, P: SerializeProcessor = ()> {
    migration: &'a Migration,
    serializer: Serializer<'a, P>,
    needs_manual_porting: bool,
}

impl<'a> MigrationWriter<'a, ()> {
    /// Creates a writer with the default [`WriterConfig`].
    pub fn new(migration: &'a Migration, registry: &'a ModuleRegistry) -> Self {
        Self::with_serializer(migration, Serializer::new(registry))
    }

    pub fn with_config(
        migration: &'a Migration,
        registry: &'a ModuleRegistry,
        config: &'a WriterConfig,
    ) -> Self {
        Self::with_serializer(migration, Serializer::with_config(registry, config))
    }
}

impl<'a, P: SerializeProcessor> MigrationWriter<'a, P> {
    pub fn with_serializer(migration: &'a Migration, serializer: Serializer<'a, P>) -> Self {
        Self {
            migration,
            serializer,
            needs_manual_porting: false,
        }
    }

    /// Returns `true` if the last [`as_string`](Self::as_string) dropped
    /// imports from other migration modules.
    #[inline]
    pub fn needs_manual_porting(&self) -> bool {
        self.needs_manual_porting
    }

    /// Renders the whole migration module.
    pub fn as_string(&mut self) -> Result<String, SerializeError> {
        let config = self.serializer.config();
        let indent = config.indentation(1);
        let item_indent = config.indentation(2);
        let mut imports = ImportSet::new();

        let mut operations = String::new();
        for operation in &self.migration.operations {
            let (code, operation_imports) = OperationWriter::new(operation.as_ref(), &self.serializer)
                .serialize()?
                .into_parts();
            operations.push_str(&code);
            operations.push('\n');
            imports.union(operation_imports);
        }

        let mut dependencies = String::new();
        for dependency in &self.migration.dependencies {
            let code = match dependency {
                Dependency::Swappable(setting) => {
                    imports.insert(config.settings.import.as_str());
                    format!(
                        "migrations.swappable_dependency({}.{setting})",
                        config.settings.name
                    )
                }
                Dependency::Migration(app_label, name) => {
                    let pair = Value::tuple([app_label.as_str(), name.as_str()]);
                    self.serializer.serialize(&pair)?.code
                }
            };
            dependencies.push_str(&format!("{item_indent}{code},\n"));
        }

        // Functions from numbered migration modules have to be copied by hand.
        let migration_modules: Vec<String> = imports
            .iter()
            .filter_map(imported_migration_module)
            .map(String::from)
            .collect();
        for module in &migration_modules {
            imports.remove(&format!("import {module}"));
        }
        self.needs_manual_porting = !migration_modules.is_empty();
        if self.needs_manual_porting {
            log::warn!(
                "migration `{}.{}` references functions from other migrations: {}",
                self.migration.app_label,
                self.migration.name,
                migration_modules.join(", ")
            );
        }

        for statement in HEADER_IMPORTS {
            imports.remove(statement);
        }
        let mut import_lines = String::new();
        for statement in imports.sorted_by_module() {
            import_lines.push_str(statement);
            import_lines.push('\n');
        }
        if !migration_modules.is_empty() {
            import_lines.push_str(
                "\n\n# Functions from the following migrations need manual copying.\n\
                 # Move them and any dependencies into this file, then update the\n\
                 # RunPython operations to refer to the local versions:\n# ",
            );
            import_lines.push_str(&migration_modules.join("\n# "));
        }

        let mut replaces = String::new();
        if !self.migration.replaces.is_empty() {
            let pairs = Value::list(
                self.migration
                    .replaces
                    .iter()
                    .map(|(app_label, name)| Value::tuple([app_label.as_str(), name.as_str()])),
            );
            let code = self.serializer.serialize(&pairs)?.code;
            replaces = format!("\n{indent}replaces = {code}\n");
        }

        Ok(format!(
            "# -*- coding: utf-8 -*-\n\
             from __future__ import unicode_literals\n\
             \n\
             from django.db import models, migrations\n\
             {import_lines}\n\
             \n\
             class Migration(migrations.Migration):\n\
             {replaces}\n\
             {indent}dependencies = [\n\
             {dependencies}\
             {indent}]\n\
             \n\
             {indent}operations = [\n\
             {operations}\
             {indent}]\n"
        ))
    }

    /// `<name>.py`.
    #[inline]
    pub fn filename(&self) -> String {
        format!("{}.py", self.migration.name)
    }

    /// The file inside the `migrations` package of the app at `app_dir`.
    #[cfg(feature = "std")]
    pub fn path(&self, app_dir: impl AsRef<std::path::Path>) -> std::path::PathBuf {
        app_dir.as_ref().join("migrations").join(self.filename())
    }
}

// `import app.migrations.0002_auto` imports from a numbered migration.
fn imported_migration_module(statement: &str) -> Option<&str> {
    let module = statement.strip_prefix("import ")?.trim();
    let numbered = !module.contains(char::is_whitespace)
        && module
            .split('.')
            .skip(1)
            .any(|segment| segment.starts_with(|c: char| c.is_ascii_digit()));
    numbered.then_some(module)
}

// -----------------------------------------------------------------------------
// Tests
