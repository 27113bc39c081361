use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use mw_value::{ImportPath, Value};

use super::Operation;
use crate::{ImportSet, SerializeError, SerializeProcessor, Serialized, Serializer};

/// Writes one [`Operation`] as an indented, multi-line call.
///
/// Operations of `django.db.migrations` are written as `migrations.Name(`,
/// other classes by their full path with an `import` of their module.
/// Positional arguments come first, then keyword arguments sorted by name.
///
/// # Examples
///
/// ```
/// # use mw_value::{Value, registry::ModuleRegistry};
/// # use mw_writer::Serializer;
/// # use mw_writer::writer::{OperationCall, OperationWriter};
/// let registry = ModuleRegistry::new();
/// let serializer = Serializer::new(&registry);
/// let operation = OperationCall::migrations("AlterUniqueTogether")
///     .kwarg("name", "book")
///     .kwarg("unique_together", Value::set([Value::tuple(["title", "author"])]));
///
/// let output = OperationWriter::new(&operation, &serializer)
///     .with_indentation(0)
///     .serialize()
///     .unwrap();
/// assert_eq!(
///     output.code,
///     "migrations.AlterUniqueTogether(\n    name='book',\n    unique_together={('title', 'author')},\n),",
/// );
/// ```
pub struct OperationWriter<'a, P: SerializeProcessor = ()> {
    operation: &'a dyn Operation,
    serializer: &'a Serializer<'a, P>,
    indentation: usize,
}

impl<'a, P: SerializeProcessor> OperationWriter<'a, P> {
    /// Creates a writer at the indentation of a migration's `operations` list.
    pub fn new(operation: &'a dyn Operation, serializer: &'a Serializer<'a, P>) -> Self {
        Self {
            operation,
            serializer,
            indentation: 2,
        }
    }

    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }

    pub fn serialize(&self) -> Result<Serialized, SerializeError> {
        let parts = self.operation.deconstruct();
        let path = ImportPath::parse(&parts.path).map_err(|source| SerializeError::InvalidPath {
            path: parts.path.clone(),
            source,
        })?;

        let (name, mut imports) = self.serializer.reference(&path).into_parts();
        let mut lines = Lines {
            lines: Vec::new(),
            level: self.indentation,
            serializer: self.serializer,
        };

        lines.feed(format!("{name}("));
        lines.level += 1;
        for arg in &parts.args {
            let arg = self.serializer.serialize(arg)?;
            lines.feed(format!("{},", arg.code));
            imports.union(arg.imports);
        }
        let expand = self.operation.expand_args();
        for (keyword, arg) in &parts.kwargs {
            let arg_imports = if expand.contains(&keyword.as_str()) {
                lines.expanded(keyword, arg)?
            } else {
                let arg = self.serializer.serialize(arg)?;
                lines.feed(format!("{keyword}={},", arg.code));
                arg.imports
            };
            imports.union(arg_imports);
        }
        lines.level -= 1;
        lines.feed(String::from("),"));

        Ok(Serialized {
            code: lines.lines.join("\n"),
            imports,
        })
    }
}

struct Lines<'a, P: SerializeProcessor> {
    lines: Vec<String>,
    level: usize,
    serializer: &'a Serializer<'a, P>,
}

impl<P: SerializeProcessor> Lines<'_, P> {
    fn feed(&mut self, line: String) {
        let indent = self.serializer.config().indentation(self.level);
        self.lines.push(format!("{indent}{line}"));
    }

    // Lists, tuples and dicts one item per line; anything else on one line.
    fn expanded(&mut self, keyword: &str, arg: &Value) -> Result<ImportSet, SerializeError> {
        let mut imports = ImportSet::new();
        match arg {
            Value::List(items) | Value::Tuple(items) => {
                self.feed(format!("{keyword}=["));
                self.level += 1;
                for item in items {
                    let item = self.serializer.serialize(item)?;
                    self.feed(format!("{},", item.code));
                    imports.union(item.imports);
                }
                self.level -= 1;
                self.feed(String::from("],"));
            }
            Value::Dict(entries) => {
                self.feed(format!("{keyword}={{"));
                self.level += 1;
                for (key, value) in entries {
                    let key = self.serializer.serialize(key)?;
                    let value = self.serializer.serialize(value)?;
                    self.feed(format!("{}: {},", key.code, value.code));
                    imports.union(key.imports);
                    imports.union(value.imports);
                }
                self.level -= 1;
                self.feed(String::from("},"));
            }
            other => {
                let other = self.serializer.serialize(other)?;
                self.feed(format!("{keyword}={},", other.code));
                imports.union(other.imports);
            }
        }
        Ok(imports)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use mw_value::registry::ModuleRegistry;
    use mw_value::{Callable, Deconstructed, Value};

    use super::OperationWriter;
    use crate::writer::OperationCall;
    use crate::{Serializer, SerializeError};

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register_module("django.db.models", ["DateTimeField", "Model"]);
        registry
    }

    #[test]
    fn expanded_fields() {
        let registry = registry();
        let serializer = Serializer::new(&registry);
        let field = Deconstructed::new("django.db.models.DateTimeField")
            .kwarg("default", Callable::method("datetime", "datetime", "utcnow"));
        let operation = OperationCall::migrations("CreateModel")
            .arg("MyModel")
            .kwarg("fields", Value::list([Value::tuple([Value::from("created"), Value::from(field)])]))
            .kwarg("options", Value::dict([("verbose_name", "My model")]))
            .kwarg("bases", Value::tuple([Value::from(Callable::new("django.db.models", "Model"))]))
            .expand("fields")
            .expand("options");

        let output = OperationWriter::new(&operation, &serializer).serialize().unwrap();
        assert_eq!(
            output.code,
            "        migrations.CreateModel(\n\
             \x20           'MyModel',\n\
             \x20           bases=(models.Model,),\n\
             \x20           fields=[\n\
             \x20               ('created', models.DateTimeField(default=datetime.datetime.utcnow)),\n\
             \x20           ],\n\
             \x20           options={\n\
             \x20               'verbose_name': 'My model',\n\
             \x20           },\n\
             \x20       ),"
        );
        assert_eq!(
            output.imports.iter().collect::<alloc::vec::Vec<_>>(),
            [
                "from django.db import migrations",
                "from django.db import models",
                "import datetime"
            ]
        );
    }

    #[test]
    fn custom_operations_import_their_module() {
        let registry = ModuleRegistry::new();
        let serializer = Serializer::new(&registry);
        let operation = OperationCall::new("custom_migration_operations.operations.TestOperation");

        let output = OperationWriter::new(&operation, &serializer)
            .with_indentation(1)
            .serialize()
            .unwrap();
        assert_eq!(
            output.code,
            "    custom_migration_operations.operations.TestOperation(\n    ),"
        );
        assert!(output.imports.contains("import custom_migration_operations.operations"));
    }

    #[test]
    fn argument_errors_propagate() {
        let registry = ModuleRegistry::new();
        let serializer = Serializer::new(&registry);
        let operation = OperationCall::migrations("RunPython").arg(Callable::lambda("myapp.migrations"));

        let err = OperationWriter::new(&operation, &serializer).serialize().unwrap_err();
        assert!(matches!(err, SerializeError::Lambda { .. }));
    }
}
