use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;

use super::EvalError;
use crate::ImportSet;

/// Builtins usable without an import.
const BUILTINS: &[&str] = &[
    "bool", "bytes", "dict", "float", "frozenset", "int", "list", "object", "set", "str", "tuple",
    "type",
];

/// Names bound by import statements, each mapped to the dotted path it refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Bindings {
    names: BTreeMap<String, String>,
}

impl Bindings {
    pub fn from_imports(imports: &ImportSet) -> Result<Self, EvalError> {
        let mut bindings = Self::default();
        for statement in imports {
            bindings.bind_statement(statement)?;
        }
        Ok(bindings)
    }

    /// Adds the names one statement binds.
    ///
    /// - `import a.b` binds `a`, `import a.b as c` binds `c` to `a.b`;
    /// - `from a import b` binds `b` to `a.b`, `from a import b as c` binds `c`.
    pub fn bind_statement(&mut self, statement: &str) -> Result<(), EvalError> {
        let malformed = || EvalError::ImportSyntax {
            line: String::from(statement),
        };
        let words: alloc::vec::Vec<&str> = statement.split_whitespace().collect();

        match words.as_slice() {
            ["import", rest @ ..] if !rest.is_empty() => {
                for item in rest.join(" ").split(',') {
                    match item.split_whitespace().collect::<alloc::vec::Vec<_>>().as_slice() {
                        [module] if is_dotted(module) => {
                            let root = module.split('.').next().unwrap_or(module);
                            self.bind(root, root);
                        }
                        [module, "as", alias] if is_dotted(module) && is_dotted(alias) => {
                            self.bind(alias, module);
                        }
                        _ => return Err(malformed()),
                    }
                }
                Ok(())
            }
            ["from", module, "import", rest @ ..] if is_dotted(module) && !rest.is_empty() => {
                for item in rest.join(" ").split(',') {
                    match item.split_whitespace().collect::<alloc::vec::Vec<_>>().as_slice() {
                        [name] if is_dotted(name) => self.bind(name, &format!("{module}.{name}")),
                        [name, "as", alias] if is_dotted(name) && is_dotted(alias) => {
                            self.bind(alias, &format!("{module}.{name}"));
                        }
                        _ => return Err(malformed()),
                    }
                }
                Ok(())
            }
            _ => Err(malformed()),
        }
    }

    fn bind(&mut self, name: &str, target: &str) {
        self.names.insert(String::from(name), String::from(target));
    }

    /// The dotted path `name` refers to, falling back to builtins.
    pub fn lookup(&self, name: &str) -> Option<String> {
        match self.names.get(name) {
            Some(target) => Some(target.clone()),
            None if BUILTINS.contains(&name) => Some(format!("builtins.{name}")),
            None => None,
        }
    }

    /// Resolves the first segment of `dotted` and keeps the rest.
    pub fn resolve(&self, dotted: &str) -> Result<String, EvalError> {
        let (head, tail) = match dotted.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (dotted, None),
        };
        let target = self.lookup(head).ok_or_else(|| EvalError::Name {
            name: String::from(head),
        })?;
        Ok(match tail {
            Some(tail) => format!("{target}.{tail}"),
            None => target,
        })
    }
}

// Module paths here may have segments starting with digits, like numbered migrations.
fn is_dotted(text: &str) -> bool {
    !text.is_empty()
        && text
            .split('.')
            .all(|segment| !segment.is_empty() && segment.chars().all(|c| c == '_' || c.is_alphanumeric()))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Bindings;
    use crate::ImportSet;
    use crate::eval::EvalError;

    #[test]
    fn import_forms() {
        let imports = ImportSet::from_iter([
            "import datetime",
            "import django.core.validators",
            "from django.db import models, migrations",
            "from django.utils.translation import ugettext_lazy as _",
            "import custom.ops as ops",
        ]);
        let bindings = Bindings::from_imports(&imports).unwrap();

        assert_eq!(bindings.resolve("datetime.datetime").unwrap(), "datetime.datetime");
        assert_eq!(
            bindings.resolve("django.core.validators.RegexValidator").unwrap(),
            "django.core.validators.RegexValidator"
        );
        assert_eq!(bindings.resolve("models.SET_NULL").unwrap(), "django.db.models.SET_NULL");
        assert_eq!(bindings.resolve("migrations.AddField").unwrap(), "django.db.migrations.AddField");
        assert_eq!(bindings.resolve("_").unwrap(), "django.utils.translation.ugettext_lazy");
        assert_eq!(bindings.resolve("ops.Custom").unwrap(), "custom.ops.Custom");
    }

    #[test]
    fn builtins_need_no_import() {
        let bindings = Bindings::default();
        assert_eq!(bindings.resolve("list").unwrap(), "builtins.list");
        assert_eq!(
            bindings.resolve("re.compile"),
            Err(EvalError::Name {
                name: "re".into()
            })
        );
    }

    #[test]
    fn malformed_statements() {
        let mut bindings = Bindings::default();
        assert!(bindings.bind_statement("import").is_err());
        assert!(bindings.bind_statement("from x import").is_err());
        assert!(bindings.bind_statement("from x import *").is_err());
        assert!(bindings.bind_statement("print(1)").is_err());
    }
}
