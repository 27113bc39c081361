use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};

use thiserror::Error;

use crate::{ImportPath, PathError};

// -----------------------------------------------------------------------------
// Error

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("No module named '{module}'")]
    ModuleNotFound { module: String },

    #[error("Could not find object {name} in {module}.")]
    ObjectNotFound { module: String, name: String },
}

// -----------------------------------------------------------------------------
// ModuleRegistry

/// A registry of importable modules.
///
/// Rust cannot import a Python module to look inside it, so the serializer
/// is told up front what each module exports. A deconstruct path is only
/// rendered if [`resolve`](Self::resolve) finds it here.
///
/// Registering a module also registers its parent packages, each exporting
/// the next segment, just as importing `a.b.c` makes `a.b` an attribute of `a`.
///
/// # Example
///
/// ```
/// use mw_value::ImportPath;
/// use mw_value::registry::{ModuleRegistry, ResolveError};
///
/// let mut registry = ModuleRegistry::new();
/// registry.register_module("django.core.validators", ["RegexValidator", "EmailValidator"]);
///
/// let path = ImportPath::parse("django.core.validators.EmailValidator").unwrap();
/// assert!(registry.resolve(&path).is_ok());
///
/// let path = ImportPath::parse("django.core.validators.EmailValidator2").unwrap();
/// assert_eq!(
///     registry.resolve(&path).unwrap_err().to_string(),
///     "Could not find object EmailValidator2 in django.core.validators.",
/// );
///
/// let path = ImportPath::parse("custom.EmailValidator").unwrap();
/// assert!(matches!(registry.resolve(&path), Err(ResolveError::ModuleNotFound { .. })));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl ModuleRegistry {
    /// Create a empty [`ModuleRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            modules: BTreeMap::new(),
        }
    }

    /// Create a registry with the standard library modules the serializer itself imports.
    ///
    /// - `builtins`
    /// - `datetime`: `date` `time` `datetime` `timedelta` `timezone`
    /// - `re`: `compile`
    /// - `decimal`: `Decimal`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_module(
            "builtins",
            [
                "bool", "bytes", "dict", "float", "frozenset", "int", "list", "object", "set",
                "str", "tuple", "type",
            ],
        );
        registry.register_module("datetime", ["date", "time", "datetime", "timedelta", "timezone"]);
        registry.register_module("re", ["compile"]);
        registry.register_module("decimal", ["Decimal"]);
        registry
    }

    /// Registers `names` as exports of `module`, adding to earlier registrations.
    ///
    /// Returns `true` if the module was not known before.
    pub fn register_module<T: Into<String>>(
        &mut self,
        module: &str,
        names: impl IntoIterator<Item = T>,
    ) -> bool {
        let is_new = self.insert_module(module);
        if let Some(exports) = self.modules.get_mut(module) {
            exports.extend(names.into_iter().map(Into::into));
        }
        if is_new {
            log::debug!("registered module `{module}`");
        }
        is_new
    }

    /// Registers the object at a dotted `path` as an export of its module.
    pub fn register(&mut self, path: &str) -> Result<(), PathError> {
        let path = ImportPath::parse(path)?;
        self.register_module(path.module(), [path.name()]);
        Ok(())
    }

    // Inserts `module` and every parent package, returning `true` if `module` is new.
    fn insert_module(&mut self, module: &str) -> bool {
        let is_new = !self.modules.contains_key(module);
        let mut end = 0;
        loop {
            let next = module[end..].find('.').map(|index| end + index);
            let package = &module[..next.unwrap_or(module.len())];
            let exports = self.modules.entry(package.to_string()).or_default();
            match next {
                Some(index) => {
                    let child = match module[index + 1..].find('.') {
                        Some(len) => &module[index + 1..index + 1 + len],
                        None => &module[index + 1..],
                    };
                    exports.insert(child.to_string());
                    end = index + 1;
                }
                None => break,
            }
        }
        is_new
    }

    #[inline]
    pub fn contains_module(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Returns `true` if `module` is known and exports `name`.
    #[inline]
    pub fn exports(&self, module: &str, name: &str) -> bool {
        self.modules
            .get(module)
            .is_some_and(|exports| exports.contains(name))
    }

    /// Checks that `path` can be imported.
    ///
    /// The first unknown package on the way to the module is reported, as
    /// an import statement would.
    pub fn resolve(&self, path: &ImportPath) -> Result<(), ResolveError> {
        let module = path.module();
        let mut end = 0;
        loop {
            let next = module[end..].find('.').map(|index| end + index);
            let package = &module[..next.unwrap_or(module.len())];
            if !self.contains_module(package) {
                return Err(ResolveError::ModuleNotFound {
                    module: package.to_string(),
                });
            }
            match next {
                Some(index) => end = index + 1,
                None => break,
            }
        }

        if self.exports(module, path.name()) {
            Ok(())
        } else {
            Err(ResolveError::ObjectNotFound {
                module: module.to_string(),
                name: path.name().to_string(),
            })
        }
    }

    /// Iterates over the registered module paths in order.
    #[inline]
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Iterates over the names `module` exports, if it is known.
    #[inline]
    pub fn names(&self, module: &str) -> Option<impl Iterator<Item = &str>> {
        self.modules
            .get(module)
            .map(|exports| exports.iter().map(String::as_str))
    }

    /// Registers every module submitted with [`export_module!`](crate::export_module).
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration succeeded on the current platform; otherwise, `false`.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it always do nothing and
    /// returns `false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mw_value::registry::ModuleRegistry;
    ///
    /// mw_value::export_module!("myapp.validators", ["validate_slug"]);
    ///
    /// let mut registry = ModuleRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.exports("myapp.validators", "validate_slug"));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            let mut found = false;
            for export in super::auto_register::collected() {
                self.register_module(export.module, export.names.iter().copied());
                found = true;
            }
            found
        }

        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ModuleRegistry, ResolveError};
    use crate::ImportPath;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn parents_are_registered() {
        let mut registry = ModuleRegistry::empty();
        assert!(registry.register_module("django.db.models", ["CharField"]));
        assert!(!registry.register_module("django.db.models", ["TextField"]));

        assert!(registry.contains_module("django"));
        assert!(registry.exports("django", "db"));
        assert!(registry.exports("django.db", "models"));
        assert!(registry.exports("django.db.models", "CharField"));
        assert!(registry.exports("django.db.models", "TextField"));

        let modules: Vec<_> = registry.modules().collect();
        assert_eq!(modules, ["django", "django.db", "django.db.models"]);
    }

    #[test]
    fn resolve_reports_first_missing_package() {
        let mut registry = ModuleRegistry::empty();
        registry.register("django.core.validators.RegexValidator").unwrap();

        let path = ImportPath::parse("django.utils.timezone.utc").unwrap();
        assert_eq!(
            registry.resolve(&path),
            Err(ResolveError::ModuleNotFound {
                module: "django.utils".to_string()
            })
        );

        let path = ImportPath::parse("custom.EmailValidator").unwrap();
        assert_eq!(
            registry.resolve(&path).unwrap_err().to_string(),
            "No module named 'custom'"
        );
    }

    #[test]
    fn defaults() {
        let registry = ModuleRegistry::new();
        assert!(registry.exports("re", "compile"));
        assert!(registry.exports("builtins", "list"));
        assert!(registry.names("decimal").unwrap().eq(["Decimal"]));
        assert!(registry.names("missing").is_none());
    }

    crate::export_module!("tests.auto", ["registered"]);

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register() {
        let mut registry = ModuleRegistry::empty();
        assert!(registry.auto_register());
        assert!(registry.exports("tests.auto", "registered"));
        assert!(registry.exports("builtins", "set"));
    }
}
