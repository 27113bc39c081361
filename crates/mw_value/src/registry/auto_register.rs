/// A module and the names it exports, submitted at link time.
///
/// Created by [`export_module!`](crate::export_module) and collected by
/// [`ModuleRegistry::auto_register`](super::ModuleRegistry::auto_register).
#[derive(Debug, Clone, Copy)]
pub struct ModuleExport {
    pub module: &'static str,
    pub names: &'static [&'static str],
}

/// Submits a [`ModuleExport`] for automatic registration.
///
/// Does nothing without the `auto_register` feature.
///
/// # Examples
///
/// ```
/// mw_value::export_module!("django.core.validators", ["RegexValidator", "EmailValidator"]);
/// ```
#[macro_export]
macro_rules! export_module {
    ($module:literal, [$($name:literal),* $(,)?]) => {
        $crate::__export_module_impl! {
            $crate::registry::ModuleExport {
                module: $module,
                names: &[$($name),*],
            }
        }
    };
}

#[cfg(feature = "auto_register")]
#[doc(hidden)]
#[macro_export]
macro_rules! __export_module_impl {
    ($export:expr) => {
        $crate::__macro_exports::inventory::submit! { $export }
    };
}

#[cfg(not(feature = "auto_register"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __export_module_impl {
    ($export:expr) => {};
}

#[cfg(feature = "auto_register")]
inventory::collect!(ModuleExport);

// `auto_register` reports success through this entry being collected.
crate::export_module!(
    "builtins",
    ["bool", "bytes", "dict", "float", "frozenset", "int", "list", "object", "set", "str", "tuple", "type"]
);

#[cfg(feature = "auto_register")]
pub(super) fn collected() -> impl Iterator<Item = &'static ModuleExport> {
    inventory::iter::<ModuleExport>.into_iter()
}
