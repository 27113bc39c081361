use alloc::format;
use alloc::string::String;

// -----------------------------------------------------------------------------
// Callable

/// A reference to a function, method or class.
///
/// `qualname` follows Python's `__qualname__`: nested scopes are joined by
/// `.`, a function defined inside another one carries a `<locals>` segment
/// and anonymous functions are named `<lambda>`.
///
/// # Examples
///
/// ```
/// # use mw_value::Callable;
/// let utcnow = Callable::method("datetime", "datetime", "utcnow");
/// assert_eq!(utcnow.full_path().as_deref(), Some("datetime.datetime.utcnow"));
/// assert!(!utcnow.is_local());
///
/// let local = Callable::new(
///     "migrations.test_writer",
///     "WriterTests.test_local.<locals>.TestModel2.upload_to",
/// );
/// assert!(local.is_local());
/// assert_eq!(local.name(), "upload_to");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Callable {
    pub module: Option<String>,
    pub qualname: String,
}

const BUILTINS: &str = "builtins";
const LAMBDA: &str = "<lambda>";
const LOCALS: &str = "<locals>";

impl Callable {
    /// A module-level function or class.
    #[inline]
    pub fn new(module: impl Into<String>, qualname: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            qualname: qualname.into(),
        }
    }

    /// A builtin such as `list` or `set`.
    #[inline]
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(BUILTINS, name)
    }

    /// A method bound to a class, e.g. a classmethod like `datetime.datetime.today`.
    #[inline]
    pub fn method(module: impl Into<String>, class: &str, name: &str) -> Self {
        Self::new(module, format!("{class}.{name}"))
    }

    /// An anonymous function defined in `module`.
    #[inline]
    pub fn lambda(module: impl Into<String>) -> Self {
        Self::new(module, LAMBDA)
    }

    /// A callable whose defining module is unknown.
    #[inline]
    pub fn without_module(qualname: impl Into<String>) -> Self {
        Self {
            module: None,
            qualname: qualname.into(),
        }
    }

    /// The last segment of the qualified name.
    #[inline]
    pub fn name(&self) -> &str {
        match self.qualname.rfind('.') {
            Some(index) => &self.qualname[index + 1..],
            None => &self.qualname,
        }
    }

    /// Everything before [`name`](Self::name), if the callable is nested.
    #[inline]
    pub fn scope(&self) -> Option<&str> {
        self.qualname.rfind('.').map(|index| &self.qualname[..index])
    }

    #[inline]
    pub fn is_builtin(&self) -> bool {
        self.module.as_deref() == Some(BUILTINS)
    }

    #[inline]
    pub fn is_lambda(&self) -> bool {
        self.name() == LAMBDA
    }

    /// Returns `true` if the callable lives in a function body and cannot be imported.
    #[inline]
    pub fn is_local(&self) -> bool {
        self.qualname.split('.').any(|segment| segment == LOCALS)
    }

    /// `module.qualname`, or `None` without a module.
    pub fn full_path(&self) -> Option<String> {
        self.module
            .as_deref()
            .map(|module| format!("{module}.{}", self.qualname))
    }
}

// -----------------------------------------------------------------------------
// Tests
