use alloc::string::String;

// -----------------------------------------------------------------------------
// Constant

/// A symbolic reference to a module-level constant, e.g. `django.db.models.SET_NULL`.
///
/// The referenced value itself is never inspected; the reference round-trips
/// through its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constant {
    pub path: String,
}

impl Constant {
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

// -----------------------------------------------------------------------------
// SettingsReference

/// A string value that came from a project setting.
///
/// It compares equal to its plain [`value`](Self::value), but serializes as
/// a reference to the setting so a migration follows the setting if it changes.
///
/// # Examples
///
/// ```
/// # use mw_value::{SettingsReference, Value};
/// let user_model = SettingsReference::new("auth.User", "AUTH_USER_MODEL");
/// assert_eq!(Value::Setting(user_model), Value::from("auth.User"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsReference {
    pub value: String,
    pub setting_name: String,
}

impl SettingsReference {
    #[inline]
    pub fn new(value: impl Into<String>, setting_name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            setting_name: setting_name.into(),
        }
    }
}
