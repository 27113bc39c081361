use alloc::string::String;
use alloc::vec::Vec;
use alloc::{format, vec};

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// ImportedName

/// A name made available by an import statement, e.g. `utc` from
/// `from django.utils.timezone import utc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedName {
    pub import: String,
    pub name: String,
}

impl ImportedName {
    pub fn new(import: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            import: import.into(),
            name: name.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// ModuleAlias

/// Renders objects of `module` as `alias.Name`, importing `import` instead
/// of the module itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAlias {
    pub module: String,
    pub import: String,
    pub alias: String,
}

impl ModuleAlias {
    pub fn new(module: impl Into<String>, import: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            import: import.into(),
            alias: alias.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// LazyTextMode

/// How translatable text is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LazyTextMode {
    /// As a plain string literal. The text stays equal, the translation marker is lost.
    #[default]
    Plain,
    /// As a call to [`WriterConfig::translation`].
    Translatable,
}

// -----------------------------------------------------------------------------
// WriterConfig

/// Configuration of the serializer and the migration writer.
///
/// Every field has a default, so a configuration file only names what it changes.
///
/// # Examples
///
/// ```
/// # use mw_writer::{LazyTextMode, WriterConfig};
/// let config: WriterConfig = serde_json::from_str(r#"{ "lazy_text": "Translatable" }"#).unwrap();
///
/// assert_eq!(config.lazy_text, LazyTextMode::Translatable);
/// assert_eq!(config.utc.name, "utc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// The UTC singleton appended as `tzinfo=` to zone-aware datetimes.
    pub utc: ImportedName,
    /// The settings object [`SettingsReference`](mw_value::SettingsReference)s are read from.
    pub settings: ImportedName,
    /// The function wrapping translatable text in [`LazyTextMode::Translatable`].
    pub translation: ImportedName,
    pub module_aliases: Vec<ModuleAlias>,
    pub lazy_text: LazyTextMode,
    /// Check deconstruct paths against the module registry.
    pub resolve_paths: bool,
    /// Spaces per indentation level in migration files.
    pub indent: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            utc: ImportedName::new("from django.utils.timezone import utc", "utc"),
            settings: ImportedName::new("from django.conf import settings", "settings"),
            translation: ImportedName::new(
                "from django.utils.translation import ugettext_lazy as _",
                "_",
            ),
            module_aliases: vec![
                ModuleAlias::new("django.db.models", "from django.db import models", "models"),
                ModuleAlias::new(
                    "django.db.migrations",
                    "from django.db import migrations",
                    "migrations",
                ),
            ],
            lazy_text: LazyTextMode::Plain,
            resolve_paths: true,
            indent: 4,
        }
    }
}

impl WriterConfig {
    /// Finds the alias configured for exactly `module`.
    pub fn alias_for(&self, module: &str) -> Option<&ModuleAlias> {
        self.module_aliases.iter().find(|alias| alias.module == module)
    }

    /// `n` levels of indentation.
    pub(crate) fn indentation(&self, n: usize) -> String {
        format!("{:width$}", "", width = self.indent * n)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{LazyTextMode, WriterConfig};

    #[test]
    fn ron_overrides() {
        let config: WriterConfig = ron::from_str(
            r#"(
                settings: (import: "from project import conf", name: "conf"),
                resolve_paths: false,
                module_aliases: [],
            )"#,
        )
        .unwrap();

        assert_eq!(config.settings.name, "conf");
        assert!(!config.resolve_paths);
        assert!(config.alias_for("django.db.models").is_none());
        assert_eq!(config.lazy_text, LazyTextMode::Plain);
        assert_eq!(config.indent, 4);
    }

    #[test]
    fn json_round_trip() {
        let config = WriterConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: WriterConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn aliases() {
        let config = WriterConfig::default();
        assert_eq!(config.alias_for("django.db.models").unwrap().alias, "models");
        assert!(config.alias_for("django.db").is_none());
        assert_eq!(config.indentation(2), "        ");
    }
}
