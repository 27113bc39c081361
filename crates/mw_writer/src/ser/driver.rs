use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use mw_value::registry::ModuleRegistry;
use mw_value::{Deconstructed, ImportPath, LazyText, Value};

use super::callable_serializer::CallableSerializer;
use super::list_serializer::ListSerializer;
use super::map_serializer::MapSerializer;
use super::object_serializer::ObjectSerializer;
use super::pattern_serializer::PatternSerializer;
use super::set_serializer::SetSerializer;
use super::tuple_serializer::TupleSerializer;
use super::{Serialized, SerializeProcessor, datetime, literal};

use crate::config::{LazyTextMode, WriterConfig};
use crate::{ImportSet, SerializeError};

// -----------------------------------------------------------------------------
// Serializer

/// Serializer of [`Value`]s into Python source text.
///
/// # Serialization Rules
///
/// 1. **Processor Priority**: First attempts to use the provided [`SerializeProcessor`].
///    If the processor takes the value (successfully or with an error), its result is returned immediately.
///
/// 2. **Built-in Rules**: Otherwise the variant decides:
///    - scalars become literals: `None`, `True`, `42`, `1.5`, `b'raw'`, `'text'`;
///      decimals become `Decimal('1.50')`;
///    - containers recurse: `{k: v}`, `[a, b]`, `()`, `(a,)`, `(a, b)`, `{a, b}`, `set()`;
///    - patterns become `re.compile('...', flags)`;
///    - dates and times follow [`serialize_datetime`](super::serialize_datetime);
///    - deconstructing objects become `path(args, kwargs)`, after their path
///      is checked against the [`ModuleRegistry`];
///    - callables and constants become dotted references;
///    - settings references become `settings.NAME`.
///
/// 3. **Opaque values** have no rule and fail with [`SerializeError::Unsupported`].
///
/// A failure anywhere fails the whole call; no partial output is returned.
///
/// # Examples
///
/// ```
/// # use mw_value::{Value, registry::ModuleRegistry};
/// # use mw_writer::Serializer;
/// let registry = ModuleRegistry::new();
/// let serializer = Serializer::new(&registry);
///
/// let output = serializer.serialize(&Value::tuple(["a"])).unwrap();
/// assert_eq!(output.code, "('a',)");
/// assert!(output.imports.is_empty());
///
/// let output = serializer.serialize(&Value::set(Vec::<Value>::new())).unwrap();
/// assert_eq!(output.code, "set()");
/// ```
pub struct Serializer<'a, P: SerializeProcessor = ()> {
    registry: &'a ModuleRegistry,
    config: Cow<'a, WriterConfig>,
    processor: Option<&'a P>,
}

impl<'a> Serializer<'a, ()> {
    /// Creates a serializer with the default [`WriterConfig`] and no processor.
    ///
    /// If you want to add custom logic for serializing certain values, use
    /// [`with_processor`](Self::with_processor).
    #[inline]
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        Self {
            registry,
            config: Cow::Owned(WriterConfig::default()),
            processor: None,
        }
    }

    /// Creates a serializer with no processor.
    #[inline]
    pub fn with_config(registry: &'a ModuleRegistry, config: &'a WriterConfig) -> Self {
        Self {
            registry,
            config: Cow::Borrowed(config),
            processor: None,
        }
    }
}

impl<'a, P: SerializeProcessor> Serializer<'a, P> {
    /// Creates a serializer with a processor.
    #[inline]
    pub fn with_processor(
        registry: &'a ModuleRegistry,
        config: &'a WriterConfig,
        processor: &'a P,
    ) -> Self {
        Self {
            registry,
            config: Cow::Borrowed(config),
            processor: Some(processor),
        }
    }

    #[inline]
    pub fn registry(&self) -> &ModuleRegistry {
        self.registry
    }

    #[inline]
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Renders `value` as an expression and collects the imports it needs.
    pub fn serialize(&self, value: &Value) -> Result<Serialized, SerializeError> {
        if let Some(processor) = self.processor
            && let Some(result) = processor.try_serialize(value, self)
        {
            return result;
        }

        log::trace!("serializing `{}` value", value.kind());

        match value {
            Value::None => Ok(Serialized::new("None")),
            Value::Bool(true) => Ok(Serialized::new("True")),
            Value::Bool(false) => Ok(Serialized::new("False")),
            Value::Int(int) => Ok(Serialized::new(int.to_string())),
            Value::Float(float) => Ok(Serialized::new(literal::float_literal(*float))),
            Value::Decimal(decimal) => Ok(Serialized::new(format!(
                "Decimal({})",
                literal::str_literal(decimal.as_str())
            ))
            .with_import("from decimal import Decimal")),
            Value::Bytes(bytes) => Ok(Serialized::new(literal::bytes_literal(bytes))),
            Value::Str(text) => Ok(Serialized::new(literal::str_literal(text))),
            Value::Lazy(text) => Ok(self.serialize_lazy(text)),
            Value::Dict(entries) => MapSerializer {
                entries,
                driver: self,
            }
            .serialize(),
            Value::List(items) => ListSerializer {
                items,
                driver: self,
            }
            .serialize(),
            Value::Tuple(items) => TupleSerializer {
                items,
                driver: self,
            }
            .serialize(),
            Value::Set(items) => SetSerializer {
                items,
                driver: self,
            }
            .serialize(),
            Value::Pattern(pattern) => PatternSerializer {
                pattern,
                driver: self,
            }
            .serialize(),
            Value::Date(_) | Value::Time(_) | Value::DateTime(_) | Value::DateTimeTz(_) => {
                let code = self.serialize_datetime(value)?;
                let mut output = Serialized::new(code).with_import("import datetime");
                if let Value::DateTimeTz(_) = value {
                    output.imports.insert(self.config.utc.import.as_str());
                }
                Ok(output)
            }
            Value::Object(object) => self.serialize_deconstructed(&object.deconstruct()),
            Value::Callable(callable) => CallableSerializer {
                callable,
                driver: self,
            }
            .serialize(),
            Value::Constant(constant) => {
                let path =
                    ImportPath::parse(&constant.path).map_err(|source| SerializeError::InvalidPath {
                        path: constant.path.clone(),
                        source,
                    })?;
                Ok(self.reference(&path))
            }
            Value::Setting(setting) => Ok(Serialized::new(format!(
                "{}.{}",
                self.config.settings.name, setting.setting_name
            ))
            .with_import(self.config.settings.import.as_str())),
            Value::Opaque(opaque) => Err(SerializeError::Unsupported {
                type_name: opaque.type_name.to_string(),
                repr: opaque.repr.clone(),
            }),
        }
    }

    /// Renders a constructor call from its deconstructed parts.
    ///
    /// The path is checked against the registry when
    /// [`WriterConfig::resolve_paths`] is set.
    pub fn serialize_deconstructed(&self, parts: &Deconstructed) -> Result<Serialized, SerializeError> {
        ObjectSerializer {
            parts,
            driver: self,
        }
        .serialize()
    }

    /// Renders only the date or time part of the rules, see [`serialize_datetime`](super::serialize_datetime).
    pub fn serialize_datetime(&self, value: &Value) -> Result<String, SerializeError> {
        match value {
            Value::Date(date) => datetime::date_repr(date),
            Value::Time(time) => datetime::time_repr(time),
            Value::DateTime(datetime) => datetime::naive_repr(datetime),
            Value::DateTimeTz(datetime) => datetime::aware_repr(datetime, &self.config.utc.name),
            other => Err(SerializeError::Unsupported {
                type_name: other.kind().to_string(),
                repr: format!("{other:?}"),
            }),
        }
    }

    /// A dotted reference to `path`, shortened by a configured module alias.
    ///
    /// ```
    /// # use mw_value::{ImportPath, registry::ModuleRegistry};
    /// # use mw_writer::Serializer;
    /// let registry = ModuleRegistry::new();
    /// let serializer = Serializer::new(&registry);
    ///
    /// let path = ImportPath::parse("django.db.models.SET_NULL").unwrap();
    /// let output = serializer.reference(&path);
    /// assert_eq!(output.code, "models.SET_NULL");
    /// assert!(output.imports.contains("from django.db import models"));
    /// ```
    pub fn reference(&self, path: &ImportPath) -> Serialized {
        match self.config.alias_for(path.module()) {
            Some(alias) => Serialized::new(format!("{}.{}", alias.alias, path.name()))
                .with_import(alias.import.as_str()),
            None => Serialized::new(path.as_str()).with_import(format!("import {}", path.module())),
        }
    }

    /// Serializes every item, keeping their order and merging their imports.
    pub(super) fn serialize_all(
        &self,
        items: &[Value],
    ) -> Result<(Vec<String>, ImportSet), SerializeError> {
        let mut strings = Vec::with_capacity(items.len());
        let mut imports = ImportSet::new();
        for item in items {
            let (code, item_imports) = self.serialize(item)?.into_parts();
            strings.push(code);
            imports.union(item_imports);
        }
        Ok((strings, imports))
    }

    fn serialize_lazy(&self, text: &LazyText) -> Serialized {
        let literal = literal::str_literal(&text.message);
        match self.config.lazy_text {
            LazyTextMode::Plain => {
                log::debug!("writing translatable text {literal} as a plain string");
                Serialized::new(literal)
            }
            LazyTextMode::Translatable => {
                Serialized::new(format!("{}({literal})", self.config.translation.name))
                    .with_import(self.config.translation.import.as_str())
            }
        }
    }
}

/// Serializes `value` with the default configuration.
///
/// # Examples
///
/// ```
/// # use mw_value::{Value, registry::ModuleRegistry};
/// let registry = ModuleRegistry::new();
///
/// let output = mw_writer::serialize(&Value::bytes(*b"foobar"), &registry).unwrap();
/// assert_eq!(output.code, "b'foobar'");
/// ```
pub fn serialize(value: &Value, registry: &ModuleRegistry) -> Result<Serialized, SerializeError> {
    Serializer::new(registry).serialize(value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use mw_value::registry::ModuleRegistry;
    use mw_value::{Callable, Constant, Decimal, Deconstructed, SettingsReference, Value};

    use super::Serializer;
    use crate::{ErrorKind, LazyTextMode, SerializeError, SerializeProcessor, Serialized, WriterConfig};

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register_module("django.db.models", ["SET", "SET_NULL", "FileField"]);
        registry.register_module("django.core.validators", ["RegexValidator", "EmailValidator"]);
        registry.register_module("migrations.test_writer", ["EmailValidator"]);
        registry
    }

    fn code(value: Value) -> String {
        let registry = registry();
        Serializer::new(&registry).serialize(&value).unwrap().code
    }

    fn serialized(value: Value) -> (String, Vec<String>) {
        let registry = registry();
        let output = Serializer::new(&registry).serialize(&value).unwrap();
        let imports = output.imports.iter().map(String::from).collect();
        (output.code, imports)
    }

    fn error(value: Value) -> SerializeError {
        let registry = registry();
        Serializer::new(&registry).serialize(&value).unwrap_err()
    }

    #[test]
    fn scalars() {
        assert_eq!(code(Value::None), "None");
        assert_eq!(code(Value::Bool(true)), "True");
        assert_eq!(code(Value::Int(-7)), "-7");
        assert_eq!(code(Value::Float(2.5)), "2.5");
        assert_eq!(code(Value::bytes(*b"foobar")), "b'foobar'");
        assert_eq!(code(Value::from("foobar")), "'foobar'");
        assert_eq!(code(Value::from("föobár")), "'föobár'");
        assert_eq!(
            serialized(Value::from(Decimal::parse("1.50").unwrap())),
            ("Decimal('1.50')".to_string(), ["from decimal import Decimal".to_string()].into())
        );
    }

    #[test]
    fn containers() {
        assert_eq!(code(Value::dict([(1, 2)])), "{1: 2}");
        assert_eq!(
            code(Value::list([Value::from("a"), Value::Int(2), Value::Bool(true), Value::None])),
            "['a', 2, True, None]"
        );
        assert_eq!(code(Value::set([Value::Int(3), Value::Int(2), Value::from("eighty")])), "{'eighty', 2, 3}");
        assert_eq!(
            code(Value::dict([("lalalala", Value::list(["yeah", "no", "maybe"]))])),
            "{'lalalala': ['yeah', 'no', 'maybe']}"
        );
        assert_eq!(code(Value::dict(Vec::<(Value, Value)>::new())), "{}");
        assert_eq!(code(Value::set(Vec::<Value>::new())), "set()");
    }

    #[test]
    fn tuples() {
        assert_eq!(code(Value::tuple(Vec::<Value>::new())), "()");
        assert_eq!(code(Value::tuple(["a"])), "('a',)");
        assert_eq!(code(Value::tuple(["a", "b", "c"])), "('a', 'b', 'c')");
    }

    #[test]
    fn generator_output_is_a_tuple() {
        let value: Value = (0..3).map(|x| Value::tuple([x, x * x])).collect();
        assert_eq!(code(value), "((0, 0), (1, 1), (2, 4))");
    }

    #[test]
    fn builtins_need_no_import() {
        let value = Value::list(["list", "tuple", "dict", "set"].map(|name| Value::from(Callable::builtin(name))));
        let (code, imports) = serialized(value);
        assert_eq!(code, "[list, tuple, dict, set]");
        assert!(imports.is_empty());
    }

    #[test]
    fn references() {
        assert_eq!(
            serialized(Value::from(Constant::new("django.db.models.SET_NULL"))),
            ("models.SET_NULL".to_string(), ["from django.db import models".to_string()].into())
        );
        assert_eq!(code(Value::from(Deconstructed::new("django.db.models.SET").arg(42))), "models.SET(42)");
        assert_eq!(
            serialized(Value::from(Callable::method("datetime", "datetime", "utcnow"))),
            ("datetime.datetime.utcnow".to_string(), ["import datetime".to_string()].into())
        );
        assert_eq!(
            serialized(Value::from(SettingsReference::new("auth.User", "AUTH_USER_MODEL"))),
            ("settings.AUTH_USER_MODEL".to_string(), ["from django.conf import settings".to_string()].into())
        );
    }

    #[test]
    fn datetime_imports() {
        let date = NaiveDate::from_ymd_opt(2014, 3, 31).unwrap();
        assert_eq!(
            serialized(Value::from(date)),
            ("datetime.date(2014, 3, 31)".to_string(), ["import datetime".to_string()].into())
        );

        let naive = date.and_hms_opt(16, 4, 31).unwrap();
        assert_eq!(code(Value::from(naive)), "datetime.datetime(2014, 3, 31, 16, 4, 31)");

        let aware = FixedOffset::east_opt(0)
            .unwrap()
            .from_local_datetime(&NaiveDate::from_ymd_opt(2012, 1, 1).unwrap().and_hms_opt(1, 1, 0).unwrap())
            .unwrap();
        assert_eq!(
            serialized(Value::from(aware)),
            (
                "datetime.datetime(2012, 1, 1, 1, 1, tzinfo=utc)".to_string(),
                ["from django.utils.timezone import utc".to_string(), "import datetime".to_string()].into()
            )
        );
    }

    #[test]
    fn class_based_validators() {
        let validator = |kwargs: &[(&str, Value)]| {
            let mut parts = Deconstructed::new("django.core.validators.RegexValidator");
            for (name, value) in kwargs {
                parts = parts.kwarg(*name, value.clone());
            }
            Value::from(parts)
        };

        let (code_text, imports) = serialized(validator(&[("message", Value::from("hello"))]));
        assert_eq!(code_text, "django.core.validators.RegexValidator(message='hello')");
        assert_eq!(imports, ["import django.core.validators"]);

        let pattern = mw_value::Pattern::new(r"^\w+$").with_flags(mw_value::RegexFlags::UNICODE);
        assert_eq!(
            code(validator(&[("regex", Value::from(pattern))])),
            r"django.core.validators.RegexValidator(regex=re.compile('^\\w+$', 32))"
        );

        let positional = Deconstructed::new("django.core.validators.RegexValidator")
            .arg("^[0-9]+$")
            .kwarg("flags", 32);
        assert_eq!(code(Value::from(positional)), "django.core.validators.RegexValidator('^[0-9]+$', flags=32)");

        let all_positional = Deconstructed::new("django.core.validators.RegexValidator")
            .arg("^[-a-zA-Z0-9_]+$")
            .arg("Invalid")
            .arg("invalid");
        assert_eq!(
            code(Value::from(all_positional)),
            "django.core.validators.RegexValidator('^[-a-zA-Z0-9_]+$', 'Invalid', 'invalid')"
        );

        let local_module = Deconstructed::new("migrations.test_writer.EmailValidator").kwarg("message", "hello");
        assert_eq!(code(Value::from(local_module)), "migrations.test_writer.EmailValidator(message='hello')");
    }

    #[test]
    fn unresolvable_paths() {
        let err = error(Value::from(Deconstructed::new("custom.EmailValidator").kwarg("message", "hello")));
        assert_eq!(err.to_string(), "No module named 'custom'");
        assert_eq!(err.kind(), ErrorKind::Resolution);

        let err = error(Value::from(Deconstructed::new("django.core.validators.EmailValidator2")));
        assert_eq!(
            err.to_string(),
            "Could not find object EmailValidator2 in django.core.validators."
        );

        let err = error(Value::from(Deconstructed::new("NoModule")));
        assert!(matches!(err, SerializeError::InvalidPath { .. }));
    }

    #[test]
    fn path_resolution_can_be_disabled() {
        let registry = ModuleRegistry::empty();
        let config = WriterConfig {
            resolve_paths: false,
            ..WriterConfig::default()
        };
        let output = Serializer::with_config(&registry, &config)
            .serialize(&Value::from(Deconstructed::new("custom.EmailValidator")))
            .unwrap();
        assert_eq!(output.code, "custom.EmailValidator()");
        assert!(output.imports.contains("import custom"));
    }

    #[test]
    fn unreachable_callables() {
        let err = error(Value::from(Callable::lambda("migrations.test_writer")));
        assert!(err.to_string().starts_with("Cannot serialize function: lambda"));
        assert_eq!(err.kind(), ErrorKind::Scope);

        let err = error(Value::from(Callable::without_module("thing")));
        assert!(matches!(err, SerializeError::NoModule { .. }));

        let upload_to = Callable::new(
            "migrations.test_writer",
            "WriterTests.test_local.<locals>.TestModel2.upload_to",
        );
        let field = Deconstructed::new("django.db.models.FileField").kwarg("upload_to", upload_to);
        let err = error(Value::from(field));
        assert!(
            err.to_string()
                .starts_with("Could not find function upload_to in migrations.test_writer")
        );
        assert_eq!(err.kind(), ErrorKind::Scope);
    }

    #[test]
    fn opaque_values_are_unsupported() {
        let err = error(Value::list([Value::Int(1), Value::opaque("Decimalish", "<Decimalish 1>")]));
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(err.to_string().contains("Decimalish"));
    }

    #[test]
    fn lazy_text() {
        assert_eq!(serialized(Value::lazy("Hello")), ("'Hello'".to_string(), Vec::new()));

        let registry = registry();
        let config = WriterConfig {
            lazy_text: LazyTextMode::Translatable,
            ..WriterConfig::default()
        };
        let output = Serializer::with_config(&registry, &config)
            .serialize(&Value::lazy("Hello"))
            .unwrap();
        assert_eq!(output.code, "_('Hello')");
        assert!(output.imports.contains("from django.utils.translation import ugettext_lazy as _"));
    }

    struct Upper;

    impl SerializeProcessor for Upper {
        fn try_serialize<P: SerializeProcessor>(
            &self,
            value: &Value,
            serializer: &Serializer<'_, P>,
        ) -> Option<Result<Serialized, SerializeError>> {
            match value {
                Value::Str(text) => Some(serializer.serialize(&Value::Bytes(text.to_uppercase().into_bytes()))),
                Value::Float(_) => Some(Err(SerializeError::custom("no floats"))),
                _ => None,
            }
        }
    }

    #[test]
    fn processor_comes_first() {
        let registry = registry();
        let config = WriterConfig::default();
        let serializer = Serializer::with_processor(&registry, &config, &Upper);

        let output = serializer
            .serialize(&Value::dict([("key", Value::list([Value::from("value"), Value::Int(1)]))]))
            .unwrap();
        assert_eq!(output.code, "{b'KEY': [b'VALUE', 1]}");

        let err = serializer.serialize(&Value::tuple([Value::Float(1.0)])).unwrap_err();
        assert_eq!(err, SerializeError::Custom("no floats".to_string()));
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
