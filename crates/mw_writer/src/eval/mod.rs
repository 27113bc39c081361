//! Read serializer output back into a [`Value`].
//!
//! The [`Evaluator`] understands the expression subset the serializer writes,
//! run under the import statements that came with it. It is used to check
//! that written code means what was serialized.
//!
//! ## Overview
//!
//! - Every import statement is turned into name bindings; a name that is
//!   neither imported nor a builtin fails with [`EvalError::Name`].
//! - Calls to `datetime.*`, `re.compile`, `decimal.Decimal`, `set`, `float`
//!   and the configured translation function build the matching value.
//! - Any other call builds a [`Deconstructed`] object, and any other
//!   reference a [`Constant`].
//! - `settings.NAME` is looked up in a table given with
//!   [`Evaluator::with_setting`].

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::{NaiveDate, NaiveTime};
use mw_value::{Constant, Decimal, Deconstructed, LazyText, Pattern, RegexFlags, SettingsReference, Value};

use crate::{ImportSet, ImportedName, Serialized, WriterConfig};

// -----------------------------------------------------------------------------
// Modules

mod bindings;
mod error;
mod parser;
mod token;

use bindings::Bindings;
use parser::Expr;

// -----------------------------------------------------------------------------
// Exports

pub use error::EvalError;

#[cfg(test)]
pub(crate) use token::{Token, tokenize};

// -----------------------------------------------------------------------------
// Evaluator

/// Evaluator of serializer output.
///
/// # Examples
///
/// ```
/// # use mw_value::{SettingsReference, Value, registry::ModuleRegistry};
/// # use mw_writer::{Serializer, WriterConfig, eval::Evaluator};
/// let registry = ModuleRegistry::new();
/// let config = WriterConfig::default();
/// let serializer = Serializer::with_config(&registry, &config);
///
/// let value = Value::list([
///     Value::from(SettingsReference::new("auth.User", "AUTH_USER_MODEL")),
///     Value::Float(f64::INFINITY),
/// ]);
/// let output = serializer.serialize(&value).unwrap();
///
/// let evaluator = Evaluator::new(&config).with_setting("AUTH_USER_MODEL", "auth.User");
/// assert_eq!(evaluator.evaluate_serialized(&output).unwrap(), value);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    settings: BTreeMap<String, String>,
    settings_path: Option<String>,
    utc_path: Option<String>,
    translation_path: Option<String>,
}

impl Evaluator {
    /// Creates an evaluator that recognizes the names configured in `config`.
    pub fn new(config: &WriterConfig) -> Self {
        Self {
            settings: BTreeMap::new(),
            settings_path: configured_path(&config.settings),
            utc_path: configured_path(&config.utc),
            translation_path: configured_path(&config.translation),
        }
    }

    /// Gives `settings.<name>` a value.
    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    /// Evaluates one expression under `imports`.
    pub fn evaluate(&self, code: &str, imports: &ImportSet) -> Result<Value, EvalError> {
        let expr = parser::parse(code)?;
        let scope = Scope {
            evaluator: self,
            bindings: Bindings::from_imports(imports)?,
        };
        scope.eval(&expr)
    }

    #[inline]
    pub fn evaluate_serialized(&self, serialized: &Serialized) -> Result<Value, EvalError> {
        self.evaluate(&serialized.code, &serialized.imports)
    }
}

fn configured_path(name: &ImportedName) -> Option<String> {
    let mut bindings = Bindings::default();
    match bindings.bind_statement(&name.import) {
        Ok(()) => bindings.lookup(&name.name),
        Err(err) => {
            log::warn!("ignoring configured name `{}`: {err}", name.name);
            None
        }
    }
}

// -----------------------------------------------------------------------------
// Scope

struct Scope<'a> {
    evaluator: &'a Evaluator,
    bindings: Bindings,
}

impl Scope<'_> {
    fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Name(name) if name == "None" => Ok(Value::None),
            Expr::Name(name) if name == "True" => Ok(Value::Bool(true)),
            Expr::Name(name) if name == "False" => Ok(Value::Bool(false)),
            Expr::Name(_) | Expr::Attribute(..) => {
                let path = self.path_of(expr)?;
                self.reference(path)
            }
            Expr::Call { func, args, kwargs } => {
                let path = self.path_of(func)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut values = BTreeMap::new();
                for (name, arg) in kwargs {
                    if values.insert(name.clone(), self.eval(arg)?).is_some() {
                        return Err(EvalError::call(&path, format!("repeated keyword argument `{name}`")));
                    }
                }
                self.call(path, args, values)
            }
            Expr::Neg(inner) => match inner.as_ref() {
                Expr::Int(magnitude) => 0i128
                    .checked_sub_unsigned(*magnitude)
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::call("-", "integer literal out of range")),
                _ => match self.eval(inner)? {
                    Value::Int(int) => int
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| EvalError::call("-", "integer overflow")),
                    Value::Float(float) => Ok(Value::Float(-float)),
                    other => Err(EvalError::call("-", format!("bad operand type `{}`", other.kind()))),
                },
            },
            Expr::Int(magnitude) => i128::try_from(*magnitude)
                .map(Value::Int)
                .map_err(|_| EvalError::call("int", "integer literal out of range")),
            Expr::Float(float) => Ok(Value::Float(*float)),
            Expr::Str(text) => Ok(Value::Str(text.clone())),
            Expr::Bytes(bytes) => Ok(Value::Bytes(bytes.clone())),
            Expr::List(items) => Ok(Value::List(self.eval_all(items)?)),
            Expr::Tuple(items) => Ok(Value::Tuple(self.eval_all(items)?)),
            Expr::Set(items) => Ok(Value::set(self.eval_all(items)?)),
            Expr::Dict(entries) => {
                let mut pairs = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    pairs.push((self.eval(key)?, self.eval(value)?));
                }
                Ok(Value::dict(pairs))
            }
        }
    }

    fn eval_all(&self, items: &[Expr]) -> Result<Vec<Value>, EvalError> {
        items.iter().map(|item| self.eval(item)).collect()
    }

    fn path_of(&self, expr: &Expr) -> Result<String, EvalError> {
        let dotted = expr
            .dotted()
            .ok_or_else(|| EvalError::call("<expression>", "only names and attributes can be referenced"))?;
        self.bindings.resolve(&dotted)
    }

    fn reference(&self, path: String) -> Result<Value, EvalError> {
        if let Some(settings) = &self.evaluator.settings_path
            && let Some(name) = path.strip_prefix(settings.as_str()).and_then(|rest| rest.strip_prefix('.'))
        {
            return match self.evaluator.settings.get(name) {
                Some(value) => Ok(Value::Setting(SettingsReference::new(value.as_str(), name))),
                None => Err(EvalError::UnknownSetting {
                    name: String::from(name),
                }),
            };
        }
        Ok(Value::Constant(Constant::new(path)))
    }

    fn call(
        &self,
        path: String,
        args: Vec<Value>,
        kwargs: BTreeMap<String, Value>,
    ) -> Result<Value, EvalError> {
        let call = Call {
            path: &path,
            args: &args,
            kwargs: &kwargs,
        };
        match path.as_str() {
            "datetime.datetime" => self.datetime(&call),
            "datetime.date" => {
                call.keywords(&[])?;
                let [year, month, day] = call.ints::<3>(3)?;
                Ok(Value::Date(call.date(year, month, day)?))
            }
            "datetime.time" => {
                call.keywords(&[])?;
                let [hour, minute, second, micro] = call.ints::<4>(0)?;
                Ok(Value::Time(call.time(hour, minute, second, micro)?))
            }
            "re.compile" => {
                call.keywords(&["flags"])?;
                let pattern = match args.first() {
                    Some(Value::Str(pattern)) => pattern.clone(),
                    _ => return Err(call.error("expected a pattern string")),
                };
                let flags = match (args.get(1), kwargs.get("flags")) {
                    (None, None) => 0,
                    (Some(Value::Int(flags)), None) | (None, Some(Value::Int(flags))) => {
                        u32::try_from(*flags).map_err(|_| call.error("flags out of range"))?
                    }
                    _ => return Err(call.error("expected integer flags")),
                };
                if args.len() > 2 {
                    return Err(call.error("too many arguments"));
                }
                Ok(Value::Pattern(
                    Pattern::new(pattern).with_flags(RegexFlags::from_bits_retain(flags)),
                ))
            }
            "decimal.Decimal" => match call.single()? {
                Value::Str(text) => Decimal::parse(text)
                    .map(Value::Decimal)
                    .map_err(|err| call.error(format!("{err}"))),
                Value::Int(int) => Decimal::parse(&format!("{int}"))
                    .map(Value::Decimal)
                    .map_err(|err| call.error(format!("{err}"))),
                _ => Err(call.error("expected a string")),
            },
            "builtins.set" => {
                call.keywords(&[])?;
                match args.as_slice() {
                    [] => Ok(Value::Set(Vec::new())),
                    [Value::List(items) | Value::Tuple(items) | Value::Set(items)] => {
                        Ok(Value::set(items.iter().cloned()))
                    }
                    _ => Err(call.error("expected one iterable")),
                }
            }
            "builtins.float" => match call.single()? {
                Value::Str(text) => parse_float(text)
                    .map(Value::Float)
                    .ok_or_else(|| call.error(format!("could not convert string to float: '{text}'"))),
                Value::Int(int) => Ok(Value::Float(*int as f64)),
                Value::Float(float) => Ok(Value::Float(*float)),
                _ => Err(call.error("expected a string or a number")),
            },
            _ if self.evaluator.translation_path.as_deref() == Some(path.as_str()) => {
                match call.single()? {
                    Value::Str(text) => Ok(Value::Lazy(LazyText::new(text.as_str()))),
                    _ => Err(call.error("expected a message string")),
                }
            }
            _ => Ok(Value::from(Deconstructed {
                path: path.clone(),
                args,
                kwargs,
            })),
        }
    }

    fn datetime(&self, call: &Call<'_>) -> Result<Value, EvalError> {
        call.keywords(&["tzinfo"])?;
        if call.args.len() < 3 {
            return Err(call.error("expected at least year, month and day"));
        }
        let [year, month, day, hour, minute, second, micro] = call.ints::<7>(3)?;
        let naive = call
            .date(year, month, day)?
            .and_time(call.time(hour, minute, second, micro)?);

        match call.kwargs.get("tzinfo") {
            None | Some(Value::None) => Ok(Value::DateTime(naive)),
            Some(Value::Constant(tz)) if self.evaluator.utc_path.as_deref() == Some(tz.path.as_str()) => {
                Ok(Value::DateTimeTz(naive.and_utc().fixed_offset()))
            }
            Some(other) => Err(call.error(format!("unknown tzinfo {other:?}"))),
        }
    }
}

fn parse_float(text: &str) -> Option<f64> {
    match text.trim().to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" | "+infinity" => Some(f64::INFINITY),
        "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
        "nan" | "+nan" | "-nan" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

// -----------------------------------------------------------------------------
// Call

/// Evaluated arguments of one call.
struct Call<'a> {
    path: &'a str,
    args: &'a [Value],
    kwargs: &'a BTreeMap<String, Value>,
}

impl Call<'_> {
    fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::call(self.path, message)
    }

    fn keywords(&self, allowed: &[&str]) -> Result<(), EvalError> {
        match self.kwargs.keys().find(|name| !allowed.contains(&name.as_str())) {
            Some(name) => Err(self.error(format!("unexpected keyword argument `{name}`"))),
            None => Ok(()),
        }
    }

    fn single(&self) -> Result<&Value, EvalError> {
        self.keywords(&[])?;
        match self.args {
            [arg] => Ok(arg),
            _ => Err(self.error(format!("expected 1 argument, got {}", self.args.len()))),
        }
    }

    /// Between `required` and `N` integer arguments, missing ones as zero.
    fn ints<const N: usize>(&self, required: usize) -> Result<[i128; N], EvalError> {
        if self.args.len() < required || self.args.len() > N {
            return Err(self.error(format!(
                "expected {required} to {N} arguments, got {}",
                self.args.len()
            )));
        }
        let mut ints = [0; N];
        for (slot, arg) in ints.iter_mut().zip(self.args) {
            match arg {
                Value::Int(int) => *slot = *int,
                other => return Err(self.error(format!("expected an integer, got `{}`", other.kind()))),
            }
        }
        Ok(ints)
    }

    fn date(&self, year: i128, month: i128, day: i128) -> Result<NaiveDate, EvalError> {
        let invalid = || self.error("date out of range");
        NaiveDate::from_ymd_opt(
            i32::try_from(year).map_err(|_| invalid())?,
            u32::try_from(month).map_err(|_| invalid())?,
            u32::try_from(day).map_err(|_| invalid())?,
        )
        .ok_or_else(invalid)
    }

    fn time(&self, hour: i128, minute: i128, second: i128, micro: i128) -> Result<NaiveTime, EvalError> {
        let invalid = || self.error("time out of range");
        let field = |value: i128| u32::try_from(value).map_err(|_| invalid());
        NaiveTime::from_hms_micro_opt(field(hour)?, field(minute)?, field(second)?, field(micro)?)
            .filter(|_| micro < 1_000_000)
            .ok_or_else(invalid)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use mw_value::registry::ModuleRegistry;
    use mw_value::{
        Callable, Constant, Decimal, Deconstructed, LazyText, Pattern, RegexFlags, SettingsReference, Value,
    };

    use super::{EvalError, Evaluator};
    use crate::{ImportSet, LazyTextMode, Serializer, WriterConfig};

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register_module("django.db.models", ["SET", "SET_NULL", "CharField", "TextField"]);
        registry.register_module("django.core.validators", ["RegexValidator", "EmailValidator"]);
        registry
    }

    fn round_trip_with(config: &WriterConfig, value: &Value) -> Value {
        let registry = registry();
        let serializer = Serializer::with_config(&registry, config);
        let output = serializer.serialize(value).unwrap();
        Evaluator::new(config)
            .with_setting("AUTH_USER_MODEL", "auth.User")
            .evaluate_serialized(&output)
            .unwrap()
    }

    fn assert_round_trip(value: Value) {
        let back = round_trip_with(&WriterConfig::default(), &value);
        assert_eq!(back, value, "round trip of {value:?}");
    }

    #[test]
    fn scalars() {
        assert_round_trip(Value::Int(1));
        assert_round_trip(Value::Int(-170141183460469231731687303715884105727));
        assert_round_trip(Value::Int(i128::MIN));
        assert_round_trip(Value::Int(i128::MAX));
        assert_round_trip(Value::None);
        assert_round_trip(Value::Bool(false));
        assert_round_trip(Value::bytes(*b"foobar"));
        assert_round_trip(Value::bytes(vec![0, b'\'', b'"', 0xff]));
        assert_round_trip(Value::from("föobár"));
        assert_round_trip(Value::from("it's \"quoted\"\n\t\\"));
        assert_round_trip(Value::from("\u{0}\u{a0}\u{2028}\u{1f600}"));
        assert_round_trip(Value::Float(-1.5e-300));
        assert_round_trip(Value::Float(0.1));
        assert_round_trip(Value::Float(f64::NEG_INFINITY));
        assert_round_trip(Value::from(Decimal::parse("-19.990").unwrap()));
    }

    #[test]
    fn not_a_number_stays_not_a_number() {
        let back = round_trip_with(&WriterConfig::default(), &Value::Float(f64::NAN));
        assert!(matches!(back, Value::Float(float) if float.is_nan()));
    }

    #[test]
    fn containers() {
        assert_round_trip(Value::dict([(1, 2)]));
        assert_round_trip(Value::list([Value::from("a"), Value::Int(2), Value::Bool(true), Value::None]));
        assert_round_trip(Value::set([Value::Int(2), Value::Int(3), Value::from("eighty")]));
        assert_round_trip(Value::set(vec![Value::Int(1)]));
        assert_round_trip(Value::set(Vec::<Value>::new()));
        assert_round_trip(Value::dict([(
            "lalalala",
            Value::list(["yeah", "no", "maybe"]),
        )]));
        assert_round_trip(Value::dict(Vec::<(Value, Value)>::new()));
        assert_round_trip(Value::tuple(Vec::<Value>::new()));
        assert_round_trip(Value::tuple(["a"]));
        assert_round_trip(Value::tuple(["a", "b", "c"]));
    }

    #[test]
    fn lazy_text() {
        assert_round_trip(Value::lazy("Hello"));

        let config = WriterConfig {
            lazy_text: LazyTextMode::Translatable,
            ..WriterConfig::default()
        };
        let back = round_trip_with(&config, &Value::lazy("Hello"));
        assert!(matches!(back, Value::Lazy(ref text) if *text == LazyText::new("Hello")));
    }

    #[test]
    fn references() {
        assert_round_trip(Value::list(["list", "tuple", "dict", "set"].map(|name| Value::from(Callable::builtin(name)))));
        assert_round_trip(Value::from(Constant::new("django.db.models.SET_NULL")));
        assert_round_trip(Value::from(Callable::method("datetime", "datetime", "utcnow")));
        assert_round_trip(Value::from(Callable::method("datetime", "date", "today")));
        assert_round_trip(Value::from(SettingsReference::new("auth.User", "AUTH_USER_MODEL")));
    }

    #[test]
    fn datetimes() {
        let naive = NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_micro_opt(1, 1, 7, 12)
            .unwrap();
        assert_round_trip(Value::from(naive));
        assert_round_trip(Value::from(naive.date()));
        assert_round_trip(Value::from(naive.time()));

        let plus_three = FixedOffset::east_opt(180 * 60).unwrap();
        assert_round_trip(Value::from(plus_three.from_local_datetime(&naive).unwrap()));
    }

    #[test]
    fn objects() {
        assert_round_trip(Value::from(
            Deconstructed::new("django.db.models.CharField").kwarg("max_length", 255),
        ));
        assert_round_trip(Value::from(
            Deconstructed::new("django.db.models.TextField")
                .kwarg("null", true)
                .kwarg("blank", true),
        ));
        assert_round_trip(Value::from(
            Deconstructed::new("django.core.validators.RegexValidator")
                .kwarg("regex", Pattern::new(r"^\w+$").with_flags(RegexFlags::UNICODE)),
        ));
        assert_round_trip(Value::from(Pattern::new("^[a-z]+$")));
    }

    #[test]
    fn generator_output() {
        let generated: Value = (0..3).map(|x| Value::tuple([x, x * x])).collect();
        assert_round_trip(generated);
    }

    #[test]
    fn missing_imports_are_detected() {
        let evaluator = Evaluator::new(&WriterConfig::default());
        assert_eq!(
            evaluator.evaluate("datetime.date(2014, 3, 31)", &ImportSet::new()),
            Err(EvalError::Name {
                name: "datetime".to_string()
            })
        );
        assert!(
            evaluator
                .evaluate("datetime.date(2014, 3, 31)", &ImportSet::from_iter(["import datetime"]))
                .is_ok()
        );
    }

    #[test]
    fn unknown_settings_are_reported() {
        let evaluator = Evaluator::new(&WriterConfig::default());
        let imports = ImportSet::from_iter(["from django.conf import settings"]);
        assert!(matches!(
            evaluator.evaluate("settings.AUTH_USER_MODEL", &imports),
            Err(EvalError::UnknownSetting { .. })
        ));
    }

    #[test]
    fn bad_calls() {
        let evaluator = Evaluator::new(&WriterConfig::default());
        let imports = ImportSet::from_iter(["import datetime", "import re"]);
        for code in [
            "datetime.date(2014, 13, 1)",
            "datetime.time(1, 1, 1, 1000000)",
            "datetime.datetime(2014, 1, 1, tzinfo=1)",
            "re.compile(1)",
            "float('one')",
            "set(1, 2)",
            "170141183460469231731687303715884105728",
            "-170141183460469231731687303715884105729",
        ] {
            assert!(
                matches!(evaluator.evaluate(code, &imports), Err(EvalError::Call { .. })),
                "{code}"
            );
        }
    }
}
