use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{Callable, Constant, Decimal, Deconstruct, Deconstructed};
use crate::{LazyText, Pattern, SettingsReference};

// -----------------------------------------------------------------------------
// ValueKind

/// The kind of a [`Value`].
///
/// [`Display`](fmt::Display) prints the name of the Python type the kind
/// stands for, as used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    Decimal,
    Bytes,
    Str,
    Lazy,
    Dict,
    List,
    Tuple,
    Set,
    Pattern,
    Date,
    Time,
    DateTime,
    Object,
    Callable,
    Constant,
    Setting,
    Opaque,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.pad("NoneType"),
            Self::Bool => f.pad("bool"),
            Self::Int => f.pad("int"),
            Self::Float => f.pad("float"),
            Self::Decimal => f.pad("Decimal"),
            Self::Bytes => f.pad("bytes"),
            Self::Str => f.pad("str"),
            Self::Lazy => f.pad("Promise"),
            Self::Dict => f.pad("dict"),
            Self::List => f.pad("list"),
            Self::Tuple => f.pad("tuple"),
            Self::Set => f.pad("set"),
            Self::Pattern => f.pad("Pattern"),
            Self::Date => f.pad("date"),
            Self::Time => f.pad("time"),
            Self::DateTime => f.pad("datetime"),
            Self::Object => f.pad("object"),
            Self::Callable => f.pad("function"),
            Self::Constant => f.pad("constant"),
            Self::Setting => f.pad("SettingsReference"),
            Self::Opaque => f.pad("opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// Opaque

/// A value of a type no serialization rule knows about.
///
/// It only carries enough to name the offending value in an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    pub type_name: Cow<'static, str>,
    pub repr: String,
}

// -----------------------------------------------------------------------------
// Value

/// Any value handed to the serializer.
///
/// Equality follows the equality of the Python type each variant stands for:
///
/// - sets and dicts compare regardless of order;
/// - decimals compare by numeric value, so `1.0` equals `1.00`;
/// - zone-aware datetimes compare by instant, whatever their offsets;
/// - objects compare by what they [deconstruct](Deconstruct) into;
/// - lazy text and settings references compare equal to a plain string;
/// - callables and constants compare by full dotted path;
/// - opaque values never compare equal.
///
/// Generators are not a variant: collect them first. `Value` implements
/// [`FromIterator`], collecting into a tuple.
///
/// # Examples
///
/// ```
/// # use mw_value::Value;
/// let squares: Value = (0..3)
///     .map(|x: i64| Value::tuple([x, x * x]))
///     .collect();
///
/// assert_eq!(
///     squares,
///     Value::Tuple(vec![
///         Value::tuple([0, 0]),
///         Value::tuple([1, 1]),
///         Value::tuple([2, 4]),
///     ])
/// );
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i128),
    Float(f64),
    Decimal(Decimal),
    Bytes(Vec<u8>),
    Str(String),
    Lazy(LazyText),
    /// Entries in iteration order.
    Dict(Vec<(Value, Value)>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    Pattern(Pattern),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeTz(DateTime<FixedOffset>),
    Object(Arc<dyn Deconstruct>),
    Callable(Callable),
    Constant(Constant),
    Setting(SettingsReference),
    Opaque(Opaque),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::None => ValueKind::None,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Str(_) => ValueKind::Str,
            Self::Lazy(_) => ValueKind::Lazy,
            Self::Dict(_) => ValueKind::Dict,
            Self::List(_) => ValueKind::List,
            Self::Tuple(_) => ValueKind::Tuple,
            Self::Set(_) => ValueKind::Set,
            Self::Pattern(_) => ValueKind::Pattern,
            Self::Date(_) => ValueKind::Date,
            Self::Time(_) => ValueKind::Time,
            Self::DateTime(_) | Self::DateTimeTz(_) => ValueKind::DateTime,
            Self::Object(_) => ValueKind::Object,
            Self::Callable(_) => ValueKind::Callable,
            Self::Constant(_) => ValueKind::Constant,
            Self::Setting(_) => ValueKind::Setting,
            Self::Opaque(_) => ValueKind::Opaque,
        }
    }

    #[inline]
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    #[inline]
    pub fn lazy(message: impl Into<String>) -> Self {
        Self::Lazy(LazyText::new(message))
    }

    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn tuple<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Collects a set, dropping members equal to an earlier one.
    pub fn set<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        let mut members: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !members.contains(&item) {
                members.push(item);
            }
        }
        Self::Set(members)
    }

    /// Collects a dict, a later entry replacing the value of an equal key.
    pub fn dict<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut dict: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            match dict.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => dict.push((key, value)),
            }
        }
        Self::Dict(dict)
    }

    #[inline]
    pub fn object(object: impl Deconstruct + 'static) -> Self {
        Self::Object(Arc::new(object))
    }

    #[inline]
    pub fn opaque(type_name: impl Into<Cow<'static, str>>, repr: impl Into<String>) -> Self {
        Self::Opaque(Opaque {
            type_name: type_name.into(),
            repr: repr.into(),
        })
    }
}

// -----------------------------------------------------------------------------
// Equality

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Lazy(a), Self::Lazy(b)) => a == b,
            (Self::Lazy(a), Self::Str(b)) | (Self::Str(b), Self::Lazy(a)) => a.message == *b,
            (Self::Setting(a), Self::Setting(b)) => a == b,
            (Self::Setting(a), Self::Str(b)) | (Self::Str(b), Self::Setting(a)) => a.value == *b,
            (Self::List(a), Self::List(b)) | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => same_members(a, b),
            (Self::Dict(a), Self::Dict(b)) => same_entries(a, b),
            (Self::Pattern(a), Self::Pattern(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            // `DateTime` equality compares the instant, not the offset.
            (Self::DateTimeTz(a), Self::DateTimeTz(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => {
                Arc::ptr_eq(a, b) || a.deconstruct() == b.deconstruct()
            }
            (Self::Callable(a), Self::Callable(b)) => a == b,
            (Self::Constant(a), Self::Constant(b)) => a == b,
            (Self::Callable(a), Self::Constant(b)) | (Self::Constant(b), Self::Callable(a)) => {
                a.full_path().as_deref() == Some(b.path.as_str())
            }
            _ => false,
        }
    }
}

fn same_members(a: &[Value], b: &[Value]) -> bool {
    a.iter().all(|x| b.contains(x)) && b.iter().all(|y| a.contains(y))
}

fn same_entries(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    fn lookup<'v>(entries: &'v [(Value, Value)], key: &Value) -> Option<&'v Value> {
        entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    a.len() == b.len()
        && a.iter().all(|(key, value)| lookup(b, key) == Some(value))
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Int(i128::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

macro_rules! impl_from {
    ($ty:ty => $variant:ident) => {
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    };
}

impl_from!(bool => Bool);
impl_from!(f64 => Float);
impl_from!(String => Str);
impl_from!(Decimal => Decimal);
impl_from!(LazyText => Lazy);
impl_from!(Pattern => Pattern);
impl_from!(NaiveDate => Date);
impl_from!(NaiveTime => Time);
impl_from!(NaiveDateTime => DateTime);
impl_from!(DateTime<FixedOffset> => DateTimeTz);
impl_from!(Callable => Callable);
impl_from!(Constant => Constant);
impl_from!(SettingsReference => Setting);
impl_from!(Arc<dyn Deconstruct> => Object);
impl_from!(Vec<Value> => List);

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(String::from(value))
    }
}

impl From<DateTime<Utc>> for Value {
    #[inline]
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTimeTz(value.fixed_offset())
    }
}

impl From<Deconstructed> for Value {
    #[inline]
    fn from(value: Deconstructed) -> Self {
        Self::Object(Arc::new(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::None,
        }
    }
}

impl FromIterator<Value> for Value {
    /// Materializes an iterator into a tuple.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Tuple(iter.into_iter().collect())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Value, ValueKind};
    use crate::{Callable, Constant, Decimal, Deconstructed, LazyText, SettingsReference};
    use alloc::format;
    use alloc::vec;

    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    #[test]
    fn set_ignores_order_and_duplicates() {
        let a = Value::set([Value::from(2), Value::from(3), Value::from("eighty")]);
        let b = Value::set([Value::from("eighty"), Value::from(3), Value::from(2), Value::from(2)]);
        assert_eq!(a, b);
        assert_eq!(b, Value::set([Value::from("eighty"), Value::from(3), Value::from(2)]));
        assert_ne!(a, Value::set([2, 3]));
    }

    #[test]
    fn dict_ignores_order() {
        let a = Value::dict([(1, "a"), (2, "b")]);
        let b = Value::dict([(2, "b"), (1, "a")]);
        assert_eq!(a, b);
        assert_ne!(a, Value::dict([(1, "a"), (2, "c")]));
        assert_eq!(Value::dict([(1, "a"), (1, "b")]), Value::dict([(1, "b")]));
    }

    #[test]
    fn decimal_keys_compare_numerically() {
        let one = |text: &str| Value::from(Decimal::parse(text).unwrap());
        assert_eq!(Value::dict([(one("1.0"), 1)]), Value::dict([(one("1.00"), 1)]));
        assert_eq!(Value::set([one("1.0"), one("1.00")]), Value::set([one("1")]));
    }

    #[test]
    fn list_and_tuple_differ() {
        assert_ne!(Value::list([1, 2]), Value::tuple([1, 2]));
        assert_eq!(Value::list([1, 2]), Value::list([1, 2]));
    }

    #[test]
    fn string_like_equality() {
        assert_eq!(Value::Lazy(LazyText::new("Hello")), Value::from("Hello"));
        assert_eq!(
            Value::from("auth.User"),
            Value::Setting(SettingsReference::new("auth.User", "AUTH_USER_MODEL"))
        );
        assert_ne!(Value::from("Hello"), Value::bytes(*b"Hello"));
    }

    #[test]
    fn zone_aware_instant_equality() {
        let offset = FixedOffset::east_opt(180 * 60).unwrap();
        let local = offset.with_ymd_and_hms(2014, 1, 1, 1, 1, 0).unwrap();
        let utc = Utc.with_ymd_and_hms(2013, 12, 31, 22, 1, 0).unwrap();
        assert_eq!(Value::from(local), Value::from(utc));
    }

    #[test]
    fn references_by_path() {
        let func = Value::Callable(Callable::new("django.db.models.deletion", "SET_NULL"));
        let constant = Value::Constant(Constant::new("django.db.models.deletion.SET_NULL"));
        assert_eq!(func, constant);
        assert_eq!(constant, func);
    }

    #[test]
    fn objects_by_deconstruction() {
        let a = Value::from(Deconstructed::new("app.Field").kwarg("null", true));
        let b = Value::from(Deconstructed::new("app.Field").kwarg("null", true));
        assert_eq!(a, b);
        assert_ne!(a, Value::from(Deconstructed::new("app.Field")));
    }

    #[test]
    fn opaque_is_never_equal() {
        let a = Value::opaque("object", "<object at 0x1>");
        assert_ne!(a, a.clone());
        assert_eq!(a.kind(), ValueKind::Opaque);
    }

    #[test]
    fn kind_names() {
        assert_eq!(format!("{}", ValueKind::None), "NoneType");
        assert_eq!(format!("{}", Value::from(NaiveDate::from_ymd_opt(2014, 3, 31).unwrap()).kind()), "date");
        assert_eq!(Value::from(Option::<i32>::None).kind(), ValueKind::None);
        assert_eq!(Value::from(vec![Value::None]).kind(), ValueKind::List);
    }
}
