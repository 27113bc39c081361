use mw_value::Value;

use super::{Serialized, Serializer};
use crate::SerializeError;

/// A hook for rendering some values differently from the built-in rules.
///
/// ## Return Value Semantics
///
/// - **`Some(Ok(serialized))`** → The processor rendered the value.
/// - **`Some(Err(error))`** → The processor took the value but it cannot be written.
/// - **`None`** → Not handled; the [`Serializer`] applies its built-in rule.
///
/// The serializer is passed in so a processor can recurse into nested values
/// with the same registry, config and processor.
///
/// ## Default Implementation
///
/// `()` handles nothing.
///
/// # Examples
///
/// ```
/// # use mw_value::{Value, registry::ModuleRegistry};
/// # use mw_writer::{SerializeError, SerializeProcessor, Serialized, Serializer, WriterConfig};
/// struct Money;
///
/// impl SerializeProcessor for Money {
///     fn try_serialize<P: SerializeProcessor>(
///         &self,
///         value: &Value,
///         _serializer: &Serializer<'_, P>,
///     ) -> Option<Result<Serialized, SerializeError>> {
///         match value {
///             Value::Float(_) => Some(Err(SerializeError::custom("use Decimal for money"))),
///             Value::Int(cents) => Some(Ok(Serialized::new(format!("Money({cents})"))
///                 .with_import("from shop.money import Money"))),
///             _ => None,
///         }
///     }
/// }
///
/// let registry = ModuleRegistry::new();
/// let config = WriterConfig::default();
/// let serializer = Serializer::with_processor(&registry, &config, &Money);
///
/// let output = serializer.serialize(&Value::list([Value::Int(250), Value::None])).unwrap();
/// assert_eq!(output.code, "[Money(250), None]");
/// assert!(serializer.serialize(&Value::Float(2.5)).is_err());
/// ```
pub trait SerializeProcessor {
    fn try_serialize<P: SerializeProcessor>(
        &self,
        value: &Value,
        serializer: &Serializer<'_, P>,
    ) -> Option<Result<Serialized, SerializeError>>;
}

impl SerializeProcessor for () {
    #[inline(always)]
    fn try_serialize<P: SerializeProcessor>(
        &self,
        _value: &Value,
        _serializer: &Serializer<'_, P>,
    ) -> Option<Result<Serialized, SerializeError>> {
        None
    }
}
