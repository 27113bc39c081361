use alloc::format;

use mw_value::Value;

use super::{Serialized, SerializeProcessor, Serializer};

use crate::SerializeError;

/// A serializer for tuples.
///
/// A one-element tuple keeps its trailing comma, `(x,)`, since `(x)` is
/// just a parenthesized expression.
pub(super) struct TupleSerializer<'a, P: SerializeProcessor> {
    pub items: &'a [Value],
    pub driver: &'a Serializer<'a, P>,
}

impl<P: SerializeProcessor> TupleSerializer<'_, P> {
    pub fn serialize(&self) -> Result<Serialized, SerializeError> {
        let (strings, imports) = self.driver.serialize_all(self.items)?;
        let code = match strings.as_slice() {
            [single] => format!("({single},)"),
            _ => format!("({})", strings.join(", ")),
        };
        Ok(Serialized { code, imports })
    }
}
