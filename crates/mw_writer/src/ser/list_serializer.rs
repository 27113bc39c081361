use alloc::format;

use mw_value::Value;

use super::{Serialized, SerializeProcessor, Serializer};

use crate::SerializeError;

/// A serializer for lists.
pub(super) struct ListSerializer<'a, P: SerializeProcessor> {
    pub items: &'a [Value],
    pub driver: &'a Serializer<'a, P>,
}

impl<P: SerializeProcessor> ListSerializer<'_, P> {
    pub fn serialize(&self) -> Result<Serialized, SerializeError> {
        let (strings, imports) = self.driver.serialize_all(self.items)?;
        Ok(Serialized {
            code: format!("[{}]", strings.join(", ")),
            imports,
        })
    }
}
