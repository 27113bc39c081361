use alloc::format;

use mw_value::Value;

use super::{Serialized, SerializeProcessor, Serializer};

use crate::SerializeError;

/// A serializer for sets.
///
/// Members are written in sorted order so the output does not depend on
/// insertion order. The empty set is `set()`, since `{}` is an empty dict.
pub(super) struct SetSerializer<'a, P: SerializeProcessor> {
    pub items: &'a [Value],
    pub driver: &'a Serializer<'a, P>,
}

impl<P: SerializeProcessor> SetSerializer<'_, P> {
    pub fn serialize(&self) -> Result<Serialized, SerializeError> {
        let (mut strings, imports) = self.driver.serialize_all(self.items)?;
        if strings.is_empty() {
            return Ok(Serialized {
                code: "set()".into(),
                imports,
            });
        }

        strings.sort_unstable();
        strings.dedup();
        Ok(Serialized {
            code: format!("{{{}}}", strings.join(", ")),
            imports,
        })
    }
}
