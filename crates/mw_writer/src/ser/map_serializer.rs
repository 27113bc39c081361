use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use mw_value::Value;

use super::{Serialized, SerializeProcessor, Serializer};

use crate::{ImportSet, SerializeError};

/// A serializer for dicts, in iteration order.
pub(super) struct MapSerializer<'a, P: SerializeProcessor> {
    pub entries: &'a [(Value, Value)],
    pub driver: &'a Serializer<'a, P>,
}

impl<P: SerializeProcessor> MapSerializer<'_, P> {
    pub fn serialize(&self) -> Result<Serialized, SerializeError> {
        let mut strings: Vec<String> = Vec::with_capacity(self.entries.len());
        let mut imports = ImportSet::new();
        for (key, value) in self.entries {
            let key = self.driver.serialize(key)?;
            let value = self.driver.serialize(value)?;
            strings.push(format!("{}: {}", key.code, value.code));
            imports.union(key.imports);
            imports.union(value.imports);
        }
        Ok(Serialized {
            code: format!("{{{}}}", strings.join(", ")),
            imports,
        })
    }
}
