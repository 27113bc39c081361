use alloc::format;

use mw_value::{Pattern, Value};

use super::{Serialized, SerializeProcessor, Serializer};

use crate::SerializeError;

/// A serializer for compiled patterns: `re.compile('<pattern>'[, <flags>])`.
///
/// The flags argument is left out when no flag is set.
pub(super) struct PatternSerializer<'a, P: SerializeProcessor> {
    pub pattern: &'a Pattern,
    pub driver: &'a Serializer<'a, P>,
}

impl<P: SerializeProcessor> PatternSerializer<'_, P> {
    pub fn serialize(&self) -> Result<Serialized, SerializeError> {
        let mut output = self
            .driver
            .serialize(&Value::Str(self.pattern.pattern.clone()))?;

        if !self.pattern.flags.is_empty() {
            let flags = self
                .driver
                .serialize(&Value::from(self.pattern.flags.bits()))?;
            output.code = format!("{}, {}", output.code, flags.code);
            output.imports.union(flags.imports);
        }

        output.code = format!("re.compile({})", output.code);
        output.imports.insert("import re");
        Ok(output)
    }
}
