use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use mw_value::{Deconstructed, ImportPath};

use super::{Serialized, SerializeProcessor, Serializer};

use crate::SerializeError;

/// A serializer for deconstructed objects: `path(arg, ..., name=value, ...)`.
pub(super) struct ObjectSerializer<'a, P: SerializeProcessor> {
    pub parts: &'a Deconstructed,
    pub driver: &'a Serializer<'a, P>,
}

impl<P: SerializeProcessor> ObjectSerializer<'_, P> {
    pub fn serialize(&self) -> Result<Serialized, SerializeError> {
        let path = ImportPath::parse(&self.parts.path).map_err(|source| {
            SerializeError::InvalidPath {
                path: self.parts.path.clone(),
                source,
            }
        })?;

        if self.driver.config().resolve_paths {
            self.driver.registry().resolve(&path)?;
        }

        let Serialized { code: name, mut imports } = self.driver.reference(&path);

        let mut strings: Vec<String> =
            Vec::with_capacity(self.parts.args.len() + self.parts.kwargs.len());
        for arg in &self.parts.args {
            let arg = self.driver.serialize(arg)?;
            strings.push(arg.code);
            imports.union(arg.imports);
        }
        for (keyword, arg) in &self.parts.kwargs {
            let arg = self.driver.serialize(arg)?;
            strings.push(format!("{keyword}={}", arg.code));
            imports.union(arg.imports);
        }

        Ok(Serialized {
            code: format!("{name}({})", strings.join(", ")),
            imports,
        })
    }
}
