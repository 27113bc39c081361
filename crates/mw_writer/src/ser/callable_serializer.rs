use alloc::format;
use alloc::string::{String, ToString};

use mw_value::Callable;

use super::{Serialized, SerializeProcessor, Serializer};

use crate::SerializeError;

/// A serializer for references to functions, methods and classes.
///
/// Only callables an import can reach are accepted: lambdas, callables with
/// no module and callables defined inside a function body are rejected.
pub(super) struct CallableSerializer<'a, P: SerializeProcessor> {
    pub callable: &'a Callable,
    pub driver: &'a Serializer<'a, P>,
}

impl<P: SerializeProcessor> CallableSerializer<'_, P> {
    pub fn serialize(&self) -> Result<Serialized, SerializeError> {
        let callable = self.callable;

        if callable.is_lambda() {
            return Err(SerializeError::Lambda {
                module: callable
                    .module
                    .clone()
                    .unwrap_or_else(|| String::from("<unknown>")),
            });
        }

        let Some(module) = callable.module.as_deref() else {
            return Err(SerializeError::NoModule {
                name: callable.qualname.clone(),
            });
        };

        if callable.is_local() {
            return Err(SerializeError::LocalScope {
                name: callable.name().to_string(),
                module: module.to_string(),
                scope: callable.scope().unwrap_or_default().to_string(),
            });
        }

        if callable.is_builtin() {
            return Ok(Serialized::new(callable.qualname.as_str()));
        }

        Ok(match self.driver.config().alias_for(module) {
            Some(alias) => Serialized::new(format!("{}.{}", alias.alias, callable.qualname))
                .with_import(alias.import.as_str()),
            None => Serialized::new(format!("{module}.{}", callable.qualname))
                .with_import(format!("import {module}")),
        })
    }
}
