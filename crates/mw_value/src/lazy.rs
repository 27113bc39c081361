use alloc::string::String;

/// A translatable string whose translation is looked up when it is displayed.
///
/// Equal to a plain string with the same message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LazyText {
    pub message: String,
}

impl LazyText {
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
