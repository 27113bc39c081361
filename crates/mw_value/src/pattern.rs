use alloc::string::String;

use bitflags::bitflags;

// -----------------------------------------------------------------------------
// RegexFlags

bitflags! {
    /// Flags of a compiled pattern, with the bit values of Python's `re` module.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RegexFlags: u32 {
        const TEMPLATE = 1;
        const IGNORECASE = 2;
        const LOCALE = 4;
        const MULTILINE = 8;
        const DOTALL = 16;
        const UNICODE = 32;
        const VERBOSE = 64;
        const DEBUG = 128;
        const ASCII = 256;
    }
}

// -----------------------------------------------------------------------------
// Pattern

/// A compiled regular expression: its source text and flags.
///
/// The pattern text is kept verbatim; it is not compiled here.
///
/// # Examples
///
/// ```
/// # use mw_value::{Pattern, RegexFlags};
/// let word = Pattern::new(r"^\w+$").with_flags(RegexFlags::UNICODE);
/// assert_eq!(word.flags.bits(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    pub pattern: String,
    pub flags: RegexFlags,
}

impl Pattern {
    #[inline]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            flags: RegexFlags::empty(),
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: RegexFlags) -> Self {
        self.flags = flags;
        self
    }
}
