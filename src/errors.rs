use crate::name::MAX_POINTERS;
use thiserror::Error;

/// Errors returned while packing or unpacking a message.
///
/// A pack or unpack pass stops at the first error. Nothing is returned
/// from a failed pass, there is no partially written buffer or partially
/// populated [`Message`](crate::Message).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A structurally invalid value, for example a name that is not fully
    /// qualified, a bad type bitmap window, or reserved label bits.
    #[error("illegal format in {field} at offset {offset}: {reason}")]
    Format {
        field: &'static str,
        offset: usize,
        reason: String,
    },

    /// Not enough space to write, or not enough bytes to read, a required field.
    #[error("buffer too small: {needed} bytes needed at offset {offset}, {available} available")]
    BufferTooSmall {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Too many compression pointers were followed while reading a name.
    #[error("too many compression pointers (more than {}) in name at offset {offset}", MAX_POINTERS)]
    Loop { offset: usize },

    /// A record definition is inconsistent: a value does not match its field
    /// descriptor, or a field table could never be decoded. This is a bug in
    /// the definition, not bad input.
    #[error("unknown field tag: {0}")]
    UnknownTag(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if this is a [`Error::Format`] error.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }
}

/// Returns early with an [`Error::Format`].
macro_rules! format_error {
    ($field:expr, $offset:expr, $($arg:tt)*) => {{
        return Err($crate::Error::Format {
            field: $field,
            offset: $offset,
            reason: format!($($arg)*),
        })
    }}
}
