//! Error types for the sleepy-core crate.

use core::fmt;

/// Malformed hex text in a credential source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The source has an odd number of characters.
    OddLength { len: usize },
    /// A byte outside `[0-9a-fA-F]` was found. `pair` is the zero-based
    /// index of the byte pair that contains it.
    InvalidHexDigit { pair: usize, byte: u8 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::OddLength { len } => {
                write!(f, "hex string has odd length {len}")
            }
            DecodeError::InvalidHexDigit { pair, byte } => {
                if byte.is_ascii_graphic() {
                    write!(f, "invalid hex digit '{}' in byte pair {pair}", *byte as char)
                } else {
                    write!(f, "invalid hex digit 0x{byte:02x} in byte pair {pair}")
                }
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// A decoded operational dataset that fails size validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetError {
    Decode(DecodeError),
    TooLong { len: usize, max: usize },
    EmptyDataset,
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Decode(e) => write!(f, "failed to decode dataset: {e}"),
            DatasetError::TooLong { len, max } => {
                write!(f, "dataset too long: {len} bytes, maximum is {max}")
            }
            DatasetError::EmptyDataset => write!(f, "dataset is empty"),
        }
    }
}

impl From<DecodeError> for DatasetError {
    fn from(e: DecodeError) -> Self {
        DatasetError::Decode(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Decode(e) => Some(e),
            _ => None,
        }
    }
}
