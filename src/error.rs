//! Error types for SECS-II item construction, encoding and decoding.

use thiserror::Error;

/// Result type alias for SECS-II item operations.
pub type Result<T> = std::result::Result<T, Secs2Error>;

/// Errors that can occur while building, encoding or decoding items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Secs2Error {
    /// A value could not be turned into an item of the requested kind.
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of the violation.
        reason: String,
    },

    /// The kind name has no registry entry.
    #[error("Unknown item kind '{name}'")]
    UnknownKind {
        /// The name that was looked up.
        name: String,
    },

    /// The header byte carries a tag with no registry entry.
    #[error("Unknown item tag 0x{tag:02X}")]
    UnknownTag {
        /// The full header byte that was looked up.
        tag: u8,
    },

    /// SML text could not be decoded.
    #[error("SML parse error at position {position}: {reason}")]
    SmlParse {
        /// Byte offset into the trimmed text where decoding stopped.
        position: usize,
        /// Description of the failure.
        reason: String,
    },

    /// A binary buffer could not be decoded.
    #[error("Bytes parse error at offset {position}: {reason}")]
    BytesParse {
        /// Byte offset where decoding stopped.
        position: usize,
        /// Description of the failure.
        reason: String,
    },

    /// An item could not be encoded to bytes.
    #[error("Encode error: {reason}")]
    Encode {
        /// Description of the failure.
        reason: String,
    },
}

impl Secs2Error {
    /// Creates a new `InvalidValue` error.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::Secs2Error;
    ///
    /// let err = Secs2Error::invalid_value("L value requires a sequence");
    /// ```
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Creates a new `UnknownKind` error.
    pub fn unknown_kind(name: impl Into<String>) -> Self {
        Self::UnknownKind { name: name.into() }
    }

    /// Creates a new `UnknownTag` error.
    pub fn unknown_tag(tag: u8) -> Self {
        Self::UnknownTag { tag }
    }

    /// Creates a new `SmlParse` error.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::Secs2Error;
    ///
    /// let err = Secs2Error::sml_parse(3, "unterminated quote");
    /// assert!(err.is_parse_error());
    /// ```
    pub fn sml_parse(position: usize, reason: impl Into<String>) -> Self {
        Self::SmlParse {
            position,
            reason: reason.into(),
        }
    }

    /// Creates a new `BytesParse` error.
    pub fn bytes_parse(position: usize, reason: impl Into<String>) -> Self {
        Self::BytesParse {
            position,
            reason: reason.into(),
        }
    }

    /// Creates a new `Encode` error.
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    /// Returns whether this error came out of one of the two decoders.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::SmlParse { .. } | Self::BytesParse { .. })
    }

    /// Re-raises this error as an SML decode failure at `position`.
    ///
    /// Errors that already belong to the SML decoder are returned unchanged.
    pub(crate) fn into_sml_parse(self, position: usize) -> Self {
        match self {
            e @ Self::SmlParse { .. } => e,
            other => Self::sml_parse(position, other.to_string()),
        }
    }

    /// Re-raises this error as a binary decode failure at `position`.
    pub(crate) fn into_bytes_parse(self, position: usize) -> Self {
        match self {
            e @ Self::BytesParse { .. } => e,
            other => Self::bytes_parse(position, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = Secs2Error::invalid_value("value is from 0 to 255, value is 256");
        assert_eq!(
            err.to_string(),
            "Invalid value: value is from 0 to 255, value is 256"
        );
    }

    #[test]
    fn test_unknown_tag_display() {
        let err = Secs2Error::unknown_tag(0xFD);
        assert_eq!(err.to_string(), "Unknown item tag 0xFD");
    }

    #[test]
    fn test_parse_error_display() {
        let err = Secs2Error::bytes_parse(4, "not reach bytes end, reach=4, length=5");
        assert_eq!(
            err.to_string(),
            "Bytes parse error at offset 4: not reach bytes end, reach=4, length=5"
        );
        assert!(err.is_parse_error());
        assert!(!Secs2Error::encode("x").is_parse_error());
    }

    #[test]
    fn test_wrapping_keeps_direction_specific_errors() {
        let sml = Secs2Error::sml_parse(1, "bad");
        assert_eq!(sml.clone().into_sml_parse(9), sml);

        let wrapped = Secs2Error::unknown_kind("X9").into_sml_parse(2);
        assert_eq!(
            wrapped,
            Secs2Error::sml_parse(2, "Unknown item kind 'X9'")
        );

        let wrapped = Secs2Error::unknown_tag(0xFC).into_bytes_parse(0);
        assert!(matches!(wrapped, Secs2Error::BytesParse { position: 0, .. }));
    }
}
