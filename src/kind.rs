//! The SECS-II item kind registry.
//!
//! This module defines the [`ItemKind`] enum, the fixed table of the 14 item
//! kinds a SECS-II item can have. Each kind carries its SML name, the tag it
//! occupies in the top six bits of a binary header byte, and the size of one
//! element for kinds that pack fixed-width values.
//!
//! # Registry
//!
//! | Kind | Tag | Element size | Payload |
//! |------|:---:|:------------:|---------|
//! | `L` | 0x00 | - | child items |
//! | `B` | 0x20 | 1 | raw bytes |
//! | `BOOLEAN` | 0x24 | 1 | booleans |
//! | `A` | 0x40 | - | ASCII text |
//! | `I8` | 0x60 | 8 | signed integers |
//! | `I1` | 0x64 | 1 | signed integers |
//! | `I2` | 0x68 | 2 | signed integers |
//! | `I4` | 0x70 | 4 | signed integers |
//! | `F8` | 0x80 | 8 | IEEE floats |
//! | `F4` | 0x90 | 4 | IEEE floats |
//! | `U8` | 0xA0 | 8 | unsigned integers |
//! | `U1` | 0xA4 | 1 | unsigned integers |
//! | `U2` | 0xA8 | 2 | unsigned integers |
//! | `U4` | 0xB0 | 4 | unsigned integers |
//!
//! # Example
//!
//! ```
//! use secs2_item::ItemKind;
//!
//! assert_eq!(ItemKind::from_name("u4").unwrap(), ItemKind::U4);
//! assert_eq!(ItemKind::from_tag(0xB1).unwrap(), ItemKind::U4);
//! assert_eq!(ItemKind::U4.to_string(), "U4");
//! ```

use std::str::FromStr;

use crate::error::{Result, Secs2Error};

/// Mask selecting the tag bits of a header byte.
pub const TAG_MASK: u8 = 0xFC;

/// How the elements of a fixed-width kind are packed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFormat {
    /// Two's complement signed integer.
    Signed,
    /// Unsigned integer.
    Unsigned,
    /// IEEE 754 floating point.
    Float,
}

/// The kinds of SECS-II items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// List of child items.
    L,
    /// Raw binary bytes.
    B,
    /// Booleans, one byte each.
    Boolean,
    /// ASCII text.
    A,
    /// 8-byte signed integers.
    I8,
    /// 1-byte signed integers.
    I1,
    /// 2-byte signed integers.
    I2,
    /// 4-byte signed integers.
    I4,
    /// 8-byte floats.
    F8,
    /// 4-byte floats.
    F4,
    /// 8-byte unsigned integers.
    U8,
    /// 1-byte unsigned integers.
    U1,
    /// 2-byte unsigned integers.
    U2,
    /// 4-byte unsigned integers.
    U4,
}

impl ItemKind {
    /// Every registered kind, in tag order.
    pub const ALL: [ItemKind; 14] = [
        ItemKind::L,
        ItemKind::B,
        ItemKind::Boolean,
        ItemKind::A,
        ItemKind::I8,
        ItemKind::I1,
        ItemKind::I2,
        ItemKind::I4,
        ItemKind::F8,
        ItemKind::F4,
        ItemKind::U8,
        ItemKind::U1,
        ItemKind::U2,
        ItemKind::U4,
    ];

    /// Returns the SML name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::L => "L",
            ItemKind::B => "B",
            ItemKind::Boolean => "BOOLEAN",
            ItemKind::A => "A",
            ItemKind::I8 => "I8",
            ItemKind::I1 => "I1",
            ItemKind::I2 => "I2",
            ItemKind::I4 => "I4",
            ItemKind::F8 => "F8",
            ItemKind::F4 => "F4",
            ItemKind::U8 => "U8",
            ItemKind::U1 => "U1",
            ItemKind::U2 => "U2",
            ItemKind::U4 => "U4",
        }
    }

    /// Returns the tag this kind occupies in the top six bits of a header byte.
    ///
    /// The two low bits are always zero; they carry the length-field width.
    pub fn tag(self) -> u8 {
        match self {
            ItemKind::L => 0x00,
            ItemKind::B => 0x20,
            ItemKind::Boolean => 0x24,
            ItemKind::A => 0x40,
            ItemKind::I8 => 0x60,
            ItemKind::I1 => 0x64,
            ItemKind::I2 => 0x68,
            ItemKind::I4 => 0x70,
            ItemKind::F8 => 0x80,
            ItemKind::F4 => 0x90,
            ItemKind::U8 => 0xA0,
            ItemKind::U1 => 0xA4,
            ItemKind::U2 => 0xA8,
            ItemKind::U4 => 0xB0,
        }
    }

    /// Returns the size in bytes of one element, or `None` for `L` and `A`,
    /// whose payload size is not a multiple of a fixed element.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::ItemKind;
    ///
    /// assert_eq!(ItemKind::I2.element_size(), Some(2));
    /// assert_eq!(ItemKind::B.element_size(), Some(1));
    /// assert_eq!(ItemKind::L.element_size(), None);
    /// ```
    pub fn element_size(self) -> Option<usize> {
        match self {
            ItemKind::L | ItemKind::A => None,
            ItemKind::B | ItemKind::Boolean | ItemKind::I1 | ItemKind::U1 => Some(1),
            ItemKind::I2 | ItemKind::U2 => Some(2),
            ItemKind::I4 | ItemKind::U4 | ItemKind::F4 => Some(4),
            ItemKind::I8 | ItemKind::U8 | ItemKind::F8 => Some(8),
        }
    }

    /// Returns the numeric packing of this kind, if it is a numeric kind.
    pub fn numeric_format(self) -> Option<NumericFormat> {
        match self {
            ItemKind::I1 | ItemKind::I2 | ItemKind::I4 | ItemKind::I8 => {
                Some(NumericFormat::Signed)
            }
            ItemKind::U1 | ItemKind::U2 | ItemKind::U4 | ItemKind::U8 => {
                Some(NumericFormat::Unsigned)
            }
            ItemKind::F4 | ItemKind::F8 => Some(NumericFormat::Float),
            ItemKind::L | ItemKind::B | ItemKind::Boolean | ItemKind::A => None,
        }
    }

    /// Looks a kind up by its SML name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::UnknownKind` if no kind has that name.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::ItemKind;
    ///
    /// assert_eq!(ItemKind::from_name("boolean").unwrap(), ItemKind::Boolean);
    /// assert!(ItemKind::from_name("X2").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Secs2Error::unknown_kind(name))
    }

    /// Looks a kind up by a header byte; the length-width bits are masked off.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::UnknownTag` if the tag bits match no kind.
    pub fn from_tag(byte: u8) -> Result<Self> {
        let tag = byte & TAG_MASK;
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| Secs2Error::unknown_tag(byte))
    }
}

impl FromStr for ItemKind {
    type Err = Secs2Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_distinct_and_leave_width_bits_clear() {
        for (i, a) in ItemKind::ALL.iter().enumerate() {
            assert_eq!(a.tag() & !TAG_MASK, 0, "{a} uses width bits");
            for b in &ItemKind::ALL[i + 1..] {
                assert_ne!(a.tag(), b.tag(), "{a} and {b} share a tag");
            }
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_name(kind.name()).unwrap(), kind);
            let lower = kind.name().to_ascii_lowercase();
            assert_eq!(ItemKind::from_name(&lower).unwrap(), kind);
        }
        assert_eq!("Boolean".parse::<ItemKind>().unwrap(), ItemKind::Boolean);
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(
            ItemKind::from_name("U3").unwrap_err(),
            Secs2Error::unknown_kind("U3")
        );
        assert!(ItemKind::from_name("").is_err());
        assert!(ItemKind::from_name("BOOL").is_err());
    }

    #[test]
    fn test_from_tag_masks_width_bits() {
        assert_eq!(ItemKind::from_tag(0x01).unwrap(), ItemKind::L);
        assert_eq!(ItemKind::from_tag(0x21).unwrap(), ItemKind::B);
        assert_eq!(ItemKind::from_tag(0x27).unwrap(), ItemKind::Boolean);
        assert_eq!(ItemKind::from_tag(0x42).unwrap(), ItemKind::A);
        assert_eq!(ItemKind::from_tag(0x93).unwrap(), ItemKind::F4);
        assert_eq!(ItemKind::from_tag(0xB1).unwrap(), ItemKind::U4);
    }

    #[test]
    fn test_from_tag_unknown() {
        assert_eq!(
            ItemKind::from_tag(0xFD).unwrap_err(),
            Secs2Error::unknown_tag(0xFD)
        );
        assert!(ItemKind::from_tag(0x04).is_err());
        assert!(ItemKind::from_tag(0x74).is_err());
    }

    #[test]
    fn test_numeric_formats() {
        assert_eq!(ItemKind::I8.numeric_format(), Some(NumericFormat::Signed));
        assert_eq!(ItemKind::U1.numeric_format(), Some(NumericFormat::Unsigned));
        assert_eq!(ItemKind::F4.numeric_format(), Some(NumericFormat::Float));
        assert_eq!(ItemKind::B.numeric_format(), None);
        assert_eq!(ItemKind::A.element_size(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ItemKind::Boolean.to_string(), "BOOLEAN");
        assert_eq!(ItemKind::F8.to_string(), "F8");
    }
}
