//! Binary item header framing.
//!
//! Every item on the wire starts with a header that names its kind and the
//! length of what follows:
//!
//! | Byte | Field | Description |
//! |------|-------|-------------|
//! | 0 | Format | Kind tag (bits 7-2) and length-field width (bits 1-0) |
//! | 1..=3 | Length | Big-endian length, 1 to 3 bytes wide |
//!
//! The width bits are `01`, `10` or `11` for 1, 2 or 3 length bytes; `00` is
//! not a valid header. The narrowest width that holds the length is used when
//! encoding.
//!
//! For `L` items the length is the number of child items; for every other
//! kind it is the number of payload bytes.
//!
//! # Example
//!
//! ```
//! use secs2_item::{ItemHeader, ItemKind};
//!
//! let header = ItemHeader::new(ItemKind::B, 256);
//! assert_eq!(header.to_bytes().unwrap(), vec![0x22, 0x01, 0x00]);
//!
//! let (parsed, size) = ItemHeader::from_bytes(&[0x22, 0x01, 0x00]).unwrap();
//! assert_eq!(parsed, header);
//! assert_eq!(size, 3);
//! ```

use crate::error::{Result, Secs2Error};
use crate::kind::{ItemKind, TAG_MASK};

/// Largest length a 3-byte length field can carry.
pub const MAX_ITEM_LENGTH: usize = 0xFF_FFFF;

/// Largest encoded header size: format byte plus a 3-byte length field.
pub const MAX_HEADER_SIZE: usize = 4;

const LENGTH_2_THRESHOLD: usize = 1 << 8;
const LENGTH_3_THRESHOLD: usize = 1 << 16;

/// Decoded item header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHeader {
    /// Item kind named by the tag bits.
    pub kind: ItemKind,
    /// Child count for `L`, payload byte count otherwise.
    pub length: usize,
}

impl ItemHeader {
    /// Creates a new header.
    pub fn new(kind: ItemKind, length: usize) -> Self {
        Self { kind, length }
    }

    /// Returns the number of length bytes needed to encode this header.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::{ItemHeader, ItemKind};
    ///
    /// assert_eq!(ItemHeader::new(ItemKind::B, 255).length_width(), 1);
    /// assert_eq!(ItemHeader::new(ItemKind::B, 256).length_width(), 2);
    /// assert_eq!(ItemHeader::new(ItemKind::B, 65536).length_width(), 3);
    /// ```
    pub fn length_width(self) -> usize {
        if self.length >= LENGTH_3_THRESHOLD {
            3
        } else if self.length >= LENGTH_2_THRESHOLD {
            2
        } else {
            1
        }
    }

    /// Returns the total encoded size of this header in bytes.
    pub fn encoded_len(self) -> usize {
        1 + self.length_width()
    }

    /// Appends the encoded header to `out`.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::Encode` if the length does not fit in three bytes.
    pub fn write_to(self, out: &mut Vec<u8>) -> Result<()> {
        if self.length > MAX_ITEM_LENGTH {
            return Err(Secs2Error::encode(format!(
                "{} length {} exceeds maximum {}",
                self.kind, self.length, MAX_ITEM_LENGTH
            )));
        }

        let width = self.length_width();
        // Length fits in 24 bits, so only the low three bytes are ever kept.
        let be = (self.length as u32).to_be_bytes();
        out.push(self.kind.tag() | width as u8);
        out.extend_from_slice(&be[4 - width..]);
        Ok(())
    }

    /// Serializes the header to bytes.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::Encode` if the length does not fit in three bytes.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(MAX_HEADER_SIZE);
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Parses a header from the start of `data`.
    ///
    /// Returns the header and the number of bytes it occupies.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::BytesParse` if the data is too short, the tag is
    /// unknown, or the width bits are `00`.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize)> {
        Self::parse_at(data, 0)
    }

    /// Parses a header starting at `offset` in `data`.
    ///
    /// Error positions are reported relative to the start of `data`.
    pub(crate) fn parse_at(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let format = *data.get(offset).ok_or_else(|| {
            Secs2Error::bytes_parse(
                offset,
                format!("header byte past end of buffer, length={}", data.len()),
            )
        })?;

        let kind = ItemKind::from_tag(format).map_err(|e| e.into_bytes_parse(offset))?;

        let width = (format & !TAG_MASK) as usize;
        if width == 0 {
            return Err(Secs2Error::bytes_parse(
                offset,
                format!("header 0x{format:02X} has zero length-field width"),
            ));
        }

        let start = offset + 1;
        let end = start + width;
        let length_bytes = data.get(start..end).ok_or_else(|| {
            Secs2Error::bytes_parse(
                start,
                format!(
                    "length field needs {} bytes, {} available",
                    width,
                    data.len().saturating_sub(start)
                ),
            )
        })?;

        let length = length_bytes
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);

        Ok((Self::new(kind, length), 1 + width))
    }
}
