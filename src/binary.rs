//! Binary encoding and decoding of items.
//!
//! An encoded item is an [`ItemHeader`] followed by its payload. `L` items
//! are followed by their children's encodings in order; every other kind is
//! followed by exactly `length` payload bytes, with numeric elements packed
//! big-endian at their fixed width and booleans as `0xFF`/`0x00`.
//!
//! # Example
//!
//! ```
//! use secs2_item::Item;
//!
//! let item = Item::create("I2", vec![100, -200])?;
//! assert_eq!(item.to_bytes()?, &[0x69, 0x04, 0x00, 0x64, 0xFF, 0x38]);
//! # Ok::<(), secs2_item::Secs2Error>(())
//! ```

use crate::error::{Result, Secs2Error};
use crate::header::ItemHeader;
use crate::item::{Item, Payload};
use crate::kind::{ItemKind, NumericFormat};

/// Deepest `L` nesting either decoder accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Encodes an item, reusing the memoized encodings of its children.
pub(crate) fn encode(item: &Item) -> Result<Vec<u8>> {
    let kind = item.kind();
    let mut out = Vec::new();

    match item.payload() {
        Payload::List(children) => {
            ItemHeader::new(kind, children.len()).write_to(&mut out)?;
            for child in children {
                out.extend_from_slice(child.to_bytes()?);
            }
        }
        Payload::Boolean(values) => {
            ItemHeader::new(kind, values.len()).write_to(&mut out)?;
            out.extend(values.iter().map(|&b| if b { 0xFF } else { 0x00 }));
        }
        Payload::Ascii(text) => {
            if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
                return Err(Secs2Error::encode(format!(
                    "A value contains non-ASCII character {c:?}"
                )));
            }
            ItemHeader::new(kind, text.len()).write_to(&mut out)?;
            out.extend_from_slice(text.as_bytes());
        }
        Payload::Binary(bytes) => {
            ItemHeader::new(kind, bytes.len()).write_to(&mut out)?;
            out.extend_from_slice(bytes);
        }
        Payload::Signed(values) => {
            let width = element_width(kind);
            ItemHeader::new(kind, values.len() * width).write_to(&mut out)?;
            for &v in values {
                out.extend_from_slice(&v.to_be_bytes()[8 - width..]);
            }
        }
        Payload::Unsigned(values) => {
            let width = element_width(kind);
            ItemHeader::new(kind, values.len() * width).write_to(&mut out)?;
            for &v in values {
                out.extend_from_slice(&v.to_be_bytes()[8 - width..]);
            }
        }
        Payload::Float(values) => {
            let width = element_width(kind);
            ItemHeader::new(kind, values.len() * width).write_to(&mut out)?;
            for &v in values {
                if kind == ItemKind::F4 {
                    out.extend_from_slice(&(v as f32).to_be_bytes());
                } else {
                    out.extend_from_slice(&v.to_be_bytes());
                }
            }
        }
    }

    Ok(out)
}

fn element_width(kind: ItemKind) -> usize {
    kind.element_size().unwrap_or(1)
}

/// Decodes a complete buffer holding exactly one item.
pub(crate) fn decode(data: &[u8]) -> Result<Item> {
    tracing::trace!(length = data.len(), "decoding item bytes");

    let mut cursor = ByteCursor::new(data);
    let result = cursor.read_item(0).and_then(|item| {
        if cursor.pos == data.len() {
            Ok(item)
        } else {
            Err(Secs2Error::bytes_parse(
                cursor.pos,
                format!(
                    "not reach bytes end, reach={}, length={}",
                    cursor.pos,
                    data.len()
                ),
            ))
        }
    });

    match result {
        Ok(item) => {
            item.seed_bytes(data);
            Ok(item)
        }
        Err(e) => {
            tracing::debug!(consumed = cursor.pos, length = data.len(), error = %e, "item bytes rejected");
            Err(e)
        }
    }
}

/// Read position over a complete binary buffer.
struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Consumes `len` bytes, failing if the buffer ends first.
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let data = self.data;
        let end = self.pos.checked_add(len).filter(|&end| end <= data.len());
        match end {
            Some(end) => {
                let bytes = &data[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            None => Err(Secs2Error::bytes_parse(
                self.pos,
                format!(
                    "need {} payload bytes, {} available, length={}",
                    len,
                    data.len() - self.pos,
                    data.len()
                ),
            )),
        }
    }

    fn read_item(&mut self, depth: usize) -> Result<Item> {
        let start = self.pos;
        let (header, header_len) = ItemHeader::parse_at(self.data, start)?;
        self.pos += header_len;

        let kind = header.kind;
        let payload = match kind {
            ItemKind::L => {
                if depth >= MAX_NESTING_DEPTH {
                    return Err(Secs2Error::bytes_parse(
                        start,
                        format!("list nesting exceeds {MAX_NESTING_DEPTH}"),
                    ));
                }
                // The count is untrusted; each child needs at least two bytes.
                let remaining = (self.data.len() - self.pos) / 2;
                let mut children = Vec::with_capacity(header.length.min(remaining));
                for _ in 0..header.length {
                    children.push(self.read_item(depth + 1)?);
                }
                Payload::List(children)
            }
            ItemKind::Boolean => {
                let bytes = self.take(header.length)?;
                Payload::Boolean(bytes.iter().map(|&b| b != 0x00).collect())
            }
            ItemKind::A => {
                let bytes = self.take(header.length)?;
                if let Some(i) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(Secs2Error::bytes_parse(
                        self.pos - bytes.len() + i,
                        format!("A value byte 0x{:02X} is not ASCII", bytes[i]),
                    ));
                }
                Payload::Ascii(bytes.iter().map(|&b| b as char).collect())
            }
            ItemKind::B => Payload::Binary(self.take(header.length)?.to_vec()),
            ItemKind::I1 | ItemKind::I2 | ItemKind::I4 | ItemKind::I8 => {
                self.read_numeric(header, start, NumericFormat::Signed)?
            }
            ItemKind::U1 | ItemKind::U2 | ItemKind::U4 | ItemKind::U8 => {
                self.read_numeric(header, start, NumericFormat::Unsigned)?
            }
            ItemKind::F4 | ItemKind::F8 => self.read_numeric(header, start, NumericFormat::Float)?,
        };

        Ok(Item::from_parts(kind, payload))
    }

    fn read_numeric(
        &mut self,
        header: ItemHeader,
        start: usize,
        format: NumericFormat,
    ) -> Result<Payload> {
        let width = element_width(header.kind);
        if header.length % width != 0 {
            return Err(Secs2Error::bytes_parse(
                start,
                format!(
                    "{} length {} is not a multiple of element size {}",
                    header.kind, header.length, width
                ),
            ));
        }
        let bytes = self.take(header.length)?;
        Ok(unpack_numeric(format, bytes, width))
    }
}

fn unpack_numeric(format: NumericFormat, bytes: &[u8], width: usize) -> Payload {
    let chunks = bytes.chunks_exact(width);
    match format {
        NumericFormat::Signed => Payload::Signed(
            chunks
                .map(|chunk| {
                    // Sign-extend from the top byte of the element.
                    let fill = if chunk[0] & 0x80 != 0 { 0xFF } else { 0x00 };
                    let mut buf = [fill; 8];
                    buf[8 - width..].copy_from_slice(chunk);
                    i64::from_be_bytes(buf)
                })
                .collect(),
        ),
        NumericFormat::Unsigned => Payload::Unsigned(
            chunks
                .map(|chunk| {
                    let mut buf = [0u8; 8];
                    buf[8 - width..].copy_from_slice(chunk);
                    u64::from_be_bytes(buf)
                })
                .collect(),
        ),
        NumericFormat::Float if width == 4 => Payload::Float(
            chunks
                .map(|chunk| f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as f64)
                .collect(),
        ),
        NumericFormat::Float => Payload::Float(
            chunks
                .map(|chunk| {
                    let mut buf = [0u8; 8];
                    buf.copy_from_slice(chunk);
                    f64::from_be_bytes(buf)
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn sample() -> Item {
        Item::create(
            "L",
            vec![
                Value::from((
                    "L",
                    vec![
                        Value::from(("B", vec![0x01, 0xFF])),
                        Value::from(("BOOLEAN", vec![true, false])),
                        Value::from(("L", Vec::<Value>::new())),
                    ],
                )),
                Value::from(("B", vec![0x01, 0x10])),
                Value::from(("A", "ABCDEF")),
                Value::from(("U2", vec![1, 2, 3])),
                Value::from(("I2", vec![-100, 200, -300])),
                Value::from(("F4", vec![19.0, -29.0])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_encode_sample() {
        let expected = hex::decode(concat!(
            "0106",
            "0103", "2102", "01ff", "2502", "ff00", "0100",
            "2102", "0110",
            "4106", "414243444546",
            "a906", "000100020003",
            "6906", "ff9c00c8fed4",
            "9108", "41980000c1e80000",
        ))
        .unwrap();
        assert_eq!(sample().to_bytes().unwrap(), &expected[..]);
    }

    #[test]
    fn test_decode_sample() {
        let item = sample();
        let bytes = item.to_bytes().unwrap().to_vec();
        let decoded = Item::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, item);
        assert_eq!(decoded.to_sml(), item.to_sml());
    }

    #[test]
    fn test_empty_list() {
        let item = Item::create("L", Vec::<Value>::new()).unwrap();
        assert_eq!(item.to_bytes().unwrap(), &[0x01, 0x00]);
        let decoded = Item::from_bytes(&[0x01, 0x00]).unwrap();
        assert!(decoded.as_list().unwrap().is_empty());
    }

    #[test]
    fn test_header_width_selection() {
        for (len, header) in [
            (255usize, vec![0x21, 0xFF]),
            (256, vec![0x22, 0x01, 0x00]),
            (65536, vec![0x23, 0x01, 0x00, 0x00]),
        ] {
            let item = Item::binary(vec![0xAB; len]);
            let bytes = item.to_bytes().unwrap();
            assert_eq!(&bytes[..header.len()], &header[..]);
            assert_eq!(bytes.len(), header.len() + len);
        }
    }

    #[test]
    fn test_numeric_packing() {
        let item = Item::create("U4", vec![1, 0xFFFF_FFFFu32 as i64]).unwrap();
        assert_eq!(
            item.to_bytes().unwrap(),
            &[0xB1, 0x08, 0x00, 0x00, 0x00, 0x01, 0xFF, 0xFF, 0xFF, 0xFF]
        );

        let item = Item::create("I8", vec![-2]).unwrap();
        assert_eq!(
            item.to_bytes().unwrap(),
            &[0x61, 0x08, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]
        );

        let item = Item::create("F8", 1.5).unwrap();
        assert_eq!(
            item.to_bytes().unwrap(),
            &[0x81, 0x08, 0x3F, 0xF8, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_decode_sign_extension() {
        let item = Item::from_bytes(&[0x65, 0x02, 0x80, 0x7F]).unwrap();
        assert_eq!(item.as_signed(), Some(&[-128i64, 127][..]));

        let item = Item::from_bytes(&[0x71, 0x04, 0xFF, 0xFF, 0xFF, 0xFE]).unwrap();
        assert_eq!(item.as_signed(), Some(&[-2i64][..]));

        let item = Item::from_bytes(&[0xA9, 0x02, 0xFF, 0xFE]).unwrap();
        assert_eq!(item.as_unsigned(), Some(&[0xFFFEu64][..]));
    }

    #[test]
    fn test_decode_boolean_nonzero_is_true() {
        let item = Item::from_bytes(&[0x25, 0x03, 0x00, 0x01, 0xFF]).unwrap();
        assert_eq!(item.as_bools(), Some(&[false, true, true][..]));
    }

    #[test]
    fn test_truncation_detection() {
        let bytes = sample().to_bytes().unwrap().to_vec();

        let err = Item::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, Secs2Error::BytesParse { .. }));

        let mut longer = bytes.clone();
        longer.push(0x00);
        let err = Item::from_bytes(&longer).unwrap_err();
        assert_eq!(
            err,
            Secs2Error::bytes_parse(
                bytes.len(),
                format!(
                    "not reach bytes end, reach={}, length={}",
                    bytes.len(),
                    longer.len()
                )
            )
        );
    }

    #[test]
    fn test_unknown_tag_detection() {
        let err = Item::from_bytes(&[0xFD, 0x00]).unwrap_err();
        assert!(matches!(err, Secs2Error::BytesParse { position: 0, .. }));

        // unknown tag nested inside a list
        let err = Item::from_bytes(&[0x01, 0x01, 0x05, 0x00]).unwrap_err();
        assert!(matches!(err, Secs2Error::BytesParse { position: 2, .. }));
    }

    #[test]
    fn test_zero_width_header_rejected() {
        assert!(Item::from_bytes(&[0x20]).is_err());
        assert!(Item::from_bytes(&[0x00, 0x00]).is_err());
    }

    #[test]
    fn test_misaligned_numeric_length_rejected() {
        let err = Item::from_bytes(&[0xA9, 0x03, 0x00, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, Secs2Error::BytesParse { position: 0, .. }));
    }

    #[test]
    fn test_non_ascii_bytes_rejected() {
        let err = Item::from_bytes(&[0x41, 0x02, 0x41, 0xC3]).unwrap_err();
        assert!(matches!(err, Secs2Error::BytesParse { position: 3, .. }));
    }

    #[test]
    fn test_decode_keeps_original_buffer() {
        // A non-minimal 2-byte length field for a 1-byte payload.
        let data = [0xA6, 0x00, 0x01, 0x07];
        let item = Item::from_bytes(&data).unwrap();
        assert_eq!(item.as_unsigned(), Some(&[7u64][..]));
        assert_eq!(item.to_bytes().unwrap(), &data);
    }

    #[test]
    fn test_list_count_past_end() {
        let err = Item::from_bytes(&[0x03, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, Secs2Error::BytesParse { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let mut data = Vec::new();
        for _ in 0..=MAX_NESTING_DEPTH {
            data.extend_from_slice(&[0x01, 0x01]);
        }
        data.extend_from_slice(&[0x01, 0x00]);
        assert!(Item::from_bytes(&data).is_err());
    }

    #[test]
    fn test_encode_non_ascii_in_list_fails() {
        let item = Item::list(vec![Item::ascii("\u{2603}")]).unwrap();
        assert!(matches!(
            item.to_bytes().unwrap_err(),
            Secs2Error::Encode { .. }
        ));
    }
}
