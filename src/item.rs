//! The immutable SECS-II item value.
//!
//! An [`Item`] pairs an [`ItemKind`] with a validated [`Payload`]. All
//! validation happens when the item is built; afterwards the item never
//! changes. Each item lazily memoizes its SML text, its binary encoding and
//! its debug string the first time they are requested.
//!
//! # Example
//!
//! ```
//! use secs2_item::{Item, ItemKind, Value};
//!
//! let item = Item::create("L", vec![
//!     Value::from(("U4", vec![100, 200])),
//!     Value::from(("A", "READY")),
//! ])?;
//!
//! assert_eq!(item.kind(), ItemKind::L);
//! assert_eq!(item.len(), 2);
//!
//! let bytes = item.to_bytes()?.to_vec();
//! let decoded = Item::from_bytes(&bytes)?;
//! assert_eq!(decoded.to_sml(), item.to_sml());
//! # Ok::<(), secs2_item::Secs2Error>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::binary::{self, MAX_NESTING_DEPTH};
use crate::error::{Result, Secs2Error};
use crate::kind::ItemKind;
use crate::sml::{self, SmlConfig};
use crate::value::{self, Value};

/// The validated contents of an item; the variant is fixed by the kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Children of an `L` item.
    List(Vec<Item>),
    /// Elements of a `BOOLEAN` item.
    Boolean(Vec<bool>),
    /// Text of an `A` item.
    Ascii(String),
    /// Bytes of a `B` item.
    Binary(Vec<u8>),
    /// Elements of an `I1`, `I2`, `I4` or `I8` item.
    Signed(Vec<i64>),
    /// Elements of a `U1`, `U2`, `U4` or `U8` item.
    Unsigned(Vec<u64>),
    /// Elements of an `F4` or `F8` item.
    Float(Vec<f64>),
}

/// A SECS-II item: a kind plus its validated payload.
#[derive(Clone)]
pub struct Item {
    kind: ItemKind,
    payload: Payload,
    /// Number of `L` levels from this item down to its deepest leaf.
    depth: usize,
    sml: OnceLock<String>,
    bytes: OnceLock<Vec<u8>>,
    debug: OnceLock<String>,
}

impl Item {
    /// Builds an item of `kind` from a raw value.
    ///
    /// Scalars given to array kinds become one-element sequences. Integers
    /// are range-checked against the kind's width; text tokens with a `0x`
    /// prefix are read as hexadecimal.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::InvalidValue` if the value has the wrong shape
    /// for the kind, an element is out of range, or lists nest deeper than
    /// [`MAX_NESTING_DEPTH`](crate::MAX_NESTING_DEPTH).
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::{Item, ItemKind};
    ///
    /// let item = Item::new(ItemKind::I1, vec![-128, 127])?;
    /// assert_eq!(item.as_signed(), Some(&[-128i64, 127][..]));
    ///
    /// assert!(Item::new(ItemKind::I1, 128).is_err());
    /// # Ok::<(), secs2_item::Secs2Error>(())
    /// ```
    pub fn new(kind: ItemKind, value: impl Into<Value>) -> Result<Self> {
        let payload = value::coerce(kind, value.into())?;
        Self::from_parts(kind, payload).check_depth()
    }

    /// Builds an item from a kind name, matched ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::InvalidValue` if the name is not a known kind,
    /// or for any reason [`Item::new`] would.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::Item;
    ///
    /// let item = Item::create("u1", 255)?;
    /// assert_eq!(item.to_sml(), "<U1 [1] 255 >");
    ///
    /// assert!(Item::create("U1", 256).is_err());
    /// assert!(Item::create("X1", 0).is_err());
    /// # Ok::<(), secs2_item::Secs2Error>(())
    /// ```
    pub fn create(name: &str, value: impl Into<Value>) -> Result<Self> {
        let kind = ItemKind::from_name(name)
            .map_err(|e| Secs2Error::invalid_value(e.to_string()))?;
        Self::new(kind, value)
    }

    /// Builds an `L` item from already-built children.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::InvalidValue` if the result would nest lists
    /// deeper than [`MAX_NESTING_DEPTH`](crate::MAX_NESTING_DEPTH), which
    /// neither decoder accepts.
    pub fn list(children: Vec<Item>) -> Result<Self> {
        Self::from_parts(ItemKind::L, Payload::List(children)).check_depth()
    }

    /// Builds an `A` item.
    ///
    /// The text is not checked here; non-ASCII characters fail at encode time.
    pub fn ascii(text: impl Into<String>) -> Self {
        Self::from_parts(ItemKind::A, Payload::Ascii(text.into()))
    }

    /// Builds a `B` item.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_parts(ItemKind::B, Payload::Binary(bytes.into()))
    }

    /// Builds a `BOOLEAN` item.
    pub fn boolean(values: Vec<bool>) -> Self {
        Self::from_parts(ItemKind::Boolean, Payload::Boolean(values))
    }

    /// Assembles an item from a payload already known to be valid for `kind`.
    pub(crate) fn from_parts(kind: ItemKind, payload: Payload) -> Self {
        let depth = match &payload {
            Payload::List(children) => 1 + children.iter().map(|c| c.depth).max().unwrap_or(0),
            _ => 0,
        };
        Self {
            kind,
            payload,
            depth,
            sml: OnceLock::new(),
            bytes: OnceLock::new(),
            debug: OnceLock::new(),
        }
    }

    fn check_depth(self) -> Result<Self> {
        if self.depth > MAX_NESTING_DEPTH {
            return Err(Secs2Error::invalid_value(format!(
                "list nesting exceeds {MAX_NESTING_DEPTH}"
            )));
        }
        Ok(self)
    }

    /// Decodes an item from SML text.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::SmlParse` on any malformed input, including
    /// trailing characters after the item.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::Item;
    ///
    /// let item = Item::from_sml(r#"<A [7] "AB" 0x43 "D">"#)?;
    /// assert_eq!(item.as_ascii(), Some("ABCD"));
    /// # Ok::<(), secs2_item::Secs2Error>(())
    /// ```
    pub fn from_sml(text: &str) -> Result<Self> {
        sml::decode(text)
    }

    /// Decodes an item from a complete binary buffer.
    ///
    /// The buffer must hold exactly one item. The decoded item keeps a copy
    /// of the buffer, so [`Item::to_bytes`] returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::BytesParse` if the buffer is malformed, truncated
    /// or has trailing bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::Item;
    ///
    /// let item = Item::from_bytes(&[0xA5, 0x02, 0x01, 0x02])?;
    /// assert_eq!(item.to_sml(), "<U1 [2] 1 2 >");
    ///
    /// assert!(Item::from_bytes(&[0xA5, 0x02, 0x01]).is_err());
    /// # Ok::<(), secs2_item::Secs2Error>(())
    /// ```
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        binary::decode(data)
    }

    /// Returns the item's kind.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Returns the item's payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the SML rendering, computed once and memoized.
    ///
    /// Uses the default [`SmlConfig`]: two-space indent and the host's
    /// native line separator.
    pub fn to_sml(&self) -> &str {
        self.sml
            .get_or_init(|| sml::render(self, &SmlConfig::default()))
    }

    /// Renders SML with an explicit configuration. Not memoized.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::{Item, SmlConfig};
    ///
    /// let item = Item::list(vec![Item::ascii("X")])?;
    /// let config = SmlConfig::new().with_line_separator("\r\n");
    /// assert_eq!(item.to_sml_with(&config), "<L [1]\r\n  <A [1] \"X\" >\r\n>");
    /// # Ok::<(), secs2_item::Secs2Error>(())
    /// ```
    pub fn to_sml_with(&self, config: &SmlConfig) -> String {
        sml::render(self, config)
    }

    /// Returns the binary encoding, computed once and memoized.
    ///
    /// # Errors
    ///
    /// Returns `Secs2Error::Encode` if `A` text contains non-ASCII
    /// characters or a length does not fit the 3-byte length field.
    /// Failures are not memoized.
    pub fn to_bytes(&self) -> Result<&[u8]> {
        if let Some(bytes) = self.bytes.get() {
            return Ok(bytes);
        }
        let encoded = binary::encode(self)?;
        Ok(self.bytes.get_or_init(|| encoded))
    }

    /// Stores the bytes this item was decoded from as its encoding.
    pub(crate) fn seed_bytes(&self, bytes: &[u8]) {
        let _ = self.bytes.set(bytes.to_vec());
    }

    /// Returns a `(KIND, payload)` debug rendering, computed once and memoized.
    pub fn debug_string(&self) -> &str {
        self.debug.get_or_init(|| {
            let body = match &self.payload {
                Payload::List(children) => {
                    let parts: Vec<&str> = children.iter().map(Item::debug_string).collect();
                    format!("[{}]", parts.join(", "))
                }
                Payload::Boolean(v) => format!("{v:?}"),
                Payload::Ascii(s) => format!("{s:?}"),
                Payload::Binary(v) => format!("{v:?}"),
                Payload::Signed(v) => format!("{v:?}"),
                Payload::Unsigned(v) => format!("{v:?}"),
                Payload::Float(v) => format!("{v:?}"),
            };
            format!("({:?}, {})", self.kind.name(), body)
        })
    }

    /// Returns the number of children or elements.
    ///
    /// Children for `L`, characters for `A`, elements otherwise.
    pub fn len(&self) -> usize {
        match &self.payload {
            Payload::List(v) => v.len(),
            Payload::Boolean(v) => v.len(),
            Payload::Ascii(s) => s.chars().count(),
            Payload::Binary(v) => v.len(),
            Payload::Signed(v) => v.len(),
            Payload::Unsigned(v) => v.len(),
            Payload::Float(v) => v.len(),
        }
    }

    /// Returns whether the item has no children or elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the child or element at `index`.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::{Element, Item};
    ///
    /// let item = Item::create("I2", vec![-1, 2])?;
    /// assert_eq!(item.get(0), Some(Element::Signed(-1)));
    /// assert_eq!(item.get(2), None);
    /// # Ok::<(), secs2_item::Secs2Error>(())
    /// ```
    pub fn get(&self, index: usize) -> Option<Element<'_>> {
        match &self.payload {
            Payload::List(v) => v.get(index).map(Element::Item),
            Payload::Boolean(v) => v.get(index).copied().map(Element::Bool),
            Payload::Ascii(s) => s.chars().nth(index).map(Element::Char),
            Payload::Binary(v) => v.get(index).copied().map(Element::Byte),
            Payload::Signed(v) => v.get(index).copied().map(Element::Signed),
            Payload::Unsigned(v) => v.get(index).copied().map(Element::Unsigned),
            Payload::Float(v) => v.get(index).copied().map(Element::Float),
        }
    }

    /// Iterates over the children or elements.
    pub fn iter(&self) -> Elements<'_> {
        let inner = match &self.payload {
            Payload::List(v) => ElementsInner::List(v.iter()),
            Payload::Boolean(v) => ElementsInner::Boolean(v.iter()),
            Payload::Ascii(s) => ElementsInner::Ascii(s.chars()),
            Payload::Binary(v) => ElementsInner::Binary(v.iter()),
            Payload::Signed(v) => ElementsInner::Signed(v.iter()),
            Payload::Unsigned(v) => ElementsInner::Unsigned(v.iter()),
            Payload::Float(v) => ElementsInner::Float(v.iter()),
        };
        Elements { inner }
    }

    /// Returns the children of an `L` item.
    pub fn as_list(&self) -> Option<&[Item]> {
        match &self.payload {
            Payload::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements of a `BOOLEAN` item.
    pub fn as_bools(&self) -> Option<&[bool]> {
        match &self.payload {
            Payload::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the text of an `A` item.
    pub fn as_ascii(&self) -> Option<&str> {
        match &self.payload {
            Payload::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the bytes of a `B` item.
    pub fn as_binary(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements of a signed integer item.
    pub fn as_signed(&self) -> Option<&[i64]> {
        match &self.payload {
            Payload::Signed(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements of an unsigned integer item.
    pub fn as_unsigned(&self) -> Option<&[u64]> {
        match &self.payload {
            Payload::Unsigned(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements of a float item.
    pub fn as_floats(&self) -> Option<&[f64]> {
        match &self.payload {
            Payload::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.payload == other.payload
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.debug_string())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sml())
    }
}

impl FromStr for Item {
    type Err = Secs2Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_sml(s)
    }
}

impl TryFrom<&[u8]> for Item {
    type Error = Secs2Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        Self::from_bytes(data)
    }
}

/// One child or element of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element<'a> {
    /// A child of an `L` item.
    Item(&'a Item),
    /// A `BOOLEAN` element.
    Bool(bool),
    /// A character of an `A` item.
    Char(char),
    /// A byte of a `B` item.
    Byte(u8),
    /// A signed integer element.
    Signed(i64),
    /// An unsigned integer element.
    Unsigned(u64),
    /// A float element.
    Float(f64),
}

/// Iterator over the children or elements of an item.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    inner: ElementsInner<'a>,
}

#[derive(Debug, Clone)]
enum ElementsInner<'a> {
    List(std::slice::Iter<'a, Item>),
    Boolean(std::slice::Iter<'a, bool>),
    Ascii(std::str::Chars<'a>),
    Binary(std::slice::Iter<'a, u8>),
    Signed(std::slice::Iter<'a, i64>),
    Unsigned(std::slice::Iter<'a, u64>),
    Float(std::slice::Iter<'a, f64>),
}

impl<'a> Iterator for Elements<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ElementsInner::List(it) => it.next().map(Element::Item),
            ElementsInner::Boolean(it) => it.next().copied().map(Element::Bool),
            ElementsInner::Ascii(it) => it.next().map(Element::Char),
            ElementsInner::Binary(it) => it.next().copied().map(Element::Byte),
            ElementsInner::Signed(it) => it.next().copied().map(Element::Signed),
            ElementsInner::Unsigned(it) => it.next().copied().map(Element::Unsigned),
            ElementsInner::Float(it) => it.next().copied().map(Element::Float),
        }
    }
}

impl<'a> IntoIterator for &'a Item {
    type Item = Element<'a>;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Item {
        Item::create(
            "L",
            vec![
                Value::from(("B", vec![0xFF, 0x01])),
                Value::from(("A", "CCC_DDD")),
                Value::from(("L", vec![Value::from(("BOOLEAN", true))])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_create_unknown_kind_is_invalid_value() {
        let err = Item::create("Q4", 1).unwrap_err();
        assert!(matches!(err, Secs2Error::InvalidValue { .. }));
    }

    #[test]
    fn test_overflow_rejection() {
        assert!(Item::create("U1", 256).is_err());
        assert!(Item::create("I1", -129).is_err());
        assert!(Item::create("I1", 128).is_err());
        assert!(Item::create("U1", 255).is_ok());
        assert!(Item::create("I1", -128).is_ok());
        assert!(Item::create("I1", 127).is_ok());
    }

    #[test]
    fn test_sequence_access() {
        let item = sample();
        assert_eq!(item.len(), 3);
        assert!(!item.is_empty());

        let Some(Element::Item(first)) = item.get(0) else {
            panic!("expected child item");
        };
        assert_eq!(first.kind(), ItemKind::B);
        assert_eq!(first.get(1), Some(Element::Byte(0x01)));

        let kinds: Vec<ItemKind> = item
            .iter()
            .filter_map(|e| match e {
                Element::Item(child) => Some(child.kind()),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![ItemKind::B, ItemKind::A, ItemKind::L]);
    }

    #[test]
    fn test_ascii_access_is_per_character() {
        let item = Item::ascii("ABC");
        assert_eq!(item.len(), 3);
        assert_eq!(item.get(2), Some(Element::Char('C')));
        let chars: Vec<Element<'_>> = (&item).into_iter().collect();
        assert_eq!(chars.len(), 3);
    }

    #[test]
    fn test_typed_views() {
        let item = sample();
        assert!(item.as_list().is_some());
        assert!(item.as_ascii().is_none());
        let list = item.as_list().unwrap();
        assert_eq!(list[1].as_ascii(), Some("CCC_DDD"));
        assert_eq!(list[2].as_list().unwrap()[0].as_bools(), Some(&[true][..]));
    }

    #[test]
    fn test_sml_is_memoized() {
        let item = sample();
        let first = item.to_sml();
        let second = item.to_sml();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_bytes_are_memoized() {
        let item = sample();
        let first = item.to_bytes().unwrap();
        let second = item.to_bytes().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_debug_string() {
        let item = Item::create(
            "L",
            vec![Value::from(("U2", vec![1, 2])), Value::from(("A", "x"))],
        )
        .unwrap();
        assert_eq!(
            item.debug_string(),
            r#"("L", [("U2", [1, 2]), ("A", "x")])"#
        );
        assert_eq!(format!("{item:?}"), item.debug_string());
        assert!(std::ptr::eq(item.debug_string(), item.debug_string()));
    }

    #[test]
    fn test_display_is_sml() {
        let item = Item::create("BOOLEAN", vec![true, false]).unwrap();
        assert_eq!(item.to_string(), "<BOOLEAN [2] TRUE FALSE >");
    }

    #[test]
    fn test_equality_ignores_caches() {
        let a = Item::create("U2", vec![1, 2]).unwrap();
        let b = Item::create("U2", vec![1, 2]).unwrap();
        let _ = a.to_bytes().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Item::create("U4", vec![1, 2]).unwrap());
    }

    #[test]
    fn test_from_str_and_try_from() {
        let item: Item = "<U1 [1] 5 >".parse().unwrap();
        assert_eq!(item.as_unsigned(), Some(&[5u64][..]));

        let bytes: &[u8] = &[0xA5, 0x01, 0x05];
        let decoded = Item::try_from(bytes).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_non_ascii_fails_at_encode_time() {
        let item = Item::ascii("caf\u{e9}");
        assert!(matches!(
            item.to_bytes().unwrap_err(),
            Secs2Error::Encode { .. }
        ));
        // rendering SML still works
        assert_eq!(item.to_sml(), "<A [4] \"caf\u{e9}\" >");
    }

    fn nested_lists(levels: usize) -> Result<Item> {
        let mut item = Item::list(Vec::new())?;
        for _ in 1..levels {
            item = Item::list(vec![item])?;
        }
        Ok(item)
    }

    #[test]
    fn test_deepest_list_round_trips() {
        let deepest = nested_lists(MAX_NESTING_DEPTH).unwrap();

        let from_bytes = Item::from_bytes(deepest.to_bytes().unwrap()).unwrap();
        assert_eq!(from_bytes, deepest);
        let from_sml = Item::from_sml(deepest.to_sml()).unwrap();
        assert_eq!(from_sml, deepest);
    }

    #[test]
    fn test_list_nesting_past_limit_is_invalid() {
        let deepest = nested_lists(MAX_NESTING_DEPTH).unwrap();

        let err = Item::list(vec![deepest.clone()]).unwrap_err();
        assert!(matches!(err, Secs2Error::InvalidValue { .. }));

        let err = Item::new(ItemKind::L, vec![Value::from(deepest)]).unwrap_err();
        assert!(matches!(err, Secs2Error::InvalidValue { .. }));
    }
}
