//! Raw construction input for items.
//!
//! [`Value`] is what [`Item::new`](crate::Item::new) and
//! [`Item::create`](crate::Item::create) accept. It is deliberately loose: a
//! scalar, a sequence, text, bytes, a pre-built item, or a `(kind, value)`
//! pair. Construction coerces it into the payload the item kind requires and
//! rejects shapes that do not fit.
//!
//! # Example
//!
//! ```
//! use secs2_item::{Item, Value};
//!
//! // Scalars become one-element sequences
//! let item = Item::create("U2", 7)?;
//! assert_eq!(item.as_unsigned(), Some(&[7u64][..]));
//!
//! // Lists take (kind, value) pairs or pre-built items
//! let list = Item::create("L", vec![
//!     Value::from(("A", "LOT-1")),
//!     Value::from(Item::create("BOOLEAN", true)?),
//! ])?;
//! assert_eq!(list.len(), 2);
//! # Ok::<(), secs2_item::Secs2Error>(())
//! ```

use crate::error::{Result, Secs2Error};
use crate::item::{Item, Payload};
use crate::kind::{ItemKind, NumericFormat};
use crate::utils::{check_int_range, parse_float_token, parse_ranged_int};

/// Loosely-typed input accepted by item construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i128),
    /// A floating-point scalar.
    Float(f64),
    /// Text; for numeric kinds this is a token, `0x` prefix for hex.
    Text(String),
    /// A raw byte string.
    Bytes(Vec<u8>),
    /// A sequence of values.
    Seq(Vec<Value>),
    /// A pre-built item, only meaningful inside an `L` sequence.
    Item(Item),
    /// A `(kind name, value)` pair, only meaningful inside an `L` sequence.
    Pair(String, Box<Value>),
}

impl Value {
    /// Creates a byte string value.
    ///
    /// `Vec<u8>` converts to a sequence of integers through `From`, which
    /// `B` also accepts; this constructor keeps the bytes as one value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    /// Returns a short name of the value's shape, for error messages.
    fn shape(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Seq(_) => "sequence",
            Value::Item(_) => "item",
            Value::Pair(..) => "pair",
        }
    }

    /// Splits a value into its elements; scalars become one element.
    fn into_elements(self) -> Vec<Value> {
        match self {
            Value::Seq(values) => values,
            Value::Bytes(bytes) => bytes.into_iter().map(|b| Value::Int(b as i128)).collect(),
            scalar => vec![scalar],
        }
    }
}

/// Coerces `value` into the payload for `kind`.
pub(crate) fn coerce(kind: ItemKind, value: Value) -> Result<Payload> {
    match kind {
        ItemKind::L => coerce_list(value).map(Payload::List),
        ItemKind::Boolean => value
            .into_elements()
            .into_iter()
            .map(coerce_bool)
            .collect::<Result<Vec<_>>>()
            .map(Payload::Boolean),
        ItemKind::A => coerce_text(value).map(Payload::Ascii),
        ItemKind::B => match value {
            Value::Bytes(bytes) => Ok(Payload::Binary(bytes)),
            other => other
                .into_elements()
                .into_iter()
                .map(|v| coerce_int(v, 1, false).map(|n| n as u8))
                .collect::<Result<Vec<_>>>()
                .map(Payload::Binary),
        },
        _ => coerce_numeric(kind, value),
    }
}

fn coerce_list(value: Value) -> Result<Vec<Item>> {
    let Value::Seq(values) = value else {
        return Err(Secs2Error::invalid_value(format!(
            "L value requires a sequence, got {}",
            value.shape()
        )));
    };

    values
        .into_iter()
        .map(|child| match child {
            Value::Item(item) => Ok(item),
            Value::Pair(name, inner) => Item::create(&name, *inner),
            Value::Seq(mut pair) if pair.len() == 2 => {
                let inner = pair.pop().unwrap_or(Value::Seq(Vec::new()));
                match pair.pop() {
                    Some(Value::Text(name)) => Item::create(&name, inner),
                    _ => Err(Secs2Error::invalid_value(
                        "L pair requires a kind name as its first element",
                    )),
                }
            }
            other => Err(Secs2Error::invalid_value(format!(
                "L element requires an item or a (kind, value) pair, got {}",
                other.shape()
            ))),
        })
        .collect()
}

fn coerce_bool(value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Int(n) => Ok(n != 0),
        Value::Float(f) => Ok(f != 0.0),
        Value::Text(token) => parse_bool_token(&token).ok_or_else(|| {
            Secs2Error::invalid_value(format!(
                "BOOLEAN requires TRUE or FALSE, got '{token}'"
            ))
        }),
        other => Err(Secs2Error::invalid_value(format!(
            "BOOLEAN element cannot be a {}",
            other.shape()
        ))),
    }
}

/// Parses `TRUE`/`T`/`FALSE`/`F`, ignoring ASCII case.
pub(crate) fn parse_bool_token(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("TRUE") || token.eq_ignore_ascii_case("T") {
        Some(true)
    } else if token.eq_ignore_ascii_case("FALSE") || token.eq_ignore_ascii_case("F") {
        Some(false)
    } else {
        None
    }
}

fn coerce_text(value: Value) -> Result<String> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) => Ok(format!("{f:?}")),
        Value::Bool(b) => Ok(if b { "True" } else { "False" }.to_string()),
        other => Err(Secs2Error::invalid_value(format!(
            "A value cannot be a {}",
            other.shape()
        ))),
    }
}

fn coerce_int(value: Value, width: usize, signed: bool) -> Result<i128> {
    match value {
        Value::Int(n) => check_int_range(n, width, signed),
        Value::Bool(b) => check_int_range(b as i128, width, signed),
        Value::Text(token) => parse_ranged_int(&token, width, signed),
        Value::Float(f) if f.is_finite() => check_int_range(f.trunc() as i128, width, signed),
        Value::Float(f) => Err(Secs2Error::invalid_value(format!(
            "{f} cannot be converted to an integer"
        ))),
        other => Err(Secs2Error::invalid_value(format!(
            "integer element cannot be a {}",
            other.shape()
        ))),
    }
}

fn coerce_float(value: Value) -> Result<f64> {
    match value {
        Value::Float(f) => Ok(f),
        Value::Int(n) => Ok(n as f64),
        Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        Value::Text(token) => parse_float_token(&token),
        other => Err(Secs2Error::invalid_value(format!(
            "float element cannot be a {}",
            other.shape()
        ))),
    }
}

fn coerce_numeric(kind: ItemKind, value: Value) -> Result<Payload> {
    let elements = value.into_elements();
    let width = kind.element_size().unwrap_or(1);

    match kind.numeric_format() {
        Some(NumericFormat::Signed) => elements
            .into_iter()
            .map(|v| coerce_int(v, width, true).map(|n| n as i64))
            .collect::<Result<Vec<_>>>()
            .map(Payload::Signed),
        Some(NumericFormat::Unsigned) => elements
            .into_iter()
            .map(|v| coerce_int(v, width, false).map(|n| n as u64))
            .collect::<Result<Vec<_>>>()
            .map(Payload::Unsigned),
        // F4 elements are always exactly representable as f32.
        Some(NumericFormat::Float) if kind == ItemKind::F4 => elements
            .into_iter()
            .map(|v| coerce_float(v).map(|f| f as f32 as f64))
            .collect::<Result<Vec<_>>>()
            .map(Payload::Float),
        Some(NumericFormat::Float) => elements
            .into_iter()
            .map(coerce_float)
            .collect::<Result<Vec<_>>>()
            .map(Payload::Float),
        None => Err(Secs2Error::invalid_value(format!(
            "{kind} is not a numeric kind"
        ))),
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(v as i128)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, usize, isize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Item> for Value {
    fn from(v: Item) -> Self {
        Value::Item(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> From<(&str, V)> for Value {
    fn from((name, value): (&str, V)) -> Self {
        Value::Pair(name.to_string(), Box::new(value.into()))
    }
}

impl<V: Into<Value>> From<(ItemKind, V)> for Value {
    fn from((kind, value): (ItemKind, V)) -> Self {
        Value::Pair(kind.name().to_string(), Box::new(value.into()))
    }
}
