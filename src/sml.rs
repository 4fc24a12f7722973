//! SML text encoding and decoding of items.
//!
//! SML is the bracketed text notation for SECS-II items:
//!
//! ```text
//! <L [2]
//!   <U4 [2] 100 200 >
//!   <A [5] "READY" >
//! >
//! ```
//!
//! # Grammar
//!
//! An item is `'<' KIND ['[' COUNT ']'] VALUES '>'`. Whitespace between
//! tokens is free. `KIND` is matched ignoring case. The bracketed count is
//! skipped and never checked against the values that follow. `VALUES` is:
//!
//! | Kind | Values |
//! |------|--------|
//! | `L` | zero or more nested items |
//! | `BOOLEAN` | `TRUE`, `T`, `FALSE` or `F` tokens |
//! | `A` | quoted strings and `0xNN` escapes, concatenated |
//! | others | decimal or `0x` hex tokens |
//!
//! # Rendering
//!
//! Every kind except `L` renders on one line as
//! `<KIND [count] values >`. `L` renders its count on the opening line, each
//! child on its own line one indent deeper, and the closing `>` on a line of
//! its own. Indent and line separator come from [`SmlConfig`].

use std::fmt::Write as _;

use crate::binary::MAX_NESTING_DEPTH;
use crate::error::{Result, Secs2Error};
use crate::item::{Item, Payload};
use crate::kind::ItemKind;
use crate::utils::format_hex_byte;
use crate::value::{parse_bool_token, Value};

/// Default indentation unit: two spaces.
pub const DEFAULT_INDENT: &str = "  ";

/// The host platform's native line separator.
pub const NATIVE_LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Configuration for rendering SML text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmlConfig {
    /// Indentation added per list nesting level.
    pub indent: String,
    /// Separator placed between lines of a list rendering.
    pub line_separator: String,
}

impl SmlConfig {
    /// Creates the default configuration: two-space indent, native line separator.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::SmlConfig;
    ///
    /// let config = SmlConfig::new();
    /// assert_eq!(config.indent, "  ");
    /// ```
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            line_separator: NATIVE_LINE_SEPARATOR.to_string(),
        }
    }

    /// Sets the indentation unit.
    ///
    /// # Example
    ///
    /// ```
    /// use secs2_item::{Item, SmlConfig};
    ///
    /// let item = Item::list(vec![Item::boolean(vec![true])])?;
    /// let config = SmlConfig::new().with_indent("\t").with_line_separator("\n");
    /// assert_eq!(item.to_sml_with(&config), "<L [1]\n\t<BOOLEAN [1] TRUE >\n>");
    /// # Ok::<(), secs2_item::Secs2Error>(())
    /// ```
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the line separator.
    pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }
}

impl Default for SmlConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders an item as SML text; every kind but `L` fits on one line.
pub(crate) fn render(item: &Item, config: &SmlConfig) -> String {
    let values: Vec<String> = match item.payload() {
        Payload::List(children) => {
            let mut out = String::new();
            write_list(children, config, "", &mut out);
            return out;
        }
        Payload::Boolean(v) => v
            .iter()
            .map(|&b| if b { "TRUE" } else { "FALSE" }.to_string())
            .collect(),
        Payload::Ascii(s) => vec![render_ascii(s)],
        Payload::Binary(v) => v.iter().map(|&b| format_hex_byte(b)).collect(),
        Payload::Signed(v) => v.iter().map(i64::to_string).collect(),
        Payload::Unsigned(v) => v.iter().map(u64::to_string).collect(),
        Payload::Float(v) if item.kind() == ItemKind::F4 => {
            v.iter().map(|&f| format!("{:?}", f as f32)).collect()
        }
        Payload::Float(v) => v.iter().map(|f| format!("{f:?}")).collect(),
    };

    format!(
        "<{} [{}] {} >",
        item.kind(),
        item.len(),
        values.join(" ")
    )
}

fn write_list(children: &[Item], config: &SmlConfig, indent: &str, out: &mut String) {
    let inner = format!("{indent}{}", config.indent);

    let _ = write!(out, "{indent}<L [{}]", children.len());
    for child in children {
        out.push_str(&config.line_separator);
        match child.as_list() {
            Some(grandchildren) => write_list(grandchildren, config, &inner, out),
            None => {
                out.push_str(&inner);
                out.push_str(child.to_sml());
            }
        }
    }
    out.push_str(&config.line_separator);
    out.push_str(indent);
    out.push('>');
}

/// Renders text as quoted runs; `"` and control characters become `0xNN`.
fn render_ascii(text: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut run = String::new();

    for c in text.chars() {
        if c == '"' || c.is_ascii_control() {
            if !run.is_empty() {
                parts.push(format!("\"{run}\""));
                run.clear();
            }
            parts.push(format_hex_byte(c as u8));
        } else {
            run.push(c);
        }
    }
    if !run.is_empty() || parts.is_empty() {
        parts.push(format!("\"{run}\""));
    }

    parts.join(" ")
}

/// Decodes SML text holding exactly one item.
pub(crate) fn decode(text: &str) -> Result<Item> {
    tracing::trace!(length = text.len(), "decoding SML");

    let text = text.trim();
    let mut cursor = SmlCursor::new(text);
    let result = cursor.read_item(0).and_then(|item| {
        if cursor.pos == text.len() {
            Ok(item)
        } else {
            Err(Secs2Error::sml_parse(
                cursor.pos,
                format!("not reach end, end={}, length={}", cursor.pos, text.len()),
            ))
        }
    });

    result.map_err(|e| {
        tracing::debug!(position = cursor.pos, length = text.len(), error = %e, "SML rejected");
        e
    })
}

fn is_whitespace(b: u8) -> bool {
    b <= b' '
}

/// Read position over trimmed SML text.
///
/// Every stop position is an ASCII byte, so slices between stops are
/// always valid `str` boundaries.
struct SmlCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> SmlCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn end_of_input(&self, expected: &str) -> Secs2Error {
        Secs2Error::sml_parse(
            self.pos,
            format!("reached end of input, expected {expected}"),
        )
    }

    /// Skips whitespace and returns the next byte without consuming it.
    fn skip_whitespace(&mut self) -> Result<u8> {
        let bytes = self.text.as_bytes();
        while let Some(&b) = bytes.get(self.pos) {
            if !is_whitespace(b) {
                return Ok(b);
            }
            self.pos += 1;
        }
        Err(self.end_of_input("more input"))
    }

    /// Moves to the next byte from `from` matching `pred` and returns its position.
    fn seek(&mut self, from: usize, expected: &str, pred: impl Fn(u8) -> bool) -> Result<usize> {
        let bytes = self.text.as_bytes();
        match bytes.get(from..).and_then(|rest| rest.iter().position(|&b| pred(b))) {
            Some(offset) => {
                self.pos = from + offset;
                Ok(self.pos)
            }
            None => {
                self.pos = bytes.len();
                Err(self.end_of_input(expected))
            }
        }
    }

    fn read_kind(&mut self) -> Result<ItemKind> {
        self.skip_whitespace()?;
        let start = self.pos;
        let end = self.seek(start + 1, "end of item kind", |b| {
            matches!(b, b'[' | b'"' | b'<' | b'>') || is_whitespace(b)
        })?;
        ItemKind::from_name(&self.text[start..end]).map_err(|e| e.into_sml_parse(start))
    }

    /// Skips an optional `[count]`; the count is not checked.
    fn skip_count(&mut self) -> Result<()> {
        if self.skip_whitespace()? == b'[' {
            let close = self.seek(self.pos + 1, "']'", |b| b == b']')?;
            self.pos = close + 1;
        }
        Ok(())
    }

    fn read_item(&mut self, depth: usize) -> Result<Item> {
        if self.skip_whitespace()? != b'<' {
            return Err(Secs2Error::sml_parse(self.pos, "expected '<'"));
        }
        self.pos += 1;

        let kind = self.read_kind()?;
        self.skip_count()?;

        match kind {
            ItemKind::L => self.read_list(depth),
            ItemKind::Boolean => self.read_booleans(),
            ItemKind::A => self.read_ascii(),
            _ => self.read_tokens(kind),
        }
    }

    fn read_list(&mut self, depth: usize) -> Result<Item> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(Secs2Error::sml_parse(
                self.pos,
                format!("list nesting exceeds {MAX_NESTING_DEPTH}"),
            ));
        }

        let mut children = Vec::new();
        loop {
            match self.skip_whitespace() {
                Ok(b'>') => {
                    self.pos += 1;
                    return Ok(Item::from_parts(ItemKind::L, Payload::List(children)));
                }
                Ok(b'<') => children.push(self.read_item(depth + 1)?),
                Ok(_) => return Err(Secs2Error::sml_parse(self.pos, "not reach LIST end")),
                Err(_) => return Err(self.end_of_input("'>' closing L")),
            }
        }
    }

    fn read_booleans(&mut self) -> Result<Item> {
        let start = self.pos;
        let end = self.seek(start, "'>'", |b| b == b'>')?;

        let text = self.text;
        let mut values = Vec::new();
        for token in text[start..end].split_whitespace() {
            let value = parse_bool_token(token).ok_or_else(|| {
                Secs2Error::sml_parse(
                    start,
                    format!("BOOLEAN requires TRUE or FALSE, got '{token}'"),
                )
            })?;
            values.push(value);
        }

        self.pos = end + 1;
        Ok(Item::boolean(values))
    }

    fn read_ascii(&mut self) -> Result<Item> {
        let mut text = String::new();
        loop {
            match self.skip_whitespace() {
                Ok(b'>') => {
                    self.pos += 1;
                    return Ok(Item::ascii(text));
                }
                Ok(b'"') => {
                    let open = self.pos;
                    let close = self.seek(open + 1, "closing '\"'", |b| b == b'"')?;
                    text.push_str(&self.text[open + 1..close]);
                    self.pos = close + 1;
                }
                Ok(b'0') => text.push(self.read_hex_char()?),
                Ok(_) => return Err(Secs2Error::sml_parse(self.pos, "A value not reach end")),
                Err(_) => return Err(self.end_of_input("'>' closing A")),
            }
        }
    }

    /// Reads a `0xNN` escape inside an `A` value.
    fn read_hex_char(&mut self) -> Result<char> {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        if !matches!(bytes.get(start + 1), Some(b'x' | b'X')) {
            return Err(Secs2Error::sml_parse(start, "A value accepts only 0xNN escapes"));
        }

        let end = self.seek(start + 2, "end of 0xNN escape", |b| {
            matches!(b, b'"' | b'>') || is_whitespace(b)
        })?;
        let digits = &self.text[start + 2..end];

        let byte = match digits.len() {
            1 | 2 => u8::from_str_radix(digits, 16).ok(),
            _ => None,
        }
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            Secs2Error::sml_parse(start, format!("'0x{digits}' is not an ASCII byte"))
        })?;

        Ok(byte as char)
    }

    /// Reads whitespace-separated scalar tokens for `B` and numeric kinds.
    fn read_tokens(&mut self, kind: ItemKind) -> Result<Item> {
        let start = self.pos;
        let end = self.seek(start, "'>'", |b| b == b'>')?;

        let spans = token_spans(&self.text[start..end], start);
        let tokens: Vec<Value> = spans.iter().map(|&(_, token)| Value::from(token)).collect();
        let item = Item::new(kind, Value::Seq(tokens)).map_err(|e| {
            // Report the first token that is invalid on its own.
            let at = spans
                .iter()
                .find(|&&(_, token)| Item::new(kind, token).is_err())
                .map_or(start, |&(at, _)| at);
            e.into_sml_parse(at)
        })?;

        self.pos = end + 1;
        Ok(item)
    }
}

/// Splits `region` on whitespace, pairing each token with its offset
/// counted from `base`.
fn token_spans(region: &str, base: usize) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for token in region.split_whitespace() {
        let at = offset + region[offset..].find(token).unwrap_or(0);
        spans.push((base + at, token));
        offset = at + token.len();
    }
    spans
}
