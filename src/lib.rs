//! # SECS-II Item Library
//!
//! A Rust library for the item data model of the SECS-II equipment
//! communication protocol: building items, and converting them to and from
//! the binary wire format and the SML text notation.
//!
//! This is a **codec-only** library. It has no transport, no message or
//! session layer, and does no I/O. Bytes and SML strings go in and out as
//! complete in-memory values.
//!
//! ## Features
//!
//! - **Immutable items** — validated once at construction, never mutated
//! - **Three-way round trip** — binary ⇄ item ⇄ SML, byte- and token-exact
//! - **Memoized renderings** — SML, bytes and debug text computed at most once
//! - **No panics** — all errors returned as `Result<T, Secs2Error>`
//! - **Thread-safe** — items are `Send + Sync`; the caches initialize once
//!
//! ## Quick Start
//!
//! ```
//! use secs2_item::{Item, Value};
//!
//! fn main() -> secs2_item::Result<()> {
//!     let item = Item::create("L", vec![
//!         Value::from(("U4", vec![100, 200])),
//!         Value::from(("A", "READY")),
//!         Value::from(("BOOLEAN", true)),
//!     ])?;
//!
//!     // Binary wire format
//!     let bytes = item.to_bytes()?.to_vec();
//!     let decoded = Item::from_bytes(&bytes)?;
//!     assert_eq!(decoded, item);
//!
//!     // SML text
//!     let sml = item.to_sml();
//!     let parsed = Item::from_sml(sml)?;
//!     assert_eq!(parsed.to_bytes()?, &bytes[..]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Item Kinds
//!
//! | Kind | Payload | Element size |
//! |------|---------|:------------:|
//! | [`ItemKind::L`] | child items | - |
//! | [`ItemKind::B`] | raw bytes | 1 |
//! | [`ItemKind::Boolean`] | booleans | 1 |
//! | [`ItemKind::A`] | ASCII text | - |
//! | [`ItemKind::I1`] .. [`ItemKind::I8`] | signed integers | 1/2/4/8 |
//! | [`ItemKind::U1`] .. [`ItemKind::U8`] | unsigned integers | 1/2/4/8 |
//! | [`ItemKind::F4`], [`ItemKind::F8`] | IEEE floats | 4/8 |
//!
//! ## Reading Items
//!
//! ```
//! use secs2_item::{Element, Item};
//!
//! let item = Item::from_sml("<L <U1 1 2> <A \"LOT\">>")?;
//! assert_eq!(item.len(), 2);
//!
//! for element in &item {
//!     if let Element::Item(child) = element {
//!         println!("{} has {} elements", child.kind(), child.len());
//!     }
//! }
//!
//! let children = item.as_list().unwrap();
//! assert_eq!(children[0].as_unsigned(), Some(&[1u64, 2][..]));
//! assert_eq!(children[1].as_ascii(), Some("LOT"));
//! # Ok::<(), secs2_item::Secs2Error>(())
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use secs2_item::{Item, Secs2Error};
//!
//! match Item::create("U1", 256) {
//!     Ok(_) => unreachable!(),
//!     Err(Secs2Error::InvalidValue { reason }) => println!("rejected: {reason}"),
//!     Err(e) => println!("Error: {e}"),
//! }
//!
//! match Item::from_bytes(&[0xA5, 0x02, 0x01]) {
//!     Err(Secs2Error::BytesParse { position, reason }) => {
//!         println!("bad buffer at {position}: {reason}");
//!     }
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! ## Configuration
//!
//! SML rendering uses a two-space indent and the host's native line
//! separator. [`SmlConfig`] overrides either:
//!
//! ```
//! use secs2_item::{Item, SmlConfig};
//!
//! let config = SmlConfig::new()
//!     .with_indent("    ")            // Custom indent (default: two spaces)
//!     .with_line_separator("\r\n");   // Custom separator (default: native)
//!
//! let item = Item::list(vec![Item::ascii("X")])?;
//! assert_eq!(item.to_sml_with(&config), "<L [1]\r\n    <A [1] \"X\" >\r\n>");
//! # Ok::<(), secs2_item::Secs2Error>(())
//! ```
//!
//! ## Logging
//!
//! Decoders emit [`tracing`] events: `trace` when a decode starts and
//! `debug` when input is rejected. No subscriber is installed by the library.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod binary;
mod error;
mod header;
mod item;
mod kind;
#[cfg(feature = "serde")]
mod serde_impl;
mod sml;
pub mod utils;
mod value;

// Public re-exports
pub use binary::MAX_NESTING_DEPTH;
pub use error::{Result, Secs2Error};
pub use header::{ItemHeader, MAX_HEADER_SIZE, MAX_ITEM_LENGTH};
pub use item::{Element, Elements, Item, Payload};
pub use kind::{ItemKind, NumericFormat, TAG_MASK};
pub use sml::{SmlConfig, DEFAULT_INDENT, NATIVE_LINE_SEPARATOR};
pub use value::Value;
