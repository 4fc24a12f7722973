//! Example: Building an item and converting it both ways
//!
//! Run with: cargo run --example roundtrip
//!
//! This example demonstrates:
//! - Building nested items from raw values
//! - Encoding to the binary wire format and decoding back
//! - Rendering SML and parsing it back
//! - Walking the decoded tree

use secs2_item::utils::format_hex_byte;
use secs2_item::{Element, Item, Value};

fn main() -> secs2_item::Result<()> {
    // =========================================================================
    // Build
    // =========================================================================

    let item = Item::create(
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
            Value::from(("B", vec!["0x01", "0x10"])),
            Value::from(("A", "ABCDEF")),
            Value::from(("U2", vec![1, 2, 3])),
            Value::from(("I2", vec![-100, 200, -300])),
            Value::from(("F4", vec![19.0, -29.0])),
        ],
    )?;

    println!("=== SML ===\n");
    println!("{}", item);

    // =========================================================================
    // Binary
    // =========================================================================

    println!("\n=== Bytes ===\n");

    let bytes = item.to_bytes()?.to_vec();
    let hex: Vec<String> = bytes.iter().map(|&b| format_hex_byte(b)).collect();
    println!("{} bytes: {}", bytes.len(), hex.join(" "));

    let decoded = Item::from_bytes(&bytes)?;
    println!("decoded: {:?}", decoded);

    // =========================================================================
    // SML round trip
    // =========================================================================

    let reparsed = Item::from_sml(decoded.to_sml())?;
    assert_eq!(reparsed.to_bytes()?, &bytes[..]);
    println!("\nSML round trip reproduces the same {} bytes", bytes.len());

    // =========================================================================
    // Walk
    // =========================================================================

    println!("\n=== Children ===\n");

    for (i, element) in reparsed.iter().enumerate() {
        if let Element::Item(child) = element {
            println!("[{}] {} with {} element(s)", i, child.kind(), child.len());
        }
    }

    Ok(())
}
