//! Example: Parsing SML text from the command line or stdin
//!
//! Run with: cargo run --example parse_sml -- '<L <U1 1 2> <A "LOT" 0x2D "7">>'
//!
//! With no argument the SML is read from stdin. Prints the canonical SML
//! rendering and the encoded bytes, or the parse error.

use std::io::Read;

use secs2_item::{Item, Secs2Error};

fn main() {
    let input = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("failed to read stdin: {}", e);
                std::process::exit(2);
            }
            buf
        }
    };

    match Item::from_sml(&input) {
        Ok(item) => {
            println!("{}", item);
            match item.to_bytes() {
                Ok(bytes) => println!("{:02X?}", bytes),
                Err(e) => eprintln!("cannot encode: {}", e),
            }
        }
        Err(Secs2Error::SmlParse { position, reason }) => {
            eprintln!("parse error at {}: {}", position, reason);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
