//! Scalar token parsing and range helpers.
//!
//! These helpers are shared by item construction and the SML decoder, so a
//! token such as `0x1F` or `-42` is read the same way whichever path it
//! arrives through.
//!
//! # Example
//!
//! ```
//! use secs2_item::utils::{int_range, parse_int_token, check_int_range};
//!
//! assert_eq!(parse_int_token("0x1F").unwrap(), 31);
//! assert_eq!(parse_int_token("-42").unwrap(), -42);
//!
//! assert_eq!(int_range(1, true), (-128, 127));
//! assert!(check_int_range(256, 1, false).is_err());
//! ```

use crate::error::{Result, Secs2Error};

/// Returns the inclusive `(min, max)` range of an integer `width` bytes wide.
///
/// # Example
///
/// ```
/// use secs2_item::utils::int_range;
///
/// assert_eq!(int_range(1, false), (0, 255));
/// assert_eq!(int_range(4, false), (0, 4_294_967_295));
/// assert_eq!(int_range(8, true), (i64::MIN as i128, i64::MAX as i128));
/// ```
pub fn int_range(width: usize, signed: bool) -> (i128, i128) {
    let bits = width as u32 * 8;
    if signed {
        let half = 1i128 << (bits - 1);
        (-half, half - 1)
    } else {
        (0, (1i128 << bits) - 1)
    }
}

/// Parses an integer token; a `0x`/`0X` prefix selects hexadecimal.
///
/// # Errors
///
/// Returns `Secs2Error::InvalidValue` if the token is not a valid integer.
pub fn parse_int_token(token: &str) -> Result<i128> {
    let token = token.trim();
    let parsed = match token.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => {
            i128::from_str_radix(&token[2..], 16)
        }
        _ => token.parse::<i128>(),
    };
    parsed.map_err(|_| Secs2Error::invalid_value(format!("'{token}' is not an integer")))
}

/// Checks that `value` fits an integer `width` bytes wide.
///
/// # Errors
///
/// Returns `Secs2Error::InvalidValue` naming the allowed range and the value.
pub fn check_int_range(value: i128, width: usize, signed: bool) -> Result<i128> {
    let (min, max) = int_range(width, signed);
    if value < min || value > max {
        return Err(Secs2Error::invalid_value(format!(
            "value is from {min} to {max}, value is {value}"
        )));
    }
    Ok(value)
}

/// Parses an integer token and range-checks it in one step.
///
/// # Example
///
/// ```
/// use secs2_item::utils::parse_ranged_int;
///
/// assert_eq!(parse_ranged_int("0xFF", 1, false).unwrap(), 255);
/// assert!(parse_ranged_int("128", 1, true).is_err());
/// ```
pub fn parse_ranged_int(token: &str, width: usize, signed: bool) -> Result<i128> {
    check_int_range(parse_int_token(token)?, width, signed)
}

/// Parses a floating-point token.
///
/// # Errors
///
/// Returns `Secs2Error::InvalidValue` if the token is not a valid float.
pub fn parse_float_token(token: &str) -> Result<f64> {
    let token = token.trim();
    token
        .parse::<f64>()
        .map_err(|_| Secs2Error::invalid_value(format!("'{token}' is not a float")))
}

/// Formats a byte as `0xHH` with uppercase hex digits.
///
/// # Example
///
/// ```
/// use secs2_item::utils::format_hex_byte;
///
/// assert_eq!(format_hex_byte(0x0A), "0x0A");
/// ```
pub fn format_hex_byte(value: u8) -> String {
    format!("0x{value:02X}")
}
