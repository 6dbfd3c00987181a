//! Codec for the JVM's "modified UTF-8" string encoding.
//!
//! `CONSTANT_Utf8` payloads are not standard UTF-8. Text is first split into UTF-16 code units,
//! and each unit is encoded on its own:
//!
//! - `U+0001..=U+007F` in one byte
//! - `U+0000` and `U+0080..=U+07FF` in two bytes (so NUL becomes `C0 80`)
//! - everything else, including each half of a surrogate pair, in three bytes
//!
//! Supplementary characters therefore take six bytes instead of four. Class files may also hold
//! payloads that are not text at all, such as the lone surrogate `javac` emits for `"\uD800"`.
//! [`decode`] rejects those, [`decode_lossy`] substitutes `U+FFFD`.

use crate::Result;

/// Returns the number of bytes `text` occupies once encoded.
#[must_use]
pub fn encoded_len(text: &str) -> usize {
    text.encode_utf16().map(unit_len).sum()
}

/// Encodes `text` as modified UTF-8.
#[must_use]
pub fn encode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(text));
    for unit in text.encode_utf16() {
        match unit_len(unit) {
            1 => out.push(unit as u8),
            2 => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

/// Decodes a modified UTF-8 byte sequence.
///
/// A raw `0x00` byte is accepted as `U+0000`, matching what the JVM's own reader does, and so
/// are overlong forms.
///
/// # Errors
/// Returns [`crate::Error::MalformedRecord`] for invalid lead or continuation bytes, sequences
/// cut short by the end of the input, and unpaired surrogates.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let (unit, width) = decode_unit(bytes, pos)?;
        units.push(unit);
        pos += width;
    }

    String::from_utf16(&units)
        .map_err(|_| malformed_error!("Modified UTF-8 payload contains an unpaired surrogate"))
}

/// Decodes a modified UTF-8 byte sequence, replacing anything that is not text with `U+FFFD`.
///
/// Each invalid byte and each unpaired surrogate yields one replacement character.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut units = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        match decode_unit(bytes, pos) {
            Ok((unit, width)) => {
                units.push(unit);
                pos += width;
            }
            Err(_) => {
                units.push(0xFFFD);
                pos += 1;
            }
        }
    }

    String::from_utf16_lossy(&units)
}

/// Decodes the UTF-16 code unit starting at `pos`, returning it with its encoded width.
fn decode_unit(bytes: &[u8], pos: usize) -> Result<(u16, usize)> {
    let lead = bytes[pos];
    match lead {
        0x00..=0x7F => Ok((u16::from(lead), 1)),
        0xC0..=0xDF => {
            let b2 = continuation(bytes, pos, 1)?;
            Ok(((u16::from(lead & 0x1F) << 6) | b2, 2))
        }
        0xE0..=0xEF => {
            let b2 = continuation(bytes, pos, 1)?;
            let b3 = continuation(bytes, pos, 2)?;
            Ok(((u16::from(lead & 0x0F) << 12) | (b2 << 6) | b3, 3))
        }
        _ => Err(malformed_error!(
            "Invalid modified UTF-8 lead byte {:#04x} at position {}",
            lead,
            pos
        )),
    }
}

fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        _ => 3,
    }
}

fn continuation(bytes: &[u8], lead_pos: usize, nth: usize) -> Result<u16> {
    match bytes.get(lead_pos + nth) {
        Some(byte) if byte & 0xC0 == 0x80 => Ok(u16::from(byte & 0x3F)),
        Some(byte) => Err(malformed_error!(
            "Invalid modified UTF-8 continuation byte {:#04x} at position {}",
            byte,
            lead_pos + nth
        )),
        None => Err(malformed_error!(
            "Modified UTF-8 sequence at position {} is cut short",
            lead_pos
        )),
    }
}
