//! # `CONSTANT_Utf8`
//!
//! Text records referenced by name, descriptor and literal constants. On disk the payload is a
//! `u16` byte length followed by modified UTF-8 (see [`crate::file::mutf8`]).
//!
//! A decoded record keeps its payload bytes as read, so dumping it reproduces non-canonical
//! forms and payloads that are not text at all. The text is checked when it is asked for.
use std::{borrow::Cow, fmt, io::Write};

use crate::{
    constants::{constant_conversions, Constant, ConstantTag, ConstantVisitor, PoolEntry},
    file::{io::write_be, mutf8, parser::Parser},
    Result,
};

/// A `CONSTANT_Utf8` record.
///
/// The payload is immutable once constructed; only index fields of other kinds are mutable.
/// Equality compares payload bytes, so two spellings of the same text are distinct records.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstantUtf8 {
    bytes: Vec<u8>,
    /// `None` when `bytes` does not decode to text
    text: Option<String>,
}

impl ConstantUtf8 {
    /// Creates a record from text, encoded in canonical modified UTF-8.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedRecord`] if the modified UTF-8 encoding of `value` is
    /// longer than 65535 bytes.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let encoded = mutf8::encoded_len(&value);
        if encoded > usize::from(u16::MAX) {
            return Err(malformed_error!(
                "CONSTANT_Utf8 payload of {} bytes exceeds the 16-bit length field",
                encoded
            ));
        }

        Ok(ConstantUtf8 {
            bytes: mutf8::encode(&value),
            text: Some(value),
        })
    }

    /// Creates a record from a raw modified UTF-8 payload, exactly as it would appear on disk.
    ///
    /// The payload is not required to decode; see [`ConstantUtf8::value`].
    ///
    /// ```rust
    /// use classpool::ConstantUtf8;
    ///
    /// let lone = ConstantUtf8::from_bytes([0xED, 0xA0, 0x80])?;
    /// assert!(lone.value().is_err());
    /// assert_eq!(lone.to_string_lossy(), "\u{FFFD}");
    /// # Ok::<(), classpool::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedRecord`] if the payload is longer than 65535 bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() > usize::from(u16::MAX) {
            return Err(malformed_error!(
                "CONSTANT_Utf8 payload of {} bytes exceeds the 16-bit length field",
                bytes.len()
            ));
        }

        Ok(ConstantUtf8 {
            text: mutf8::decode(&bytes).ok(),
            bytes,
        })
    }

    /// The payload as stored, without the length prefix.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The decoded text.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedRecord`] if the payload is not valid modified UTF-8,
    /// for example when it holds an unpaired surrogate.
    pub fn value(&self) -> Result<&str> {
        self.text.as_deref().ok_or_else(|| {
            malformed_error!(
                "CONSTANT_Utf8 payload \"{}\" is not valid modified UTF-8",
                mutf8::decode_lossy(&self.bytes)
            )
        })
    }

    /// The decoded text, with `U+FFFD` in place of anything that does not decode.
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        match &self.text {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(mutf8::decode_lossy(&self.bytes)),
        }
    }
}

impl PoolEntry for ConstantUtf8 {
    const TAG: ConstantTag = ConstantTag::Utf8;

    fn read_fields(parser: &mut Parser) -> Result<Self> {
        let length = parser.read_be::<u16>()?;
        let bytes = parser.read_bytes(usize::from(length))?;

        ConstantUtf8::from_bytes(bytes)
    }

    fn write_fields<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        // Length was checked at construction
        #[allow(clippy::cast_possible_truncation)]
        write_be(out, self.bytes.len() as u16)?;
        out.write_all(&self.bytes)?;
        Ok(())
    }

    fn fields_size(&self) -> usize {
        2 + self.bytes.len()
    }

    fn from_constant(constant: &Constant) -> Option<&Self> {
        match constant {
            Constant::Utf8(entry) => Some(entry),
            _ => None,
        }
    }

    fn from_constant_mut(constant: &mut Constant) -> Option<&mut Self> {
        match constant {
            Constant::Utf8(entry) => Some(entry),
            _ => None,
        }
    }

    fn accept<V: ConstantVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_utf8(self);
    }
}

constant_conversions!(ConstantUtf8, Utf8);

impl fmt::Display for ConstantUtf8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}](\"{}\")",
            Self::TAG,
            Self::TAG.value(),
            self.to_string_lossy().replace('\n', "\\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn crafted() {
        let data = [0x00, 0x06, b'<', b'i', b'n', b'i', b't', b'>'];
        let mut parser = Parser::new(&data);
        let utf8 = ConstantUtf8::read_fields(&mut parser).unwrap();

        assert_eq!(utf8.value().unwrap(), "<init>");
        assert_eq!(utf8.encoded_len(), 9);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn dump_writes_tag_and_length() {
        let mut out = Vec::new();
        ConstantUtf8::new("a\0").unwrap().dump(&mut out).unwrap();
        assert_eq!(out, [0x01, 0x00, 0x03, b'a', 0xC0, 0x80]);
    }

    #[test]
    fn truncated_payload() {
        let data = [0x00, 0x04, b'a', b'b'];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            ConstantUtf8::read_fields(&mut parser),
            Err(Error::TruncatedInput { needed: 4, .. })
        ));
    }

    #[test]
    fn too_long() {
        let text = "x".repeat(usize::from(u16::MAX) + 1);
        assert!(matches!(
            ConstantUtf8::new(text),
            Err(Error::MalformedRecord { .. })
        ));

        let max = "x".repeat(usize::from(u16::MAX));
        assert!(ConstantUtf8::new(max).is_ok());
    }

    #[test]
    fn keeps_payload_bytes() {
        // Overlong 'A', then a raw NUL
        let data = [0x00, 0x03, 0xC1, 0x81, 0x00];
        let mut parser = Parser::new(&data);
        let utf8 = ConstantUtf8::read_fields(&mut parser).unwrap();

        assert_eq!(utf8.value().unwrap(), "A\0");
        assert_eq!(utf8.bytes(), [0xC1, 0x81, 0x00]);
        assert_ne!(utf8, ConstantUtf8::new("A\0").unwrap());

        let mut out = Vec::new();
        utf8.dump(&mut out).unwrap();
        assert_eq!(out[0], 0x01);
        assert_eq!(out[1..], data);
    }

    #[test]
    fn unpaired_surrogate_decodes() {
        let data = [0x00, 0x03, 0xED, 0xA0, 0x80];
        let mut parser = Parser::new(&data);
        let utf8 = ConstantUtf8::read_fields(&mut parser).unwrap();

        assert!(matches!(utf8.value(), Err(Error::MalformedRecord { .. })));
        assert_eq!(utf8.to_string_lossy(), "\u{FFFD}");
        assert_eq!(utf8.encoded_len(), 6);
        assert_eq!(utf8.to_string(), "CONSTANT_Utf8[1](\"\u{FFFD}\")");
    }

    #[test]
    fn raw_payload_too_long() {
        let payload = vec![b'x'; usize::from(u16::MAX) + 1];
        assert!(matches!(
            ConstantUtf8::from_bytes(payload),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn display() {
        let utf8 = ConstantUtf8::new("a\nb").unwrap();
        assert_eq!(utf8.to_string(), "CONSTANT_Utf8[1](\"a\\nb\")");
    }
}
