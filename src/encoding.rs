//! JSON text for the `arguments` field of a resolved call.
//!
//! Clients parse the `arguments` string themselves and existing ones expect
//! one exact text layout: `", "` and `": "` separators, and every character
//! above `~` (DEL and all non-ASCII) escaped as a lowercase `\uXXXX` sequence
//! (UTF-16 units).

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// `serde_json` formatter for the spaced, ASCII-only layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiSpacedFormatter;

impl Formatter for AsciiSpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.bytes().all(is_printable_ascii) {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && is_printable_ascii(ch as u8) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Control characters below 0x20 are escaped by `serde_json` before
/// fragments reach the formatter.
fn is_printable_ascii(byte: u8) -> bool {
    byte < 0x7f
}

/// Serialize `value` in the spaced, ASCII-only layout.
pub fn to_wire_json<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(64);
    let mut ser = Serializer::with_formatter(&mut buf, AsciiSpacedFormatter);
    value.serialize(&mut ser)?;

    // Every non-ASCII character was escaped above.
    String::from_utf8(buf).map_err(|e| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
