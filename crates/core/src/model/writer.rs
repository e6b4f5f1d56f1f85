//! Byte sink and object serializer.
//!
//! [`PdfWriter`] wraps any `io::Write` and counts the bytes that pass
//! through it; xref offsets are taken from [`PdfWriter::position`]. Object
//! serialization lives here too so that string and stream payloads can be
//! routed through a per-object key on the way out.

use std::io::{self, Write};

use super::objects::{Dictionary, PdfObject, PdfStream};
use crate::security::ObjectKey;
use crate::{PdfError, Result};

/// Counting byte sink.
#[derive(Debug)]
pub struct PdfWriter<W: Write> {
    inner: W,
    position: u64,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_offset(inner, 0)
    }

    /// Sink whose first byte lands at `offset` in the final file, for
    /// appending an incremental update behind existing content.
    pub fn with_offset(inner: W, offset: u64) -> Self {
        Self {
            inner,
            position: offset,
        }
    }

    /// Number of bytes in the output so far.
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Current position as a value that fits an xref entry.
    pub fn offset(&self) -> Result<u32> {
        u32::try_from(self.position).map_err(|_| PdfError::OffsetOverflow(self.position))
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write_all(data)?;
        Ok(())
    }

    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Serialize `obj`. When `key` is present every string and stream
    /// payload in the value tree is encrypted with it.
    pub fn write_object(&mut self, obj: &PdfObject, key: Option<&ObjectKey>) -> Result<()> {
        match obj {
            PdfObject::Null => self.write_str("null"),
            PdfObject::Bool(b) => self.write_str(if *b { "true" } else { "false" }),
            PdfObject::Int(n) => {
                write!(self, "{n}")?;
                Ok(())
            }
            PdfObject::Real(r) => self.write_str(&format_real(*r)),
            PdfObject::Name(name) => self.write_name(name),
            PdfObject::String(data) => match key {
                Some(key) => self.write_hex(&key.encrypt(data)?),
                None => self.write_literal(data),
            },
            PdfObject::HexString(data) => match key {
                Some(key) => self.write_hex(&key.encrypt(data)?),
                None => self.write_hex(data),
            },
            PdfObject::Array(items) => {
                self.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write_str(" ")?;
                    }
                    self.write_object(item, key)?;
                }
                self.write_str("]")
            }
            PdfObject::Dict(dict) => self.write_dict(dict, key),
            PdfObject::Stream(stream) => self.write_stream(stream, key),
            PdfObject::Reference(r) => {
                write!(self, "{} {} R", r.number, r.generation)?;
                Ok(())
            }
        }
    }

    pub fn write_dict(&mut self, dict: &Dictionary, key: Option<&ObjectKey>) -> Result<()> {
        self.write_str("<<\n")?;
        for (name, value) in dict.iter() {
            self.write_name(name)?;
            self.write_str(" ")?;
            self.write_object(value, key)?;
            self.write_str("\n")?;
        }
        self.write_str(">>")
    }

    fn write_stream(&mut self, stream: &PdfStream, key: Option<&ObjectKey>) -> Result<()> {
        let payload = match key {
            Some(key) => key.encrypt(&stream.data)?,
            None => stream.data.to_vec(),
        };

        let mut dict = stream.dict.clone();
        dict.set("Length", payload.len() as i64);
        self.write_dict(&dict, key)?;

        self.write_str("\nstream\n")?;
        self.write_bytes(&payload)?;
        self.write_str("\nendstream")
    }

    fn write_name(&mut self, name: &str) -> Result<()> {
        let mut out = Vec::with_capacity(name.len() + 1);
        out.push(b'/');
        for &byte in name.as_bytes() {
            if is_regular_name_byte(byte) {
                out.push(byte);
            } else {
                out.extend_from_slice(format!("#{byte:02X}").as_bytes());
            }
        }
        self.write_bytes(&out)
    }

    fn write_literal(&mut self, data: &[u8]) -> Result<()> {
        let mut out = Vec::with_capacity(data.len() + 2);
        out.push(b'(');
        for &byte in data {
            match byte {
                b'\\' | b'(' | b')' => {
                    out.push(b'\\');
                    out.push(byte);
                }
                b'\n' => out.extend_from_slice(b"\\n"),
                b'\r' => out.extend_from_slice(b"\\r"),
                b'\t' => out.extend_from_slice(b"\\t"),
                0x08 => out.extend_from_slice(b"\\b"),
                0x0c => out.extend_from_slice(b"\\f"),
                _ => out.push(byte),
            }
        }
        out.push(b')');
        self.write_bytes(&out)
    }

    fn write_hex(&mut self, data: &[u8]) -> Result<()> {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
        let mut out = Vec::with_capacity(data.len() * 2 + 2);
        out.push(b'<');
        for &byte in data {
            out.push(DIGITS[(byte >> 4) as usize]);
            out.push(DIGITS[(byte & 0x0f) as usize]);
        }
        out.push(b'>');
        self.write_bytes(&out)
    }
}

impl<W: Write> Write for PdfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Characters allowed unescaped inside a name token.
const fn is_regular_name_byte(byte: u8) -> bool {
    matches!(byte, 0x21..=0x7e)
        && !matches!(
            byte,
            b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        )
}

/// Format a real without exponent notation, trimming trailing zeros.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut text = format!("{value:.4}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
