//! A single cross-reference slot.

use std::io::Write;

use crate::Result;
use crate::model::{PdfObject, PdfWriter};

/// Generation number of the sentinel free entry (object 0).
pub const MAX_GENERATION: u16 = 65535;

/// Length of one serialized entry line: `dddddddddd ggggg t \r\n`.
pub const XREF_ENTRY_LEN: usize = 21;

/// What occupies a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Free,
    InUse(PdfObject),
}

/// One xref slot: payload, byte offset and generation.
///
/// For in-use entries the offset is recorded when the object is written;
/// free entries keep the next-free object number (always 0 here, since
/// object numbers are never recycled).
#[derive(Debug, Clone, PartialEq)]
pub struct XrefEntry {
    kind: EntryKind,
    byte_offset: u32,
    generation: u16,
}

impl XrefEntry {
    /// The mandatory head of the free list at object number 0.
    pub const fn free_sentinel() -> Self {
        Self {
            kind: EntryKind::Free,
            byte_offset: 0,
            generation: MAX_GENERATION,
        }
    }

    pub const fn in_use(object: PdfObject) -> Self {
        Self {
            kind: EntryKind::InUse(object),
            byte_offset: 0,
            generation: 0,
        }
    }

    pub const fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub const fn is_free(&self) -> bool {
        matches!(self.kind, EntryKind::Free)
    }

    pub const fn object(&self) -> Option<&PdfObject> {
        match &self.kind {
            EntryKind::InUse(object) => Some(object),
            EntryKind::Free => None,
        }
    }

    pub fn object_mut(&mut self) -> Option<&mut PdfObject> {
        match &mut self.kind {
            EntryKind::InUse(object) => Some(object),
            EntryKind::Free => None,
        }
    }

    pub const fn byte_offset(&self) -> u32 {
        self.byte_offset
    }

    pub const fn generation(&self) -> u16 {
        self.generation
    }

    /// `f` for free entries, `n` for in-use ones.
    pub const fn type_char(&self) -> char {
        match self.kind {
            EntryKind::Free => 'f',
            EntryKind::InUse(_) => 'n',
        }
    }

    pub(crate) const fn set_byte_offset(&mut self, offset: u32) {
        self.byte_offset = offset;
    }

    /// The fixed-width table line for this entry.
    pub fn line(&self) -> String {
        format!(
            "{:010} {:05} {} \r\n",
            self.byte_offset,
            self.generation,
            self.type_char()
        )
    }

    pub fn write_to<W: Write>(&self, out: &mut PdfWriter<W>) -> Result<()> {
        out.write_str(&self.line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_line() {
        let entry = XrefEntry::free_sentinel();
        assert_eq!(entry.line(), "0000000000 65535 f \r\n");
        assert_eq!(entry.line().len(), XREF_ENTRY_LEN);
    }

    #[test]
    fn test_in_use_line_width_at_limits() {
        let mut entry = XrefEntry::in_use(PdfObject::Null);
        entry.set_byte_offset(u32::MAX);
        assert_eq!(entry.line(), "4294967295 00000 n \r\n");
        assert_eq!(entry.line().len(), XREF_ENTRY_LEN);
    }
}
