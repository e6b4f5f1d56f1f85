//! One cross-reference section.

use std::io::Write;

use tracing::{debug, trace};

use super::entry::XrefEntry;
use crate::model::{Dictionary, ObjectRef, PdfObject, PdfWriter};
use crate::security::ObjectCipher;
use crate::{PdfError, Result};

/// Most entries a single section may hold (2^23 - 1).
pub const MAX_XREF_ENTRIES: usize = 8_388_607;

/// A contiguous run of object numbers `[start_offset, start_offset + len)`
/// together with the trailer written after it.
#[derive(Debug, Clone)]
pub struct XrefTable {
    start_offset: u32,
    entries: Vec<XrefEntry>,
    /// Byte offset of this section's `xref` keyword, once written.
    address: Option<u32>,
    trailer: Dictionary,
    max_entries: usize,
}

impl XrefTable {
    /// Section starting at object `start_offset`. A section starting at 0
    /// carries the free-list sentinel as its first entry.
    pub fn new(start_offset: u32) -> Self {
        Self::with_capacity_limit(start_offset, MAX_XREF_ENTRIES)
    }

    /// Like [`XrefTable::new`] with a lower entry limit. Limits above
    /// [`MAX_XREF_ENTRIES`] are clamped.
    pub fn with_capacity_limit(start_offset: u32, max_entries: usize) -> Self {
        let mut entries = Vec::new();
        if start_offset == 0 {
            entries.push(XrefEntry::free_sentinel());
        }
        Self {
            start_offset,
            entries,
            address: None,
            trailer: Dictionary::new(),
            max_entries: max_entries.min(MAX_XREF_ENTRIES),
        }
    }

    /// Register `object` and assign it the next object number with
    /// generation 0. On error the table is left untouched.
    ///
    /// The number after the assigned one must also fit in a `u32`, since
    /// it becomes the trailer /Size and the start of the next section.
    pub fn add(&mut self, object: PdfObject) -> Result<ObjectRef> {
        let exceeded = PdfError::CapacityExceeded {
            limit: self.max_entries,
        };
        if self.entries.len() >= self.max_entries {
            return Err(exceeded);
        }
        let number = u32::try_from(self.entries.len())
            .ok()
            .and_then(|len| self.start_offset.checked_add(len))
            .filter(|number| number.checked_add(1).is_some())
            .ok_or(exceeded)?;

        let entry = XrefEntry::in_use(object);
        let generation = entry.generation();
        self.entries.push(entry);
        Ok(ObjectRef::new(number, generation))
    }

    /// Entry at `index` within this section.
    pub fn entry(&self, index: usize) -> Result<&XrefEntry> {
        self.entries.get(index).ok_or_else(|| {
            PdfError::InvalidArgument(format!(
                "xref index {index} out of range (section has {} entries)",
                self.entries.len()
            ))
        })
    }

    /// Entry for object `number`, if it falls inside this section.
    pub fn find(&self, number: u32) -> Option<&XrefEntry> {
        self.index_of(number).map(|index| &self.entries[index])
    }

    pub fn find_mut(&mut self, number: u32) -> Option<&mut XrefEntry> {
        self.index_of(number).map(|index| &mut self.entries[index])
    }

    fn index_of(&self, number: u32) -> Option<usize> {
        let index = number.checked_sub(self.start_offset)? as usize;
        (index < self.entries.len()).then_some(index)
    }

    pub const fn start_offset(&self) -> u32 {
        self.start_offset
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// First object number past this section. [`XrefTable::add`] keeps
    /// this within `u32`.
    pub fn next_object_number(&self) -> u32 {
        self.start_offset + self.entries.len() as u32
    }

    pub fn entries(&self) -> &[XrefEntry] {
        &self.entries
    }

    /// Byte offset of the `xref` keyword from the most recent write.
    pub const fn address(&self) -> Option<u32> {
        self.address
    }

    pub const fn trailer(&self) -> &Dictionary {
        &self.trailer
    }

    pub const fn trailer_mut(&mut self) -> &mut Dictionary {
        &mut self.trailer
    }

    /// Write this section alone: objects, xref section, trailer.
    ///
    /// Returns the section address.
    pub fn write_to<W: Write>(
        &mut self,
        out: &mut PdfWriter<W>,
        cipher: Option<&dyn ObjectCipher>,
    ) -> Result<u32> {
        self.write_objects(out, cipher)?;
        let address = self.write_section(out)?;
        self.write_trailer(out, None)?;
        Ok(address)
    }

    /// Emit every in-use object, recording its byte offset.
    pub(crate) fn write_objects<W: Write>(
        &mut self,
        out: &mut PdfWriter<W>,
        cipher: Option<&dyn ObjectCipher>,
    ) -> Result<()> {
        let start = self.start_offset;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.is_free() {
                continue;
            }
            let id = ObjectRef::new(start + index as u32, entry.generation());
            let offset = out.offset()?;
            entry.set_byte_offset(offset);

            writeln!(out, "{} {} obj", id.number, id.generation)?;
            // Key is derived right before this object's payloads are ciphered.
            let key = match cipher {
                Some(cipher) => cipher.object_key(id)?,
                None => None,
            };
            if let Some(object) = entry.object() {
                out.write_object(object, key.as_ref())?;
            }
            out.write_str("\nendobj\n")?;
            trace!(object = id.number, offset, "wrote object");
        }
        Ok(())
    }

    /// Emit `xref`, the subsection header and all entry lines.
    pub(crate) fn write_section<W: Write>(&mut self, out: &mut PdfWriter<W>) -> Result<u32> {
        let address = out.offset()?;
        self.address = Some(address);

        writeln!(out, "xref\n{} {}", self.start_offset, self.entries.len())?;
        for entry in &self.entries {
            entry.write_to(out)?;
        }
        debug!(
            start_offset = self.start_offset,
            entries = self.entries.len(),
            address,
            "wrote xref section"
        );
        Ok(address)
    }

    /// Emit the trailer. `prev` is the address of the preceding section.
    pub(crate) fn write_trailer<W: Write>(
        &mut self,
        out: &mut PdfWriter<W>,
        prev: Option<u32>,
    ) -> Result<()> {
        let address = self.address.ok_or(PdfError::SectionNotWritten {
            start_offset: self.start_offset,
        })?;

        self.trailer.set("Size", i64::from(self.next_object_number()));
        if let Some(prev) = prev {
            self.trailer.set("Prev", i64::from(prev));
        }

        out.write_str("trailer\n")?;
        out.write_dict(&self.trailer, None)?;
        writeln!(out, "\nstartxref\n{address}\n%%EOF")?;
        Ok(())
    }
}
