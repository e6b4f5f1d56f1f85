//! Ordered sequence of xref sections, oldest first.
//!
//! The newest section is the one objects are added to. Older sections come
//! from earlier saves; writing walks them oldest to newest so that recorded
//! byte offsets grow monotonically through the output.

use std::io::Write;

use tracing::debug;

use super::entry::XrefEntry;
use super::table::{MAX_XREF_ENTRIES, XrefTable};
use crate::model::{ObjectRef, PdfObject, PdfWriter};
use crate::security::ObjectCipher;
use crate::{PdfError, Result};

#[derive(Debug, Clone)]
pub struct XrefChain {
    history: Vec<XrefTable>,
    current: XrefTable,
}

impl Default for XrefChain {
    fn default() -> Self {
        Self::new()
    }
}

impl XrefChain {
    /// Chain with a single base section starting at object 0.
    pub fn new() -> Self {
        Self::with_capacity_limit(MAX_XREF_ENTRIES)
    }

    /// Chain whose sections hold at most `max_entries` entries each.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self::from_table(XrefTable::with_capacity_limit(0, max_entries))
    }

    pub fn from_table(table: XrefTable) -> Self {
        Self {
            history: Vec::new(),
            current: table,
        }
    }

    /// Start a new section right after the current one and make it current.
    pub fn push_section(&mut self) -> &mut XrefTable {
        let next = XrefTable::with_capacity_limit(
            self.current.next_object_number(),
            self.current.max_entries(),
        );
        self.history.push(std::mem::replace(&mut self.current, next));
        &mut self.current
    }

    /// Append an existing section. Its object range must start at or after
    /// the end of the current section.
    pub fn push_table(&mut self, table: XrefTable) -> Result<()> {
        let end = self.current.next_object_number();
        if table.start_offset() < end {
            return Err(PdfError::InvalidArgument(format!(
                "section starting at {} overlaps objects below {end}",
                table.start_offset()
            )));
        }
        self.history.push(std::mem::replace(&mut self.current, table));
        Ok(())
    }

    pub const fn current(&self) -> &XrefTable {
        &self.current
    }

    pub const fn current_mut(&mut self) -> &mut XrefTable {
        &mut self.current
    }

    /// The section written before the current one.
    pub fn previous(&self) -> Option<&XrefTable> {
        self.history.last()
    }

    /// All sections, oldest first.
    pub fn sections(&self) -> impl Iterator<Item = &XrefTable> {
        self.history.iter().chain(std::iter::once(&self.current))
    }

    fn sections_mut(&mut self) -> impl Iterator<Item = &mut XrefTable> {
        self.history
            .iter_mut()
            .chain(std::iter::once(&mut self.current))
    }

    pub fn section_count(&self) -> usize {
        self.history.len() + 1
    }

    /// Register `object` in the current section.
    pub fn add(&mut self, object: PdfObject) -> Result<ObjectRef> {
        self.current.add(object)
    }

    /// Look `number` up in the current section, then in older ones.
    /// `None` when no section covers it.
    pub fn entry_by_object_id(&self, number: u32) -> Option<&XrefEntry> {
        std::iter::once(&self.current)
            .chain(self.history.iter().rev())
            .find_map(|table| table.find(number))
    }

    fn entry_by_object_id_mut(&mut self, number: u32) -> Option<&mut XrefEntry> {
        if self.current.find(number).is_some() {
            return self.current.find_mut(number);
        }
        self.history
            .iter_mut()
            .rev()
            .find_map(|table| table.find_mut(number))
    }

    /// The value registered under `id`, if the generation matches.
    pub fn object(&self, id: ObjectRef) -> Option<&PdfObject> {
        self.entry_by_object_id(id.number)
            .filter(|entry| entry.generation() == id.generation)
            .and_then(XrefEntry::object)
    }

    pub fn object_mut(&mut self, id: ObjectRef) -> Option<&mut PdfObject> {
        self.entry_by_object_id_mut(id.number)
            .filter(|entry| entry.generation() == id.generation)
            .and_then(XrefEntry::object_mut)
    }

    /// Entries across every section, sentinel included.
    pub fn total_entry_count(&self) -> usize {
        self.sections().map(XrefTable::len).sum()
    }

    /// Write every section: all objects, then all xref sections, then the
    /// current section's trailer.
    ///
    /// Returns the address of the current section.
    pub fn write_to<W: Write>(
        &mut self,
        out: &mut PdfWriter<W>,
        cipher: Option<&dyn ObjectCipher>,
    ) -> Result<u32> {
        debug!(
            sections = self.section_count(),
            position = out.position(),
            "writing xref chain"
        );
        for table in self.sections_mut() {
            table.write_objects(out, cipher)?;
        }
        let mut address = 0;
        for table in self.sections_mut() {
            address = table.write_section(out)?;
        }
        let prev = self.history.last().and_then(XrefTable::address);
        self.current.write_trailer(out, prev)?;
        Ok(address)
    }

    /// Incremental save: write only the current section, chained to the
    /// address the previous section recorded when it was written.
    pub fn write_update<W: Write>(
        &mut self,
        out: &mut PdfWriter<W>,
        cipher: Option<&dyn ObjectCipher>,
    ) -> Result<u32> {
        let prev = match self.history.last() {
            Some(table) => Some(table.address().ok_or(PdfError::SectionNotWritten {
                start_offset: table.start_offset(),
            })?),
            None => None,
        };
        debug!(
            start_offset = self.current.start_offset(),
            prev, "writing incremental update"
        );

        self.current.write_objects(out, cipher)?;
        let address = self.current.write_section(out)?;
        self.current.write_trailer(out, prev)?;
        Ok(address)
    }
}
