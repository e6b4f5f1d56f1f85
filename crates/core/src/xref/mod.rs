//! Cross-reference tables: object numbering and the xref/trailer output.
//!
//! This module contains:
//! - `entry` - one free or in-use slot (XrefEntry)
//! - `table` - one section of consecutive object numbers (XrefTable)
//! - `chain` - sections from successive saves, oldest first (XrefChain)

pub mod chain;
pub mod entry;
pub mod table;

pub use chain::XrefChain;
pub use entry::{EntryKind, MAX_GENERATION, XREF_ENTRY_LEN, XrefEntry};
pub use table::{MAX_XREF_ENTRIES, XrefTable};
