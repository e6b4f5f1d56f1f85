//! PDF model types - objects and the serializing sink.
//!
//! This module contains:
//! - `objects` - PDF value tree (PdfObject, Dictionary, PdfStream, ObjectRef)
//! - `writer` - Counting byte sink that serializes objects (PdfWriter)

pub mod objects;
pub mod writer;

// Re-export main types for convenience
pub use objects::{Dictionary, ObjectRef, PdfObject, PdfStream};
pub use writer::PdfWriter;
