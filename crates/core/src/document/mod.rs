//! Document assembly and output.
//!
//! This module contains:
//! - `options` - header version and writer limits (WriterOptions)
//! - `file_id` - trailer /ID generation
//! - `writer` - the document object graph and its save paths (PdfDocument)

pub mod file_id;
pub mod options;
pub mod writer;

pub use file_id::{file_id_array, generate_file_id};
pub use options::{PdfVersion, WriterOptions};
pub use writer::PdfDocument;
