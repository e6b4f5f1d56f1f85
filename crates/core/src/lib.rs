//! pdfscribe - PDF object graph writer with cross-reference tables and
//! Standard Security Handler encryption.

pub mod api;
pub mod codec;
pub mod document;
pub mod error;
pub mod model;
pub mod security;
pub mod xref;

pub use api::{DocumentBuilder, EncryptionBuilder};
pub use document::{PdfDocument, PdfVersion, WriterOptions};
pub use error::{PdfError, Result};
pub use model::{Dictionary, ObjectRef, PdfObject, PdfStream};
pub use security::{EncryptMode, Permissions, StandardSecurityHandler};
pub use xref::{XrefChain, XrefEntry, XrefTable};
