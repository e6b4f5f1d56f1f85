//! Error types for pdfscribe PDF writing.

use thiserror::Error;

/// Primary error type for PDF writing operations.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("xref table is full: at most {limit} entries per section")]
    CapacityExceeded { limit: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{step} called before the {missing} was created")]
    OrderingViolation {
        step: &'static str,
        missing: &'static str,
    },

    #[error("xref section starting at object {start_offset} has not been written yet")]
    SectionNotWritten { start_offset: u32 },

    #[error("byte offset {0} does not fit in an xref entry")]
    OffsetOverflow(u64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encryption error: {0}")]
    EncryptionError(String),
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;
