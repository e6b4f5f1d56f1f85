//! Output configuration: PDF version and xref limits.

use std::str::FromStr;

use crate::PdfError;
use crate::xref::MAX_XREF_ENTRIES;

/// PDF version written in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PdfVersion {
    V1_2,
    V1_3,
    #[default]
    V1_4,
    V1_5,
    V1_6,
    V1_7,
}

impl PdfVersion {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
            Self::V1_4 => "1.4",
            Self::V1_5 => "1.5",
            Self::V1_6 => "1.6",
            Self::V1_7 => "1.7",
        }
    }

    /// Header line plus the binary comment line that marks the file as
    /// containing 8-bit data.
    pub fn header(self) -> Vec<u8> {
        let mut header = format!("%PDF-{}\n%", self.as_str()).into_bytes();
        header.extend_from_slice(&[0xB7, 0xBE, 0xAD, 0xAA, b'\n']);
        header
    }
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdfVersion {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.2" => Ok(Self::V1_2),
            "1.3" => Ok(Self::V1_3),
            "1.4" => Ok(Self::V1_4),
            "1.5" => Ok(Self::V1_5),
            "1.6" => Ok(Self::V1_6),
            "1.7" => Ok(Self::V1_7),
            other => Err(PdfError::InvalidArgument(format!(
                "unsupported PDF version: {other}"
            ))),
        }
    }
}

/// Options for writing a document.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Header version. Encryption may raise it.
    pub version: PdfVersion,
    /// Entry limit per xref section.
    pub max_xref_entries: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            version: PdfVersion::default(),
            max_xref_entries: MAX_XREF_ENTRIES,
        }
    }
}
