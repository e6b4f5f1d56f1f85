//! Password normalization for the Standard Security Handler.

use crate::{PdfError, Result};

/// Length of a padded password.
pub const PASSWORD_LEN: usize = 32;

/// Padding string appended to every password before hashing.
pub const PASSWORD_PADDING: [u8; PASSWORD_LEN] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Truncate or pad `password` to exactly 32 bytes.
pub fn pad_password(password: &[u8]) -> [u8; PASSWORD_LEN] {
    let mut padded = [0u8; PASSWORD_LEN];
    let len = password.len().min(PASSWORD_LEN);
    padded[..len].copy_from_slice(&password[..len]);
    padded[len..].copy_from_slice(&PASSWORD_PADDING[..PASSWORD_LEN - len]);
    padded
}

/// Encode `text` as Latin-1, the encoding PDF passwords are hashed in.
pub fn latin1_bytes(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                PdfError::InvalidArgument(format!(
                    "password character {c:?} is not representable in Latin-1"
                ))
            })
        })
        .collect()
}

/// A password already normalized to 32 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PaddedPassword([u8; PASSWORD_LEN]);

impl PaddedPassword {
    pub fn new(password: &[u8]) -> Self {
        Self(pad_password(password))
    }

    /// Pad a text password after Latin-1 encoding.
    pub fn from_text(password: &str) -> Result<Self> {
        Ok(Self::new(&latin1_bytes(password)?))
    }

    /// The empty password, which pads to the padding constant itself.
    pub const fn empty() -> Self {
        Self(PASSWORD_PADDING)
    }

    pub const fn as_bytes(&self) -> &[u8; PASSWORD_LEN] {
        &self.0
    }
}

impl Default for PaddedPassword {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for PaddedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PaddedPassword(..)")
    }
}
