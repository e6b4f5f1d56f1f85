//! Builder pattern for configuring document output and encryption.
//!
//! # Example
//! ```ignore
//! use pdfscribe_core::api::EncryptionBuilder;
//! use pdfscribe_core::security::EncryptMode;
//!
//! let handler = EncryptionBuilder::new()
//!     .user_password("secret")
//!     .mode(EncryptMode::R3)
//!     .key_length(16)
//!     .build()?;
//! ```

use crate::document::{PdfDocument, PdfVersion, WriterOptions};
use crate::error::Result;
use crate::security::{EncryptMode, PaddedPassword, Permissions, StandardSecurityHandler};

/// A builder for a [`StandardSecurityHandler`].
///
/// Passwords are text and are encoded as Latin-1 before padding.
#[derive(Debug, Clone, Default)]
pub struct EncryptionBuilder {
    user_password: Option<String>,
    owner_password: Option<String>,
    permissions: Option<Permissions>,
    mode: EncryptMode,
    key_length: Option<usize>,
}

impl EncryptionBuilder {
    /// Revision 2, empty passwords, all permissions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the password needed to open the document.
    pub fn user_password(mut self, password: &str) -> Self {
        self.user_password = Some(password.to_string());
        self
    }

    /// Sets the owner password.
    ///
    /// When not set, the user password is used for both.
    pub fn owner_password(mut self, password: &str) -> Self {
        self.owner_password = Some(password.to_string());
        self
    }

    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn mode(mut self, mode: EncryptMode) -> Self {
        self.mode = mode;
        self
    }

    /// Key length in bytes. Defaults to the revision's default.
    pub fn key_length(mut self, key_length: usize) -> Self {
        self.key_length = Some(key_length);
        self
    }

    /// Validate the configuration and create the handler.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a key length the revision does not
    /// accept or a password that is not Latin-1.
    pub fn build(self) -> Result<StandardSecurityHandler> {
        let user = match &self.user_password {
            Some(text) => PaddedPassword::from_text(text)?,
            None => PaddedPassword::empty(),
        };
        let owner = match &self.owner_password {
            Some(text) => PaddedPassword::from_text(text)?,
            None => user.clone(),
        };

        let mut handler = StandardSecurityHandler::new();
        handler.set_mode(
            self.mode,
            self.key_length
                .unwrap_or_else(|| self.mode.default_key_length()),
        )?;
        handler.set_user_password_padded(user);
        handler.set_owner_password_padded(owner);
        handler.set_permissions(self.permissions.unwrap_or_default());
        Ok(handler)
    }
}

/// A builder for a [`PdfDocument`].
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    options: WriterOptions,
    encryption: Option<EncryptionBuilder>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header version. Encryption may raise it on build.
    pub fn version(mut self, version: PdfVersion) -> Self {
        self.options.version = version;
        self
    }

    /// Limits the number of entries in one xref section.
    pub fn max_xref_entries(mut self, max_entries: usize) -> Self {
        self.options.max_xref_entries = max_entries;
        self
    }

    /// Encrypts the document on save.
    pub fn encryption(mut self, encryption: EncryptionBuilder) -> Self {
        self.encryption = Some(encryption);
        self
    }

    pub fn build(self) -> Result<PdfDocument> {
        let mut doc = PdfDocument::with_options(self.options);
        if let Some(encryption) = self.encryption {
            doc.set_encryption(encryption.build()?)?;
        }
        Ok(doc)
    }
}
