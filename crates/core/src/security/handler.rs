//! Standard Security Handler for writing encrypted documents.
//!
//! Key material is derived in a fixed order:
//! passwords -> owner key (O) -> master key -> user key (U) -> object keys.
//! Each stage is stored as an `Option`; asking for a stage whose
//! prerequisite is missing fails with [`PdfError::OrderingViolation`], and
//! changing any input discards everything derived from it.

use std::ops::RangeInclusive;

use tracing::debug;

use super::keys::{
    ObjectKey, compute_encryption_key, compute_object_key, compute_owner_key, compute_user_key,
};
use super::password::{PASSWORD_LEN, PaddedPassword};
use super::permission::Permissions;
use super::ObjectCipher;
use crate::document::PdfVersion;
use crate::model::ObjectRef;
use crate::{PdfError, Result};

/// Length of the file identifier mixed into the keys.
pub const FILE_ID_LEN: usize = 16;

/// Security handler revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncryptMode {
    /// Revision 2: RC4 with a 40-bit key.
    #[default]
    R2,
    /// Revision 3: RC4 with up to a 128-bit key.
    R3,
    /// Revision 4: AES-128 in CBC mode.
    R4,
}

impl EncryptMode {
    /// The /R entry.
    pub const fn revision(self) -> i64 {
        match self {
            Self::R2 => 2,
            Self::R3 => 3,
            Self::R4 => 4,
        }
    }

    /// The /V entry.
    pub const fn version(self) -> i64 {
        match self {
            Self::R2 => 1,
            Self::R3 => 2,
            Self::R4 => 4,
        }
    }

    /// Key length in bytes used when none is given.
    pub const fn default_key_length(self) -> usize {
        match self {
            Self::R2 => 5,
            Self::R3 | Self::R4 => 16,
        }
    }

    /// Key lengths in bytes this revision accepts.
    pub const fn key_length_range(self) -> RangeInclusive<usize> {
        match self {
            Self::R2 => 5..=5,
            Self::R3 => 5..=16,
            Self::R4 => 16..=16,
        }
    }

    /// Oldest PDF version that understands this revision.
    pub const fn min_pdf_version(self) -> PdfVersion {
        match self {
            Self::R2 => PdfVersion::V1_3,
            Self::R3 => PdfVersion::V1_4,
            Self::R4 => PdfVersion::V1_6,
        }
    }

    pub const fn uses_aes(self) -> bool {
        matches!(self, Self::R4)
    }

    /// Revision 3 and later add the 50 MD5 and 19 RC4 extra rounds.
    pub const fn is_hardened(self) -> bool {
        !matches!(self, Self::R2)
    }
}

/// Document-wide encryption state.
#[derive(Debug, Clone)]
pub struct StandardSecurityHandler {
    mode: EncryptMode,
    key_length: usize,
    permissions: Permissions,
    user_password: PaddedPassword,
    owner_password: PaddedPassword,
    file_id: [u8; FILE_ID_LEN],
    owner_key: Option<[u8; PASSWORD_LEN]>,
    encryption_key: Option<Vec<u8>>,
    user_key: Option<[u8; PASSWORD_LEN]>,
}

impl Default for StandardSecurityHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardSecurityHandler {
    /// Revision 2, 40-bit key, all permissions, empty passwords.
    pub fn new() -> Self {
        Self {
            mode: EncryptMode::R2,
            key_length: EncryptMode::R2.default_key_length(),
            permissions: Permissions::ALL,
            user_password: PaddedPassword::empty(),
            owner_password: PaddedPassword::empty(),
            file_id: [0u8; FILE_ID_LEN],
            owner_key: None,
            encryption_key: None,
            user_key: None,
        }
    }

    /// Select the revision and key length in bytes.
    pub fn set_mode(&mut self, mode: EncryptMode, key_length: usize) -> Result<()> {
        let range = mode.key_length_range();
        if !range.contains(&key_length) {
            return Err(PdfError::InvalidArgument(format!(
                "key length {key_length} is not valid for revision {} (expected {}..={})",
                mode.revision(),
                range.start(),
                range.end()
            )));
        }
        self.mode = mode;
        self.key_length = key_length;
        self.invalidate();
        Ok(())
    }

    pub fn set_user_password(&mut self, password: &[u8]) {
        self.user_password = PaddedPassword::new(password);
        self.invalidate();
    }

    pub fn set_owner_password(&mut self, password: &[u8]) {
        self.owner_password = PaddedPassword::new(password);
        self.invalidate();
    }

    pub fn set_user_password_padded(&mut self, password: PaddedPassword) {
        self.user_password = password;
        self.invalidate();
    }

    pub fn set_owner_password_padded(&mut self, password: PaddedPassword) {
        self.owner_password = password;
        self.invalidate();
    }

    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
        self.invalidate();
    }

    pub fn set_file_id(&mut self, file_id: [u8; FILE_ID_LEN]) {
        self.file_id = file_id;
        self.invalidate();
    }

    pub const fn mode(&self) -> EncryptMode {
        self.mode
    }

    pub const fn key_length(&self) -> usize {
        self.key_length
    }

    pub const fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub const fn user_password(&self) -> &PaddedPassword {
        &self.user_password
    }

    pub const fn owner_password(&self) -> &PaddedPassword {
        &self.owner_password
    }

    pub const fn file_id(&self) -> &[u8; FILE_ID_LEN] {
        &self.file_id
    }

    /// Derive the /O value from the two padded passwords.
    pub fn create_owner_key(&mut self) -> Result<&[u8; PASSWORD_LEN]> {
        let owner_key = compute_owner_key(
            self.mode,
            self.key_length,
            &self.owner_password,
            &self.user_password,
        );
        self.encryption_key = None;
        self.user_key = None;
        debug!(revision = self.mode.revision(), "derived owner key");
        Ok(&*self.owner_key.insert(owner_key))
    }

    /// Derive the master key. Requires the owner key.
    pub fn create_encryption_key(&mut self) -> Result<&[u8]> {
        let owner_key = self.owner_key.ok_or(PdfError::OrderingViolation {
            step: "create_encryption_key",
            missing: "owner key",
        })?;
        let key = compute_encryption_key(
            self.mode,
            self.key_length,
            &self.user_password,
            &owner_key,
            self.permissions,
            &self.file_id,
        );
        self.user_key = None;
        debug!(
            revision = self.mode.revision(),
            key_length = self.key_length,
            "derived encryption key"
        );
        Ok(self.encryption_key.insert(key).as_slice())
    }

    /// Derive the /U value. Requires the master key.
    pub fn create_user_key(&mut self) -> Result<&[u8; PASSWORD_LEN]> {
        let encryption_key = self
            .encryption_key
            .as_deref()
            .ok_or(PdfError::OrderingViolation {
                step: "create_user_key",
                missing: "encryption key",
            })?;
        let user_key = compute_user_key(self.mode, encryption_key, &self.file_id);
        debug!(revision = self.mode.revision(), "derived user key");
        Ok(&*self.user_key.insert(user_key))
    }

    /// Run owner key, master key and user key derivation in order.
    pub fn prepare(&mut self) -> Result<()> {
        self.create_owner_key()?;
        self.create_encryption_key()?;
        self.create_user_key()?;
        Ok(())
    }

    /// Whether every document-level key has been derived.
    pub const fn is_prepared(&self) -> bool {
        self.user_key.is_some()
    }

    pub fn owner_key(&self) -> Result<&[u8; PASSWORD_LEN]> {
        self.owner_key.as_ref().ok_or(PdfError::OrderingViolation {
            step: "owner_key",
            missing: "owner key",
        })
    }

    pub fn encryption_key(&self) -> Result<&[u8]> {
        self.encryption_key
            .as_deref()
            .ok_or(PdfError::OrderingViolation {
                step: "encryption_key",
                missing: "encryption key",
            })
    }

    pub fn user_key(&self) -> Result<&[u8; PASSWORD_LEN]> {
        self.user_key.as_ref().ok_or(PdfError::OrderingViolation {
            step: "user_key",
            missing: "user key",
        })
    }

    /// Derive the key for one object. Requires [`prepare`] (or the three
    /// `create_*` steps) to have run since the last configuration change.
    ///
    /// [`prepare`]: StandardSecurityHandler::prepare
    pub fn init_key(&self, number: u32, generation: u16) -> Result<ObjectKey> {
        if self.user_key.is_none() {
            return Err(PdfError::OrderingViolation {
                step: "init_key",
                missing: "user key",
            });
        }
        let encryption_key = self.encryption_key()?;
        Ok(compute_object_key(
            self.mode,
            encryption_key,
            number,
            generation,
        ))
    }

    fn invalidate(&mut self) {
        self.owner_key = None;
        self.encryption_key = None;
        self.user_key = None;
    }
}

impl ObjectCipher for StandardSecurityHandler {
    fn object_key(&self, id: ObjectRef) -> Result<Option<ObjectKey>> {
        self.init_key(id.number, id.generation).map(Some)
    }
}
