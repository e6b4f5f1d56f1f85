//! PDF Standard Security Handler (revisions 2-4) for writing.
//!
//! This module contains:
//! - `password` - 32-byte password padding
//! - `permission` - /P permission flags
//! - `keys` - O, U, master and per-object key derivation; ObjectKey
//! - `handler` - staged encryption state (StandardSecurityHandler)
//! - `encrypt_dict` - the /Encrypt dictionary

pub mod encrypt_dict;
pub mod handler;
pub mod keys;
pub mod password;
pub mod permission;

use crate::Result;
use crate::model::ObjectRef;

pub use encrypt_dict::encrypt_dictionary;
pub use handler::{EncryptMode, FILE_ID_LEN, StandardSecurityHandler};
pub use keys::{MAX_OBJECT_KEY_LEN, ObjectKey};
pub use password::{PASSWORD_LEN, PASSWORD_PADDING, PaddedPassword, pad_password};
pub use permission::Permissions;

/// Hook the xref writer calls right before serializing each object.
///
/// Returning `None` writes the object unencrypted.
pub trait ObjectCipher {
    fn object_key(&self, id: ObjectRef) -> Result<Option<ObjectKey>>;
}
