//! Key schedule of the Standard Security Handler (revisions 2-4).
//!
//! These are the pure derivation steps; [`StandardSecurityHandler`] runs
//! them in order and keeps the results.
//!
//! [`StandardSecurityHandler`]: super::StandardSecurityHandler

use super::handler::EncryptMode;
use super::password::{PASSWORD_LEN, PASSWORD_PADDING, PaddedPassword};
use super::permission::Permissions;
use crate::codec::{AES_BLOCK_SIZE, Arcfour, aes_cbc_encrypt, random_iv};
use crate::{PdfError, Result};

/// Extra MD5 passes applied by revision 3 and later.
const REHASH_ROUNDS: usize = 50;
/// Extra RC4 passes (key XOR round index) applied by revision 3 and later.
const XOR_ROUNDS: u8 = 19;
/// Appended to the object key material for AES.
const AES_SALT: &[u8; 4] = b"sAlT";
/// Upper bound on the per-object key length.
pub const MAX_OBJECT_KEY_LEN: usize = 16;

/// The /O value: the padded user password encrypted under a key taken from
/// the owner password.
pub fn compute_owner_key(
    mode: EncryptMode,
    key_length: usize,
    owner_password: &PaddedPassword,
    user_password: &PaddedPassword,
) -> [u8; PASSWORD_LEN] {
    let mut digest = md5::compute(owner_password.as_bytes()).0;
    if mode.is_hardened() {
        for _ in 0..REHASH_ROUNDS {
            digest = md5::compute(digest).0;
        }
    }
    let key = &digest[..key_length];

    let mut owner_key = *user_password.as_bytes();
    Arcfour::new(key).apply_keystream(&mut owner_key);
    if mode.is_hardened() {
        xor_rounds(key, &mut owner_key);
    }
    owner_key
}

/// The document master key.
pub fn compute_encryption_key(
    mode: EncryptMode,
    key_length: usize,
    user_password: &PaddedPassword,
    owner_key: &[u8; PASSWORD_LEN],
    permissions: Permissions,
    file_id: &[u8],
) -> Vec<u8> {
    let mut context = md5::Context::new();
    context.consume(user_password.as_bytes());
    context.consume(owner_key);
    context.consume(permissions.value().to_le_bytes());
    context.consume(file_id);
    let mut digest = context.finalize().0;

    if mode.is_hardened() {
        for _ in 0..REHASH_ROUNDS {
            digest = md5::compute(&digest[..key_length]).0;
        }
    }
    digest[..key_length].to_vec()
}

/// The /U value.
pub fn compute_user_key(
    mode: EncryptMode,
    encryption_key: &[u8],
    file_id: &[u8],
) -> [u8; PASSWORD_LEN] {
    if !mode.is_hardened() {
        let mut user_key = PASSWORD_PADDING;
        Arcfour::new(encryption_key).apply_keystream(&mut user_key);
        return user_key;
    }

    let mut context = md5::Context::new();
    context.consume(PASSWORD_PADDING);
    context.consume(file_id);
    let mut digest = context.finalize().0;

    Arcfour::new(encryption_key).apply_keystream(&mut digest);
    xor_rounds(encryption_key, &mut digest);

    // Only the first 16 bytes are significant; the rest is zero.
    let mut user_key = [0u8; PASSWORD_LEN];
    user_key[..digest.len()].copy_from_slice(&digest);
    user_key
}

/// Key for the strings and streams of object `number`/`generation`.
pub fn compute_object_key(
    mode: EncryptMode,
    encryption_key: &[u8],
    number: u32,
    generation: u16,
) -> ObjectKey {
    let mut context = md5::Context::new();
    context.consume(encryption_key);
    context.consume(&number.to_le_bytes()[..3]);
    context.consume(generation.to_le_bytes());
    if mode.uses_aes() {
        context.consume(AES_SALT);
    }
    let digest = context.finalize().0;

    let len = (encryption_key.len() + 5).min(MAX_OBJECT_KEY_LEN);
    ObjectKey::new(mode, &digest[..len])
}

fn xor_rounds(key: &[u8], data: &mut [u8]) {
    let mut round_key = key.to_vec();
    for round in 1..=XOR_ROUNDS {
        for (dst, src) in round_key.iter_mut().zip(key) {
            *dst = src ^ round;
        }
        Arcfour::new(&round_key).apply_keystream(data);
    }
}

/// Per-object key, valid for the payloads of exactly one object.
#[derive(Clone, PartialEq, Eq)]
pub struct ObjectKey {
    mode: EncryptMode,
    key: [u8; MAX_OBJECT_KEY_LEN],
    len: usize,
}

impl ObjectKey {
    fn new(mode: EncryptMode, key: &[u8]) -> Self {
        let mut buf = [0u8; MAX_OBJECT_KEY_LEN];
        buf[..key.len()].copy_from_slice(key);
        Self {
            mode,
            key: buf,
            len: key.len(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key[..self.len]
    }

    pub const fn mode(&self) -> EncryptMode {
        self.mode
    }

    /// Encrypt one string or stream payload.
    ///
    /// RC4 output has the input's length. AES output is a random IV
    /// followed by the padded ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if self.mode.uses_aes() {
            self.encrypt_with_iv(plaintext, &random_iv())
        } else {
            Ok(Arcfour::oneshot(self.as_bytes(), plaintext))
        }
    }

    /// Like [`ObjectKey::encrypt`] with a caller-chosen IV. The IV is
    /// ignored for RC4. AES requires a full 16-byte key.
    pub fn encrypt_with_iv(
        &self,
        plaintext: &[u8],
        iv: &[u8; AES_BLOCK_SIZE],
    ) -> Result<Vec<u8>> {
        if self.mode.uses_aes() {
            if self.len != MAX_OBJECT_KEY_LEN {
                return Err(PdfError::EncryptionError(format!(
                    "AES-128 needs a {MAX_OBJECT_KEY_LEN}-byte object key, got {} bytes",
                    self.len
                )));
            }
            aes_cbc_encrypt(&self.key, iv, plaintext)
        } else {
            Ok(Arcfour::oneshot(self.as_bytes(), plaintext))
        }
    }
}

impl std::fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectKey")
            .field("mode", &self.mode)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
