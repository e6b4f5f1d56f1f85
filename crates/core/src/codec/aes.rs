//! AES-128-CBC encryption for revision 4 security handlers.
//!
//! PDF stores the initialization vector in front of the ciphertext and pads
//! the plaintext with PKCS#7, so an encrypted payload is always
//! `16 + 16 * (len / 16 + 1)` bytes long.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockEncryptMut, KeyIvInit};
use cbc::Encryptor;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::{PdfError, Result};

type Aes128CbcEnc = Encryptor<aes::Aes128>;

/// AES block size in bytes; also the IV length.
pub const AES_BLOCK_SIZE: usize = 16;

/// Encrypt `data` with AES-128-CBC and PKCS#7 padding.
///
/// Returns `iv || ciphertext`.
pub fn aes_cbc_encrypt(
    key: &[u8; 16],
    iv: &[u8; AES_BLOCK_SIZE],
    data: &[u8],
) -> Result<Vec<u8>> {
    let padded_len = (data.len() / AES_BLOCK_SIZE + 1) * AES_BLOCK_SIZE;
    let mut buf = vec![0u8; padded_len];
    buf[..data.len()].copy_from_slice(data);

    let ciphertext = Aes128CbcEnc::new(key.into(), iv.into())
        .encrypt_padded_mut::<Pkcs7>(&mut buf, data.len())
        .map_err(|_| PdfError::EncryptionError("AES padding buffer too small".into()))?;

    let mut out = Vec::with_capacity(AES_BLOCK_SIZE + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(ciphertext);
    Ok(out)
}

/// Fresh IV from the operating system RNG.
pub fn random_iv() -> [u8; AES_BLOCK_SIZE] {
    let mut iv = [0u8; AES_BLOCK_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}
