//! Cipher primitives used by the security handler.
//!
//! This module contains:
//! - `aes`: AES-128-CBC encryption with an IV prefix
//! - `arcfour`: RC4 stream cipher

pub mod aes;
pub mod arcfour;

pub use aes::{AES_BLOCK_SIZE, aes_cbc_encrypt, random_iv};
pub use arcfour::Arcfour;
