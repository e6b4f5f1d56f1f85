//! The /Encrypt dictionary written for a prepared handler.

use super::handler::{EncryptMode, StandardSecurityHandler};
use crate::Result;
use crate::model::{Dictionary, PdfObject};

/// Name of the crypt filter used for revision 4.
pub const STD_CRYPT_FILTER: &str = "StdCF";

/// Build the /Encrypt dictionary. The handler must be prepared, since /O
/// and /U are part of it.
pub fn encrypt_dictionary(handler: &StandardSecurityHandler) -> Result<Dictionary> {
    let owner_key = handler.owner_key()?;
    let user_key = handler.user_key()?;
    let mode = handler.mode();

    let mut dict = Dictionary::new();
    dict.set("Filter", PdfObject::name("Standard"));
    dict.set("V", mode.version());
    dict.set("R", mode.revision());
    match mode {
        EncryptMode::R2 => {}
        EncryptMode::R3 => dict.set("Length", (handler.key_length() * 8) as i64),
        EncryptMode::R4 => {
            dict.set("Length", 128_i64);
            dict.set("CF", crypt_filters());
            dict.set("StmF", PdfObject::name(STD_CRYPT_FILTER));
            dict.set("StrF", PdfObject::name(STD_CRYPT_FILTER));
        }
    }
    dict.set("O", PdfObject::HexString(owner_key.to_vec()));
    dict.set("U", PdfObject::HexString(user_key.to_vec()));
    dict.set("P", handler.permissions().signed_value());
    Ok(dict)
}

fn crypt_filters() -> Dictionary {
    let mut std_cf = Dictionary::new();
    std_cf.set("CFM", PdfObject::name("AESV2"));
    std_cf.set("AuthEvent", PdfObject::name("DocOpen"));
    std_cf.set("Length", 16_i64);

    let mut filters = Dictionary::new();
    filters.set(STD_CRYPT_FILTER, std_cf);
    filters
}
