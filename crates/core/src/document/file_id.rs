//! File identifier for the trailer /ID array.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use rand::rngs::OsRng;

use crate::model::{Dictionary, PdfObject};
use crate::security::FILE_ID_LEN;

/// Info entries folded into the identifier.
const ID_SOURCES: [&str; 6] = ["Title", "Author", "Subject", "Keywords", "Creator", "Producer"];

/// MD5 over the current time, the Info strings and 16 random bytes.
pub fn generate_file_id(info: Option<&Dictionary>) -> [u8; FILE_ID_LEN] {
    let mut context = md5::Context::new();

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    context.consume(nanos.to_le_bytes());

    if let Some(info) = info {
        for key in ID_SOURCES {
            if let Some(PdfObject::String(value) | PdfObject::HexString(value)) = info.get(key) {
                context.consume(value);
            }
        }
    }

    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    context.consume(salt);

    context.finalize().0
}

/// The `[<id> <id>]` array. Both halves are equal for a new file.
pub fn file_id_array(file_id: &[u8; FILE_ID_LEN]) -> PdfObject {
    PdfObject::Array(vec![
        PdfObject::HexString(file_id.to_vec()),
        PdfObject::HexString(file_id.to_vec()),
    ])
}
