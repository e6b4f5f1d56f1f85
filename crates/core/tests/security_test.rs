//! Standard Security Handler key derivation.
//!
//! The O/U/ID values come from RC4 encrypted files made with the owner
//! password "foo", the user password "baz" and /P -4.

use pdfscribe_core::PdfError;
use pdfscribe_core::model::{ObjectRef, PdfObject};
use pdfscribe_core::security::keys::{
    compute_encryption_key, compute_object_key, compute_owner_key, compute_user_key,
};
use pdfscribe_core::security::{
    EncryptMode, ObjectCipher, PaddedPassword, Permissions, StandardSecurityHandler,
    encrypt_dictionary,
};

// V=1, R=2, 40-bit key
const RC4_40_O: [u8; 32] = [
    1, 169, 240, 206, 242, 141, 0, 248, 223, 176, 37, 143, 94, 240, 197, 92, 157, 247, 200, 22,
    149, 143, 54, 49, 0, 175, 119, 236, 2, 38, 36, 84,
];
const RC4_40_U: [u8; 32] = [
    105, 75, 157, 162, 248, 9, 199, 124, 114, 119, 140, 251, 202, 194, 4, 129, 178, 114, 5, 208,
    231, 211, 34, 98, 54, 130, 131, 100, 102, 106, 151, 8,
];

// V=2, R=3, 128-bit key
const RC4_128_O: [u8; 32] = [
    208, 72, 209, 82, 158, 83, 93, 24, 132, 205, 56, 86, 54, 123, 24, 75, 74, 144, 223, 1, 230, 55,
    209, 110, 202, 6, 91, 175, 78, 100, 144, 11,
];
const RC4_128_U: [u8; 32] = [
    9, 52, 18, 54, 59, 157, 50, 124, 122, 197, 1, 68, 199, 199, 85, 241, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0,
];

const DOCID: [u8; 16] = [
    101, 26, 148, 254, 235, 120, 104, 211, 18, 169, 123, 55, 114, 112, 134, 14,
];

fn prepared(mode: EncryptMode, key_length: usize) -> StandardSecurityHandler {
    let mut handler = StandardSecurityHandler::new();
    handler.set_mode(mode, key_length).unwrap();
    handler.set_user_password(b"user");
    handler.set_owner_password(b"owner");
    handler.set_file_id(DOCID);
    handler.prepare().unwrap();
    handler
}

#[test]
fn test_rc4_40_user_key_matches_known_file() {
    let user = PaddedPassword::new(b"baz");
    let key = compute_encryption_key(
        EncryptMode::R2,
        5,
        &user,
        &RC4_40_O,
        Permissions::ALL,
        &DOCID,
    );
    assert_eq!(key.len(), 5);
    assert_eq!(compute_user_key(EncryptMode::R2, &key, &DOCID), RC4_40_U);
}

#[test]
fn test_rc4_128_user_key_matches_known_file() {
    let user = PaddedPassword::new(b"baz");
    let key = compute_encryption_key(
        EncryptMode::R3,
        16,
        &user,
        &RC4_128_O,
        Permissions::ALL,
        &DOCID,
    );
    assert_eq!(key.len(), 16);
    assert_eq!(compute_user_key(EncryptMode::R3, &key, &DOCID), RC4_128_U);
}

#[test]
fn test_owner_key_matches_known_files() {
    let owner = PaddedPassword::new(b"foo");
    let user = PaddedPassword::new(b"baz");
    assert_eq!(compute_owner_key(EncryptMode::R2, 5, &owner, &user), RC4_40_O);
    assert_eq!(compute_owner_key(EncryptMode::R3, 16, &owner, &user), RC4_128_O);
}

/// Owner "owner", user "user", /P -4 and an ID of sixteen 0x42 bytes.
const VECTOR_ID: [u8; 16] = [0x42; 16];

fn vector_keys(mode: EncryptMode, key_length: usize) -> ([u8; 32], Vec<u8>) {
    let owner = compute_owner_key(
        mode,
        key_length,
        &PaddedPassword::new(b"owner"),
        &PaddedPassword::new(b"user"),
    );
    let key = compute_encryption_key(
        mode,
        key_length,
        &PaddedPassword::new(b"user"),
        &owner,
        Permissions::ALL,
        &VECTOR_ID,
    );
    (owner, key)
}

#[test]
fn test_r2_vectors() {
    let (owner, key) = vector_keys(EncryptMode::R2, 5);
    assert_eq!(
        hex::encode_upper(owner),
        "94E8094419662A774442FB072E3D9F19E9D130EC09A4D0061E78FE920F7AB62F"
    );
    assert_eq!(hex::encode_upper(&key), "C759EE54EE");

    let object_key = compute_object_key(EncryptMode::R2, &key, 5, 0);
    assert_eq!(hex::encode_upper(object_key.as_bytes()), "88640320D28BEFFAF0EC");
    assert_eq!(
        hex::encode_upper(object_key.encrypt(b"Quarterly Report").unwrap()),
        "A595E06A7168D383457DFE3645025E51"
    );
}

#[test]
fn test_r3_vectors() {
    let (owner, key) = vector_keys(EncryptMode::R3, 16);
    assert_eq!(
        hex::encode_upper(owner),
        "0BA3835F88F90388E74E54584125CE142BE0DE24C6B0D37746E075B891756671"
    );
    assert_eq!(hex::encode_upper(&key), "B8980B4B951B338950BE2B788219F9DA");

    let object_key = compute_object_key(EncryptMode::R3, &key, 5, 0);
    assert_eq!(
        hex::encode_upper(object_key.as_bytes()),
        "8F1E800E80B53FDD39F6CE6F8496EA4D"
    );
    assert_eq!(
        hex::encode_upper(object_key.encrypt(b"Quarterly Report").unwrap()),
        "9A820240692FECFAB764BB391D471EF5"
    );
}

#[test]
fn test_r4_vectors() {
    // Same /O and document key as R3; the object key adds the AES salt.
    let (owner, key) = vector_keys(EncryptMode::R4, 16);
    assert_eq!(
        hex::encode_upper(owner),
        "0BA3835F88F90388E74E54584125CE142BE0DE24C6B0D37746E075B891756671"
    );
    assert_eq!(hex::encode_upper(&key), "B8980B4B951B338950BE2B788219F9DA");

    let object_key = compute_object_key(EncryptMode::R4, &key, 5, 0);
    assert_eq!(
        hex::encode_upper(object_key.as_bytes()),
        "E26876AFA5D065973EFBFBA7724F2D50"
    );
    let out = object_key.encrypt_with_iv(b"payload", &[0x11; 16]).unwrap();
    assert_eq!(&out[..16], &[0x11; 16]);
    assert_eq!(hex::encode_upper(&out[16..]), "52EA0469C80FEDF8C59673CA4CCD963D");
}

#[test]
fn test_aes_rejects_short_object_key() {
    let object_key = compute_object_key(EncryptMode::R4, &[1, 2, 3, 4, 5], 1, 0);
    assert_eq!(object_key.as_bytes().len(), 10);
    assert!(matches!(
        object_key.encrypt_with_iv(b"payload", &[0; 16]),
        Err(PdfError::EncryptionError(_))
    ));
    assert!(object_key.encrypt(b"payload").is_err());
}

#[test]
fn test_wrong_password_gives_different_user_key() {
    let user = PaddedPassword::new(b"bar");
    let key = compute_encryption_key(
        EncryptMode::R2,
        5,
        &user,
        &RC4_40_O,
        Permissions::ALL,
        &DOCID,
    );
    assert_ne!(compute_user_key(EncryptMode::R2, &key, &DOCID), RC4_40_U);
}

#[test]
fn test_permissions_value() {
    assert_eq!(Permissions::ALL.value(), 0xFFFF_FFFC);
    assert_eq!(Permissions::ALL.signed_value(), -4);
}

#[test]
fn test_owner_key_depends_on_revision() {
    let owner = PaddedPassword::new(b"owner");
    let user = PaddedPassword::new(b"user");
    let r2 = compute_owner_key(EncryptMode::R2, 5, &owner, &user);
    let r3 = compute_owner_key(EncryptMode::R3, 5, &owner, &user);
    assert_ne!(r2, r3);
    assert_ne!(r2, *user.as_bytes());
}

#[test]
fn test_owner_key_is_deterministic() {
    let owner = PaddedPassword::new(b"owner");
    let user = PaddedPassword::new(b"user");
    assert_eq!(
        compute_owner_key(EncryptMode::R3, 16, &owner, &user),
        compute_owner_key(EncryptMode::R3, 16, &owner, &user)
    );
}

#[test]
fn test_object_key_lengths() {
    let r2 = compute_object_key(EncryptMode::R2, &[1, 2, 3, 4, 5], 1, 0);
    assert_eq!(r2.as_bytes().len(), 10);

    let r3 = compute_object_key(EncryptMode::R3, &[7u8; 16], 1, 0);
    assert_eq!(r3.as_bytes().len(), 16);

    let r3_short = compute_object_key(EncryptMode::R3, &[7u8; 8], 1, 0);
    assert_eq!(r3_short.as_bytes().len(), 13);
}

#[test]
fn test_object_key_depends_on_object_and_salt() {
    let key = [9u8; 16];
    let a = compute_object_key(EncryptMode::R3, &key, 1, 0);
    let b = compute_object_key(EncryptMode::R3, &key, 2, 0);
    let c = compute_object_key(EncryptMode::R3, &key, 1, 1);
    let aes = compute_object_key(EncryptMode::R4, &key, 1, 0);
    assert_ne!(a.as_bytes(), b.as_bytes());
    assert_ne!(a.as_bytes(), c.as_bytes());
    assert_ne!(a.as_bytes(), aes.as_bytes());
}

#[test]
fn test_object_key_uses_low_three_bytes_of_number() {
    let key = [3u8; 5];
    let low = compute_object_key(EncryptMode::R2, &key, 0x0012_3456, 0);
    let high = compute_object_key(EncryptMode::R2, &key, 0xFF12_3456, 0);
    assert_eq!(low.as_bytes(), high.as_bytes());
}

#[test]
fn test_handler_derives_in_order() {
    let mut handler = StandardSecurityHandler::new();
    handler.set_file_id(DOCID);

    let err = handler.create_encryption_key().unwrap_err();
    assert!(matches!(err, PdfError::OrderingViolation { .. }));
    let err = handler.create_user_key().unwrap_err();
    assert!(matches!(err, PdfError::OrderingViolation { .. }));
    let err = handler.init_key(1, 0).unwrap_err();
    assert!(matches!(err, PdfError::OrderingViolation { .. }));

    handler.create_owner_key().unwrap();
    handler.create_encryption_key().unwrap();
    assert!(!handler.is_prepared());
    handler.create_user_key().unwrap();
    assert!(handler.is_prepared());
    handler.init_key(1, 0).unwrap();
}

#[test]
fn test_setters_discard_derived_keys() {
    let mut handler = prepared(EncryptMode::R3, 16);
    let before = *handler.user_key().unwrap();

    handler.set_user_password(b"other");
    assert!(!handler.is_prepared());
    assert!(handler.owner_key().is_err());
    assert!(handler.encryption_key().is_err());
    assert!(matches!(
        handler.init_key(1, 0),
        Err(PdfError::OrderingViolation { .. })
    ));

    handler.prepare().unwrap();
    assert_ne!(*handler.user_key().unwrap(), before);
}

#[test]
fn test_handler_matches_free_functions() {
    let handler = prepared(EncryptMode::R2, 5);
    let owner = compute_owner_key(
        EncryptMode::R2,
        5,
        &PaddedPassword::new(b"owner"),
        &PaddedPassword::new(b"user"),
    );
    assert_eq!(handler.owner_key().unwrap(), &owner);

    let key = compute_encryption_key(
        EncryptMode::R2,
        5,
        &PaddedPassword::new(b"user"),
        &owner,
        Permissions::ALL,
        &DOCID,
    );
    assert_eq!(handler.encryption_key().unwrap(), key.as_slice());
    assert_eq!(
        handler.user_key().unwrap(),
        &compute_user_key(EncryptMode::R2, &key, &DOCID)
    );
}

#[test]
fn test_key_length_validation() {
    let mut handler = StandardSecurityHandler::new();
    assert!(handler.set_mode(EncryptMode::R2, 16).is_err());
    assert!(handler.set_mode(EncryptMode::R3, 4).is_err());
    assert!(handler.set_mode(EncryptMode::R3, 17).is_err());
    assert!(handler.set_mode(EncryptMode::R4, 5).is_err());
    handler.set_mode(EncryptMode::R3, 7).unwrap();
    assert_eq!(handler.key_length(), 7);
    assert_eq!(handler.mode(), EncryptMode::R3);
}

#[test]
fn test_object_cipher_gives_per_object_keys() {
    let handler = prepared(EncryptMode::R3, 16);
    let a = handler.object_key(ObjectRef::new(1, 0)).unwrap().unwrap();
    let b = handler.object_key(ObjectRef::new(2, 0)).unwrap().unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());

    let plain = b"secret text";
    let encrypted = a.encrypt(plain).unwrap();
    assert_eq!(encrypted.len(), plain.len());
    assert_ne!(encrypted.as_slice(), plain);
    // RC4 is symmetric and restarts for every payload.
    assert_eq!(a.encrypt(&encrypted).unwrap(), plain);
}

#[test]
fn test_aes_object_key_prefixes_iv() {
    let handler = prepared(EncryptMode::R4, 16);
    let key = handler.init_key(3, 0).unwrap();
    let iv = [0x11u8; 16];
    let out = key.encrypt_with_iv(b"payload", &iv).unwrap();
    assert_eq!(out.len(), 32);
    assert_eq!(&out[..16], &iv);
}

#[test]
fn test_encrypt_dictionary_entries() {
    let r2 = prepared(EncryptMode::R2, 5);
    let dict = encrypt_dictionary(&r2).unwrap();
    assert_eq!(dict.get("V"), Some(&PdfObject::Int(1)));
    assert_eq!(dict.get("R"), Some(&PdfObject::Int(2)));
    assert!(dict.get("Length").is_none());
    assert_eq!(dict.get("P"), Some(&PdfObject::Int(-4)));

    let r3 = prepared(EncryptMode::R3, 16);
    let dict = encrypt_dictionary(&r3).unwrap();
    assert_eq!(dict.get("V"), Some(&PdfObject::Int(2)));
    assert_eq!(dict.get("Length"), Some(&PdfObject::Int(128)));

    let r4 = prepared(EncryptMode::R4, 16);
    let dict = encrypt_dictionary(&r4).unwrap();
    assert_eq!(dict.get("V"), Some(&PdfObject::Int(4)));
    assert_eq!(dict.get("R"), Some(&PdfObject::Int(4)));
    assert!(dict.contains_key("CF"));
    assert_eq!(dict.get("StmF"), Some(&PdfObject::name("StdCF")));
}

#[test]
fn test_encrypt_dictionary_requires_prepare() {
    let handler = StandardSecurityHandler::new();
    assert!(matches!(
        encrypt_dictionary(&handler),
        Err(PdfError::OrderingViolation { .. })
    ));
}
