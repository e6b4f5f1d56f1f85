//! Password padding and Latin-1 normalization.

use pdfscribe_core::PdfError;
use pdfscribe_core::security::{PASSWORD_LEN, PASSWORD_PADDING, PaddedPassword, pad_password};

#[test]
fn test_empty_password_is_padding() {
    assert_eq!(pad_password(b""), PASSWORD_PADDING);
    assert_eq!(PaddedPassword::empty().as_bytes(), &PASSWORD_PADDING);
    assert_eq!(PaddedPassword::default(), PaddedPassword::new(b""));
}

#[test]
fn test_short_password_is_followed_by_padding_prefix() {
    let padded = pad_password(b"foo");
    assert_eq!(&padded[..3], b"foo");
    assert_eq!(&padded[3..], &PASSWORD_PADDING[..PASSWORD_LEN - 3]);

    let one = pad_password(b"x");
    assert_eq!(one[0], b'x');
    assert_eq!(&one[1..], &PASSWORD_PADDING[..31]);
}

#[test]
fn test_exact_and_long_passwords() {
    let exact = [b'a'; 32];
    assert_eq!(pad_password(&exact), exact);

    let almost = [b'b'; 31];
    let padded = pad_password(&almost);
    assert_eq!(&padded[..31], &almost);
    assert_eq!(padded[31], PASSWORD_PADDING[0]);

    let long: Vec<u8> = (0..200u8).collect();
    assert_eq!(pad_password(&long)[..], long[..32]);

    let over = [b'c'; 33];
    assert_eq!(pad_password(&over), [b'c'; 32]);
}

#[test]
fn test_latin1_text() {
    let padded = PaddedPassword::from_text("café").unwrap();
    assert_eq!(&padded.as_bytes()[..4], &[b'c', b'a', b'f', 0xE9]);

    let err = PaddedPassword::from_text("€uro").unwrap_err();
    assert!(matches!(err, PdfError::InvalidArgument(_)));
}

#[test]
fn test_debug_hides_password() {
    let padded = PaddedPassword::new(b"hunter2");
    assert!(!format!("{padded:?}").contains("hunter2"));
}
