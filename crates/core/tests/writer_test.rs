//! Value serialization.

use pdfscribe_core::model::{Dictionary, ObjectRef, PdfObject, PdfStream, PdfWriter};
use pdfscribe_core::security::keys::compute_object_key;
use pdfscribe_core::security::EncryptMode;

fn render(obj: &PdfObject) -> String {
    let mut writer = PdfWriter::new(Vec::new());
    writer.write_object(obj, None).unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

#[test]
fn test_dictionary_layout() {
    let mut dict = Dictionary::with_type("Page");
    dict.set("Rotate", 90);
    dict.set("Scale", 0.5);
    dict.set("Label", PdfObject::name("A B"));
    dict.set("Title", PdfObject::string("a(b)"));
    dict.set(
        "Kids",
        vec![
            PdfObject::from(ObjectRef::new(1, 0)),
            PdfObject::from(ObjectRef::new(2, 0)),
        ],
    );
    dict.set("Flag", true);
    dict.set("Nothing", PdfObject::Null);
    dict.set("Raw", PdfObject::HexString(vec![0xde, 0xad]));

    insta::assert_snapshot!(render(&PdfObject::Dict(dict)), @r"
    <<
    /Type /Page
    /Rotate 90
    /Scale 0.5
    /Label /A#20B
    /Title (a\(b\))
    /Kids [1 0 R 2 0 R]
    /Flag true
    /Nothing null
    /Raw <DEAD>
    >>
    ");
}

#[test]
fn test_stream_layout() {
    let mut dict = Dictionary::new();
    dict.set("Length", 999);
    let stream = PdfStream::new(dict, b"hello".to_vec());

    insta::assert_snapshot!(render(&PdfObject::Stream(stream)), @r"
    <<
    /Length 5
    >>
    stream
    hello
    endstream
    ");
}

#[test]
fn test_replacing_key_keeps_position() {
    let mut dict = Dictionary::new();
    dict.set("A", 1);
    dict.set("B", 2);
    dict.set("A", 3);
    assert_eq!(render(&PdfObject::Dict(dict)), "<<\n/A 3\n/B 2\n>>");
}

#[test]
fn test_encrypted_values() {
    let key = compute_object_key(EncryptMode::R2, &[1, 2, 3, 4, 5], 7, 0);
    let mut dict = Dictionary::new();
    dict.set("S", PdfObject::string("abc"));
    dict.set("N", PdfObject::name("Plain"));
    dict.set("I", 42);
    let stream = PdfStream::new(dict, b"payload".to_vec());

    let mut writer = PdfWriter::new(Vec::new());
    writer
        .write_object(&PdfObject::Stream(stream), Some(&key))
        .unwrap();
    let output = writer.into_inner();
    let text = String::from_utf8_lossy(&output);

    let expected_string = hex::encode_upper(key.encrypt(b"abc").unwrap());
    assert!(text.contains(&format!("/S <{expected_string}>\n")));
    assert!(text.contains("/N /Plain\n"));
    assert!(text.contains("/I 42\n"));
    assert!(text.contains("/Length 7\n"));

    let payload = key.encrypt(b"payload").unwrap();
    let mut expected_tail = b"\nstream\n".to_vec();
    expected_tail.extend_from_slice(&payload);
    expected_tail.extend_from_slice(b"\nendstream");
    assert!(output.ends_with(&expected_tail));
}

#[test]
fn test_object_key_length_reaches_stream() {
    // AES payloads grow; /Length follows the written bytes.
    let key = compute_object_key(EncryptMode::R4, &[5u8; 16], 1, 0);
    let stream = PdfStream::from_data(vec![0u8; 40]);
    let mut writer = PdfWriter::new(Vec::new());
    writer
        .write_object(&PdfObject::Stream(stream), Some(&key))
        .unwrap();
    let text = String::from_utf8_lossy(writer.get_ref()).into_owned();
    assert!(text.starts_with("<<\n/Length 64\n>>\nstream\n"));
}
