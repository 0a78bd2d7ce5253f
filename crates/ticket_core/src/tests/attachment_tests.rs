use super::*;

use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

// Smallest valid PNG header plus a few bytes that are not valid UTF-8.
const FIXTURE: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff, 0xfe, 0x10, 0x80,
];

#[test]
fn data_url_declares_guessed_mime_type() {
    let url = data_url("scan.png", FIXTURE);
    assert!(url.starts_with("data:image/png;base64,"), "unexpected url: {url}");

    let url = data_url("no-extension", FIXTURE);
    assert!(
        url.starts_with("data:application/octet-stream;base64,"),
        "unexpected url: {url}"
    );
}

#[test]
fn stripped_data_url_matches_plain_base64_of_raw_bytes() {
    for name in ["scan.png", "letter.pdf", "notes.txt", "blob"] {
        let url = data_url(name, FIXTURE);
        assert_eq!(
            strip_data_url_prefix(&url),
            Some(STANDARD.encode(FIXTURE).as_str()),
            "mismatch for {name}"
        );
    }
}

#[test]
fn strip_keeps_text_after_first_marker_only() {
    assert_eq!(
        strip_data_url_prefix("data:text/plain;base64,YmFzZTY0LA==base64,tail"),
        Some("YmFzZTY0LA==base64,tail")
    );
    assert_eq!(strip_data_url_prefix("data:text/plain,hello"), None);
}

#[tokio::test]
async fn encode_attachment_reads_memory_file() {
    let file = MemoryFile::new("scan.png", FIXTURE.to_vec());
    let encoded = encode_attachment(&file).await.expect("encode");

    assert_eq!(encoded.filename, "scan.png");
    assert_eq!(encoded.base64, STANDARD.encode(FIXTURE));
}

#[tokio::test]
async fn encode_attachment_reads_path_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("ticket_core_attachment_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("receipt.pdf");
    fs::write(&path, FIXTURE).expect("write fixture");

    let file = PathFile::new(&path);
    assert_eq!(file.name(), "receipt.pdf");

    let encoded = encode_attachment(&file).await.expect("encode");
    assert_eq!(encoded.filename, "receipt.pdf");
    assert_eq!(encoded.base64, STANDARD.encode(FIXTURE));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn unreadable_file_reports_read_error() {
    let file = PathFile::new(env::temp_dir().join("ticket_core_missing_attachment.pdf"));
    let err = encode_attachment(&file).await.expect_err("must fail");

    match err {
        EncodeError::Read { filename, .. } => {
            assert_eq!(filename, "ticket_core_missing_attachment.pdf")
        }
        other => panic!("unexpected error: {other}"),
    }
}
