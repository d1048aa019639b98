//! Tests for detect module - binary detection and text decoding.

use docsmith_io::{IoError, decode_buffer, is_binary};

#[test]
fn test_binary_detection() {
    assert!(is_binary(b"\x00\x01\x02\x03"));
    assert!(!is_binary("# 标题\n".as_bytes()));
    assert!(!is_binary(b""));
}

#[test]
fn test_nul_after_first_8k_is_text() {
    let mut buffer = vec![b'a'; 9000];
    buffer.push(0);
    assert!(!is_binary(&buffer));
}

#[test]
fn test_decode_binary() {
    let result = decode_buffer(b"\x00\x01\x02".to_vec());
    assert!(matches!(result, Err(IoError::BinaryFile)));
}

#[test]
fn test_decode_utf8_lossy() -> Result<(), Box<dyn std::error::Error>> {
    let result = decode_buffer(vec![0x48, 0x65, 0x6c, 0xff, 0x6f])?;
    assert_eq!(result, "Hel\u{fffd}o");
    Ok(())
}
