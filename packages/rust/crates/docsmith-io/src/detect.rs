//! Content sniffing for documents handed to the scanner.
//!
//! A `.md` extension is not proof of text: exported diagrams and editor
//! swap files sometimes carry it. Anything with a NUL byte near the start is
//! rejected before the extractors see it.

use memchr::memchr;

use crate::error::IoError;

/// Bytes inspected for a NUL before a buffer is treated as text.
pub const BINARY_PROBE_BYTES: usize = 8 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// True when a NUL byte appears within the first [`BINARY_PROBE_BYTES`].
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let probe = &buffer[..buffer.len().min(BINARY_PROBE_BYTES)];
    memchr(0, probe).is_some()
}

/// Decode a document body.
///
/// A leading UTF-8 byte-order mark is dropped so that line-anchored patterns
/// (`# title`, `**@file**`) match on the first line. Invalid UTF-8 becomes
/// U+FFFD.
///
/// # Errors
/// `IoError::BinaryFile` when [`is_binary`] says so.
pub fn decode_buffer(mut buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }
    if buffer.starts_with(UTF8_BOM) {
        buffer.drain(..UTF8_BOM.len());
    }

    match String::from_utf8(buffer) {
        Ok(text) => Ok(text),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_is_stripped_before_heading() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("# 总体架构\n".as_bytes());
        let text = decode_buffer(bytes).unwrap();
        assert!(text.starts_with("# 总体架构"));
    }

    #[test]
    fn test_nul_at_probe_boundary() {
        let mut inside = vec![b'#'; BINARY_PROBE_BYTES - 1];
        inside.push(0);
        assert!(is_binary(&inside));

        let mut outside = vec![b'#'; BINARY_PROBE_BYTES];
        outside.push(0);
        assert!(!is_binary(&outside));
    }
}
