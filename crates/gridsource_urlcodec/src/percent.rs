//! Percent encoding and decoding.
//!
//! RFC 3986 unreserved characters pass through; every other byte of the
//! UTF-8 encoding is escaped as `%XX`. Decoding treats `+` as a space for
//! compatibility with form-encoded producers.

use crate::error::{CodecError, CodecResult};

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~')
}

/// Percent-encodes a string for use as a query-string key or value.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Leniently percent-decodes a string.
///
/// Malformed escapes are kept verbatim and invalid UTF-8 sequences are
/// replaced rather than rejected, matching the codec's tolerance for
/// hand-edited address bars.
pub fn percent_decode(input: &str) -> String {
    // Infallible in lenient mode.
    let bytes = decode_bytes(input, false).unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Strictly percent-decodes a string, rejecting malformed escapes.
pub fn percent_decode_strict(input: &str) -> CodecResult<String> {
    let bytes = decode_bytes(input, true)?;
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
}

fn decode_bytes(input: &str, strict: bool) -> CodecResult<Vec<u8>> {
    let raw = input.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'%' => {
                let hi = raw.get(i + 1).copied().and_then(hex_value);
                let lo = raw.get(i + 2).copied().and_then(hex_value);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ if strict => {
                        return Err(CodecError::InvalidPercentEscape { position: i });
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    Ok(out)
}
