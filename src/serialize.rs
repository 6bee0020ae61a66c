//! Binary-safe string escaping for the textual serialize format.
//!
//! The serialized output is re-executed as code against the host's filter
//! constructor, so the blob must round-trip byte-for-byte, including
//! embedded NUL bytes and quote/backslash characters. This mirrors the
//! common Lua-sandbox convention of escaping any byte outside the safe
//! printable range as a three-digit decimal `\ddd` sequence.

/// Bytes that never need escaping: printable ASCII other than `"` and `\`.
fn is_safe(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E if byte != b'"' && byte != b'\\')
}

pub fn escape_into(bytes: &[u8], out: &mut String) {
    for &b in bytes {
        if is_safe(b) {
            out.push(b as char);
        } else {
            out.push('\\');
            out.push_str(&format!("{:03}", b));
        }
    }
}

/// Inverse of `escape_into`, used by tests exercising the serialize format
/// end to end.
pub fn unescape(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            let digits = &bytes[i + 1..i + 4];
            let value: u8 = std::str::from_utf8(digits).unwrap().parse().unwrap();
            out.push(value);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}
