use std::fmt::Write as _;

/// Format bytes as space-separated two-digit hex.
///
/// Diagnostic formatter for payloads that failed to decode.
pub fn hex_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bytes_with_spaces() {
        assert_eq!(hex_bytes(&[0x00, 0xFF, 0x0A]), "00 ff 0a");
    }

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(hex_bytes(&[]), "");
    }
}
