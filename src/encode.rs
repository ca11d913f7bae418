//! Strict percent-coding as required by RFC 5849 3.6.
//!
//! This is deliberately narrower than generic URL escaping: the unreserved
//! alphabet is only `A-Z a-z 0-9 - . _ ~`, every other byte becomes `%XX`
//! with uppercase hexadecimal, and the decoder rejects anything the encoder
//! could not have produced (lowercase hex, truncated escapes). Notably `+`
//! encodes as `%2B` and space as `%20`, never `+`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::EncodeError;

/// Everything outside the RFC 5849 3.6 unreserved alphabet.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes `input` per RFC 5849 3.6. UTF-8 input is encoded byte by
/// byte with no Unicode normalization.
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED).to_string()
}

/// Percent-decodes `input` per RFC 5849 3.6.
///
/// Only `%XX` with uppercase hexadecimal digits is accepted; a bare `%`, a
/// truncated escape, or lowercase hex digits fail with
/// [`EncodeError::InvalidPercentEscape`].
pub fn percent_decode(input: &str) -> Result<String, EncodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() || !is_hex(bytes[i + 1]) || !is_hex(bytes[i + 2]) {
                // slice the byte buffer, not the str: i + 3 may fall inside
                // a multibyte character
                let end = bytes.len().min(i + 3);
                return Err(EncodeError::InvalidPercentEscape(
                    String::from_utf8_lossy(&bytes[i..end]).into_owned(),
                ));
            }
            out.push(unhex(bytes[i + 1]) << 4 | unhex(bytes[i + 2]));
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(String::from_utf8(out)?)
}

// Uppercase only; RFC 5849 3.6 requires the hex characters to be uppercase.
fn is_hex(c: u8) -> bool {
    c.is_ascii_digit() || (b'A'..=b'F').contains(&c)
}

fn unhex(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        _ => c - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_unreserved_unchanged() {
        assert_eq!(percent_encode("-._~"), "-._~");
        assert_eq!(
            percent_encode("abcABC019-._~"),
            "abcABC019-._~"
        );
    }

    #[test]
    fn encode_reserved() {
        assert_eq!(percent_encode(" "), "%20");
        assert_eq!(percent_encode("%"), "%25");
        assert_eq!(percent_encode("&"), "%26");
        assert_eq!(percent_encode(" /=+"), "%20%2F%3D%2B");
        assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("An encoded string!"), "An%20encoded%20string%21");
        assert_eq!(percent_encode("Dogs, Cats & Mice"), "Dogs%2C%20Cats%20%26%20Mice");
        assert_eq!(percent_encode("☃"), "%E2%98%83");
    }

    #[test]
    fn decode_inverts_encode() {
        for s in [
            " ", "%", "&", "-._", " /=+",
            "Ladies + Gentlemen",
            "An encoded string!",
            "Dogs, Cats & Mice",
            "☃",
            "少女",
        ] {
            assert_eq!(percent_decode(&percent_encode(s)).unwrap(), s);
        }
    }

    #[test]
    fn decode_plain() {
        assert_eq!(percent_decode("plain-text_~.").unwrap(), "plain-text_~.");
    }

    #[test]
    fn decode_rejects_truncated() {
        assert!(matches!(
            percent_decode("%2"),
            Err(EncodeError::InvalidPercentEscape(s)) if s == "%2"
        ));
        assert!(matches!(
            percent_decode("%"),
            Err(EncodeError::InvalidPercentEscape(_))
        ));
        assert!(matches!(
            percent_decode("%%%%"),
            Err(EncodeError::InvalidPercentEscape(_))
        ));
    }

    #[test]
    fn decode_rejects_bad_hex() {
        assert!(matches!(
            percent_decode("%zz"),
            Err(EncodeError::InvalidPercentEscape(s)) if s == "%zz"
        ));
        // lowercase hex digits are not RFC 5849 escapes
        assert!(percent_decode("%ab").is_err());
        assert!(percent_decode("a%2fb").is_err());
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert!(matches!(percent_decode("%FF"), Err(EncodeError::NotUtf8(_))));
    }

    // a stray % right before a multibyte character must fail, not panic
    #[test]
    fn decode_error_snippet_handles_multibyte_input() {
        assert!(matches!(
            percent_decode("%☃"),
            Err(EncodeError::InvalidPercentEscape(_))
        ));
        assert!(matches!(
            percent_decode("100%€"),
            Err(EncodeError::InvalidPercentEscape(_))
        ));
    }
}
