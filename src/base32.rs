use std::fmt;

use base32::Alphabet;

use crate::error::DecodingError;

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Raw HMAC key bytes decoded from a Base32 secret.
///
/// Immutable once built. `Debug` is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED; {} bytes])", self.0.len())
    }
}

/// Decode a Base32 secret into key bytes.
///
/// Case is ignored, as are whitespace, `-` separators and trailing `=`
/// padding. Error positions are character indices into `input`.
pub fn decode_secret(input: &str) -> Result<SecretKey, DecodingError> {
    let mut cleaned = String::with_capacity(input.len());
    let mut padding_at = None;

    for (position, ch) in input.chars().enumerate() {
        if ch.is_ascii_whitespace() || ch == '-' {
            continue;
        }
        if ch == '=' {
            padding_at.get_or_insert(position);
            continue;
        }
        if let Some(position) = padding_at {
            return Err(DecodingError::InvalidCharacter { ch: '=', position });
        }

        let upper = ch.to_ascii_uppercase();
        if !ALPHABET.contains(upper) {
            return Err(DecodingError::InvalidCharacter { ch, position });
        }
        cleaned.push(upper);
    }

    if cleaned.is_empty() {
        return Err(DecodingError::Empty);
    }

    // 1, 3 and 6 trailing symbols cannot end an RFC 4648 group.
    if matches!(cleaned.len() % 8, 1 | 3 | 6) {
        return Err(DecodingError::Malformed);
    }

    base32::decode(Alphabet::Rfc4648 { padding: false }, &cleaned)
        .map(SecretKey)
        .ok_or(DecodingError::Malformed)
}

/// Unpadded upper-case Base32 of `bytes`.
pub fn encode_secret(bytes: &[u8]) -> String {
    base32::encode(Alphabet::Rfc4648 { padding: false }, bytes)
}
