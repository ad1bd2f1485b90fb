use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Raised while building a generator. Fatal to that instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("period must be greater than zero, got {0}")]
    NonPositivePeriod(i64),

    #[error("unsupported digit count {0}, expected 1..=10")]
    UnsupportedDigits(u32),

    #[error("no secret configured (set SECUREQR_SECRET or add `secret` to secureqr.json)")]
    MissingSecret,

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// The configured secret is not usable Base32.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    #[error("secret is empty")]
    Empty,

    #[error("invalid base32 character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("secret length is not a valid base32 length")]
    Malformed,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("QR encode error: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("PNG encode error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),

    #[error("no QR codes found in the image")]
    NoQrCode,

    #[error("failed to decode QR code: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decoding(#[from] DecodingError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_into_umbrella() {
        let err: Error = ConfigError::NonPositivePeriod(0).into();
        assert!(matches!(err, Error::Config(ConfigError::NonPositivePeriod(0))));
        assert_eq!(err.to_string(), "period must be greater than zero, got 0");
    }

    #[test]
    fn decoding_error_names_offending_character() {
        let err = DecodingError::InvalidCharacter { ch: '1', position: 4 };
        assert_eq!(err.to_string(), "invalid base32 character '1' at position 4");
    }
}
