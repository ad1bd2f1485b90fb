//! Rotating one-time codes for attendance QR payloads.
//!
//! A [`DynamicCodeGenerator`] turns a Base32 session secret into a 6-digit
//! HMAC-SHA-256 TOTP code (RFC 4226 / RFC 6238) and wraps it with a session
//! id into the JSON payload shown as a QR code.
//!
//! ```
//! use secure_qr::{DynamicCodeGenerator, FixedClock, Period};
//!
//! let generator = DynamicCodeGenerator::with_time_source(
//!     "JBSWY3DPEHPK3PXP",
//!     Period::DEFAULT,
//!     FixedClock::new(1_672_531_205),
//! )?;
//!
//! assert_eq!(generator.seconds_until_next_code(), 25);
//! let qr_data = generator.current_qr_data(12345);
//! assert!(qr_data.starts_with(r#"{"sessionId":12345,"totp":""#));
//! # Ok::<(), secure_qr::Error>(())
//! ```

pub mod base32;
pub mod config;
pub mod consumer;
pub mod error;
pub mod generator;
pub mod otp;
pub mod payload;
pub mod render;
pub mod scan;
pub mod ticker;
pub mod time;

pub use base32::{SecretKey, decode_secret, encode_secret};
pub use config::GeneratorConfig;
pub use error::{ConfigError, DecodingError, Error, RenderError, Result, ScanError};
pub use generator::{DynamicCodeGenerator, Frame, Period};
pub use otp::{Algorithm, Digits};
pub use payload::{ParsedPayload, Payload};
pub use ticker::{Ticker, TickerHandle};
pub use time::{FixedClock, SystemClock, TimeSource};
