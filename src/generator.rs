//! Rotating payload generator.
//!
//! A [`DynamicCodeGenerator`] owns one session secret and answers two
//! questions on demand: what the payload is right now, and how long until it
//! changes. It holds no mutable state, so one instance can be shared freely
//! between threads.

use crate::base32::{SecretKey, decode_secret};
use crate::config::GeneratorConfig;
use crate::error::{ConfigError, Result};
use crate::otp::{self, Algorithm, Digits};
use crate::payload::Payload;
use crate::time::{SystemClock, TimeSource};

pub const DIGITS: Digits = Digits::SIX;
pub const ALGORITHM: Algorithm = Algorithm::Sha256;

/// Seconds a code stays valid. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period(u64);

impl Period {
    pub const DEFAULT: Period = Period(30);

    pub fn new(seconds: u64) -> std::result::Result<Self, ConfigError> {
        if seconds == 0 {
            return Err(ConfigError::NonPositivePeriod(0));
        }
        Ok(Self(seconds))
    }

    pub const fn seconds(self) -> u64 {
        self.0
    }

    pub fn counter_at(self, epoch: u64) -> u64 {
        epoch / self.0
    }

    /// Always in `[1, period]`; a period boundary reports the full period.
    pub fn remaining_at(self, epoch: u64) -> u64 {
        self.0 - epoch % self.0
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Period {
    type Error = ConfigError;

    fn try_from(seconds: i64) -> std::result::Result<Self, Self::Error> {
        match u64::try_from(seconds) {
            Ok(seconds) if seconds > 0 => Ok(Self(seconds)),
            _ => Err(ConfigError::NonPositivePeriod(seconds)),
        }
    }
}

/// Everything a display needs for one refresh, taken from a single clock read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub payload: Payload,
    pub qr_data: String,
    pub counter: u64,
    pub seconds_remaining: u64,
}

#[derive(Debug)]
pub struct DynamicCodeGenerator<T = SystemClock> {
    key: SecretKey,
    period: Period,
    clock: T,
}

impl DynamicCodeGenerator<SystemClock> {
    /// 30 second codes on the wall clock.
    pub fn new(secret: &str) -> Result<Self> {
        Self::with_period(secret, Period::DEFAULT)
    }

    pub fn with_period(secret: &str, period: Period) -> Result<Self> {
        Self::with_time_source(secret, period, SystemClock)
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let period = Period::try_from(config.period)?;
        Self::with_period(&config.secret, period)
    }
}

impl<T: TimeSource> DynamicCodeGenerator<T> {
    pub fn with_time_source(secret: &str, period: Period, clock: T) -> Result<Self> {
        let key = decode_secret(secret)?;
        tracing::debug!(period = period.seconds(), key_len = key.len(), "code generator ready");
        Ok(Self { key, period, clock })
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn time_source(&self) -> &T {
        &self.clock
    }

    pub fn current_counter(&self) -> u64 {
        self.period.counter_at(self.clock.now())
    }

    pub fn current_code(&self) -> String {
        self.code_at(self.clock.now())
    }

    /// Code for an arbitrary epoch second, independent of the time source.
    pub fn code_at(&self, epoch: u64) -> String {
        let counter = self.period.counter_at(epoch);
        otp::generate(self.key.as_bytes(), counter, DIGITS, ALGORITHM)
    }

    pub fn current_payload(&self, session_id: i64) -> Payload {
        Payload::new(session_id, self.current_code())
    }

    /// The encoded payload, ready for a QR encoder.
    pub fn current_qr_data(&self, session_id: i64) -> String {
        self.current_payload(session_id).encode()
    }

    pub fn seconds_until_next_code(&self) -> u64 {
        self.period.remaining_at(self.clock.now())
    }

    pub fn frame(&self, session_id: i64) -> Frame {
        let now = self.clock.now();
        let counter = self.period.counter_at(now);
        let payload = Payload::new(session_id, self.code_at(now));
        tracing::trace!(counter, "frame generated");

        Frame {
            qr_data: payload.encode(),
            payload,
            counter,
            seconds_remaining: self.period.remaining_at(now),
        }
    }
}
