//! Invariants that must hold for every key, counter and clock reading.

use proptest::prelude::*;
use secure_qr::otp::{self, Algorithm, Digits};
use secure_qr::payload::{self, ParsedPayload};
use secure_qr::{DynamicCodeGenerator, FixedClock, Payload, Period, decode_secret, encode_secret};

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![Just(Algorithm::Sha1), Just(Algorithm::Sha256), Just(Algorithm::Sha512)]
}

proptest! {
    #[test]
    fn code_has_exact_width(
        key in proptest::collection::vec(any::<u8>(), 0..64),
        counter in any::<u64>(),
        digits in 1u32..=10,
        algorithm in algorithm(),
    ) {
        let digits = Digits::new(digits).unwrap();
        let code = otp::generate(&key, counter, digits, algorithm);
        prop_assert_eq!(code.len(), digits.get() as usize);
        prop_assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn code_is_deterministic(
        key in proptest::collection::vec(any::<u8>(), 1..40),
        counter in any::<u64>(),
    ) {
        let first = otp::generate(&key, counter, Digits::SIX, Algorithm::Sha256);
        let second = otp::generate(&key, counter, Digits::SIX, Algorithm::Sha256);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn countdown_stays_within_period(epoch in 0u64..=u64::MAX / 2, period in 1u64..=3600) {
        let generator = DynamicCodeGenerator::with_time_source(
            "JBSWY3DPEHPK3PXP",
            Period::new(period).unwrap(),
            FixedClock::new(epoch),
        ).unwrap();
        let remaining = generator.seconds_until_next_code();
        prop_assert!((1..=period).contains(&remaining));
        prop_assert_eq!(remaining, period - epoch % period);
    }

    #[test]
    fn code_is_stable_within_a_period(start in 0u64..4_000_000_000, offset in 0u64..30) {
        let clock = FixedClock::new(start - start % 30);
        let generator =
            DynamicCodeGenerator::with_time_source("JBSWY3DPEHPK3PXP", Period::DEFAULT, &clock)
                .unwrap();
        let first = generator.current_code();
        clock.advance(offset);
        prop_assert_eq!(generator.current_code(), first);
    }

    #[test]
    fn base32_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        let encoded = encode_secret(&bytes);
        let key = decode_secret(&encoded).unwrap();
        prop_assert_eq!(key.as_bytes(), bytes.as_slice());

        let lower = decode_secret(&encoded.to_lowercase()).unwrap();
        prop_assert_eq!(lower.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn payload_round_trip(session_id in any::<i64>(), code in "[0-9]{6}") {
        let payload = Payload::new(session_id, code);
        prop_assert_eq!(payload::parse(&payload.encode()), ParsedPayload::Structured(payload));
    }

    #[test]
    fn parser_never_panics(raw in ".*") {
        let parsed = payload::parse(&raw);
        if let ParsedPayload::Unstructured { raw: kept, .. } = parsed {
            prop_assert_eq!(kept, raw);
        }
    }
}
