use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::Rng;

/// A stored one-time passcode awaiting consumption.
#[derive(Debug, Clone)]
struct OtpRecord {
    code: String,
    expires_at: DateTime<Utc>,
}

/// Generates, stores, and consumes one-time passcodes.
///
/// Codes are fixed-length numeric strings drawn from the operating
/// system's CSPRNG. At most one live record exists per identity; storing a
/// new code overwrites the previous one. A record is removed when it is
/// consumed successfully or found expired. A mismatched code leaves the
/// record intact, so the holder may retry until the code expires.
///
/// Records are held in memory behind a single mutex and do not survive a
/// process restart. The lock is only taken for map operations and is never
/// held across I/O.
pub struct OtpManager {
    records: Mutex<HashMap<String, OtpRecord>>,
    code_length: usize,
    ttl: Duration,
}

impl OtpManager {
    pub const DEFAULT_CODE_LENGTH: usize = 6;
    pub const DEFAULT_TTL_SECONDS: i64 = 300;

    /// Create a manager with explicit code length and record lifetime.
    pub fn new(code_length: usize, ttl: Duration) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            code_length,
            ttl,
        }
    }

    /// Create a manager with 6-digit codes valid for 300 seconds.
    pub fn with_defaults() -> Self {
        Self::new(
            Self::DEFAULT_CODE_LENGTH,
            Duration::seconds(Self::DEFAULT_TTL_SECONDS),
        )
    }

    /// Generate a fresh numeric code.
    ///
    /// Each digit is drawn independently and uniformly from the OS CSPRNG.
    pub fn generate(&self) -> String {
        let mut rng = OsRng;
        (0..self.code_length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Store a code for `identity`, replacing any existing record.
    ///
    /// The record expires the configured lifetime from now.
    pub fn store(&self, identity: &str, code: &str) {
        let record = OtpRecord {
            code: code.to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        self.lock().insert(identity.to_string(), record);
    }

    /// Check a supplied code and consume the record on a terminal outcome.
    ///
    /// Returns true exactly once for a matching, unexpired code. An expired
    /// record is removed and reported as false. A mismatched code is
    /// reported as false but leaves the record in place, permitting retries
    /// until the code is guessed or expires naturally.
    pub fn verify_and_consume(&self, identity: &str, code: &str) -> bool {
        let mut records = self.lock();

        let Some(record) = records.get(identity) else {
            return false;
        };

        if Utc::now() > record.expires_at {
            records.remove(identity);
            return false;
        }

        if record.code == code {
            records.remove(identity);
            return true;
        }

        false
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, OtpRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> OtpManager {
        OtpManager::with_defaults()
    }

    #[test]
    fn test_generate_is_fixed_length_digits() {
        let otp = manager();

        for _ in 0..32 {
            let code = otp.generate();
            assert_eq!(code.len(), OtpManager::DEFAULT_CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_respects_configured_length() {
        let otp = OtpManager::new(8, Duration::seconds(300));
        assert_eq!(otp.generate().len(), 8);
    }

    #[test]
    fn test_generate_is_not_reproducible() {
        let otp = manager();

        // With 6 uniform digits, 64 draws collapsing to one value would
        // only happen with a broken randomness source.
        let codes: std::collections::HashSet<String> =
            (0..64).map(|_| otp.generate()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_consume_succeeds_exactly_once() {
        let otp = manager();
        otp.store("alice@example.com", "123456");

        assert!(otp.verify_and_consume("alice@example.com", "123456"));
        assert!(!otp.verify_and_consume("alice@example.com", "123456"));
    }

    #[test]
    fn test_unknown_identity_is_false() {
        let otp = manager();
        assert!(!otp.verify_and_consume("nobody@example.com", "123456"));
    }

    #[test]
    fn test_wrong_code_leaves_record_intact() {
        let otp = manager();
        otp.store("alice@example.com", "123456");

        assert!(!otp.verify_and_consume("alice@example.com", "000000"));
        // The correct code still works after a failed attempt.
        assert!(otp.verify_and_consume("alice@example.com", "123456"));
    }

    #[test]
    fn test_store_overwrites_previous_code() {
        let otp = manager();
        otp.store("alice@example.com", "111111");
        otp.store("alice@example.com", "222222");

        assert!(!otp.verify_and_consume("alice@example.com", "111111"));
        assert!(otp.verify_and_consume("alice@example.com", "222222"));
    }

    #[test]
    fn test_expired_record_is_removed() {
        let otp = OtpManager::new(6, Duration::seconds(-1));
        otp.store("alice@example.com", "123456");

        assert!(!otp.verify_and_consume("alice@example.com", "123456"));
        // The record was deleted on the expired check, not left behind.
        assert!(!otp.verify_and_consume("alice@example.com", "123456"));
    }

    #[test]
    fn test_identities_are_independent() {
        let otp = manager();
        otp.store("alice@example.com", "111111");
        otp.store("bob@example.com", "222222");

        assert!(otp.verify_and_consume("alice@example.com", "111111"));
        assert!(otp.verify_and_consume("bob@example.com", "222222"));
    }
}
