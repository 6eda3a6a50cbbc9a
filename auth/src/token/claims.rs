use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim set carried by every issued token.
///
/// Deliberately minimal: a subject identifying the account and absolute
/// issuance/expiry timestamps. Validity is fully determined by the
/// signature and `exp` at verification time; no server-side record exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identity, the email address)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for a subject expiring `ttl` from now.
    pub fn new(subject: impl ToString, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Expiry as a UTC timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_expiry_relative_to_issuance() {
        let claims = Claims::new("alice@example.com", Duration::minutes(15));

        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_expires_at_matches_exp() {
        let claims = Claims::new("alice@example.com", Duration::seconds(60));
        let expires_at = claims.expires_at().expect("valid timestamp");
        assert_eq!(expires_at.timestamp(), claims.exp);
    }
}
