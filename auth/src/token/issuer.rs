use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and validates signed, time-bounded bearer tokens.
///
/// Tokens are compact JWS structures signed with HS256 (HMAC with SHA-256)
/// using a process-wide secret. Validation is a pure function of the token,
/// the current time, and the secret; there is no shared mutable state and
/// no revocation before expiry.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenIssuer {
    /// Applied when a caller does not supply an explicit lifetime.
    pub const DEFAULT_TTL_MINUTES: i64 = 15;

    /// Create a new issuer from a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed token for `subject`.
    ///
    /// # Arguments
    /// * `subject` - Account identity embedded in the `sub` claim
    /// * `ttl` - Token lifetime; defaults to 15 minutes when `None`
    ///
    /// # Returns
    /// Opaque token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(Self::DEFAULT_TTL_MINUTES));
        let claims = Claims::new(subject, ttl);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// Signature and expiry are checked atomically with zero leeway.
    ///
    /// # Arguments
    /// * `token` - Token string to validate
    ///
    /// # Returns
    /// The `sub` claim of a valid token
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match (tampering, wrong secret)
    /// * `Expired` - Current time is past the embedded expiry
    /// * `Malformed` - The structure cannot be parsed
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_issue_and_validate() {
        let issuer = TokenIssuer::new(SECRET);

        let token = issuer
            .issue("alice@example.com", Some(Duration::minutes(60)))
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let subject = issuer.validate(&token).expect("Failed to validate token");
        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn test_default_ttl_applies() {
        let issuer = TokenIssuer::new(SECRET);

        let token = issuer
            .issue("alice@example.com", None)
            .expect("Failed to issue token");
        let subject = issuer.validate(&token).expect("Failed to validate token");
        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);

        let token = issuer
            .issue("alice@example.com", Some(Duration::seconds(-30)))
            .expect("Failed to issue token");

        let result = issuer.validate(&token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let other = TokenIssuer::new(b"a_different_secret_32_bytes_long!!!");

        let token = issuer
            .issue("alice@example.com", Some(Duration::minutes(5)))
            .expect("Failed to issue token");

        let result = other.validate(&token);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);

        let token = issuer
            .issue("alice@example.com", Some(Duration::minutes(5)))
            .expect("Failed to issue token");

        // Swap the payload segment for one claiming a different subject.
        let forged = issuer
            .issue("mallory@example.com", Some(Duration::minutes(5)))
            .expect("Failed to issue token");

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];
        let spliced = parts.join(".");

        let result = issuer.validate(&spliced);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let issuer = TokenIssuer::new(SECRET);

        let result = issuer.validate("not.a.token");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }
}
