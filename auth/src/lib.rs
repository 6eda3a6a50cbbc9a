//! Authentication primitives library
//!
//! Provides the credential and short-lived-secret building blocks for the
//! account service:
//! - Password hashing (Argon2id)
//! - Signed bearer-token issuance and validation
//! - One-time-passcode generation, storage, and single-use consumption
//!
//! The crate is free of I/O and framework types; the service composes these
//! primitives with its own persistence and delivery adapters.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let token = issuer.issue("alice@example.com", None).unwrap();
//! let subject = issuer.validate(&token).unwrap();
//! assert_eq!(subject, "alice@example.com");
//! ```
//!
//! ## One-Time Passcodes
//! ```
//! use auth::OtpManager;
//!
//! let otp = OtpManager::with_defaults();
//! let code = otp.generate();
//! otp.store("alice@example.com", &code);
//! assert!(otp.verify_and_consume("alice@example.com", &code));
//! assert!(!otp.verify_and_consume("alice@example.com", &code));
//! ```

pub mod otp;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use otp::OtpManager;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenIssuer;
