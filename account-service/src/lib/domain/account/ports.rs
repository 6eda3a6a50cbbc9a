use async_trait::async_trait;

use crate::account::errors::AuthError;
use crate::account::errors::NotifierError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::RegisterCommand;

/// Port for the authentication facade.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new, unverified account and send a verification token.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email or username already registered
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AuthError>;

    /// Authenticate with email and password, returning a session token.
    ///
    /// # Errors
    /// * `BadCredentials` - Unknown email or wrong password
    /// * `NotVerified` - Account email has not been verified
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Check credentials, then generate and send a one-time passcode.
    ///
    /// # Errors
    /// * `BadCredentials` - Unknown email or wrong password
    async fn request_otp(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Consume a one-time passcode and return a session token.
    ///
    /// # Errors
    /// * `InvalidOrExpiredOtp` - No live code, expired, or mismatch
    /// * `NotFound` - Account disappeared between code issuance and check
    async fn verify_otp(&self, email: &str, code: &str) -> Result<String, AuthError>;

    /// Mark the account named by a verification token as verified.
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Bad signature, expired, or unknown subject
    /// * `AlreadyVerified` - Account is already verified
    async fn verify_email(&self, token: &str) -> Result<(), AuthError>;

    /// Issue and send a password-reset token for an existing account.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Set a new password for the account named by a reset token.
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Bad signature, expired, or malformed
    /// * `NotFound` - No account with the token's subject
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError>;

    /// Look up an account by email.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    async fn account_by_email(&self, email: &str) -> Result<Account, AuthError>;
}

/// Persistence operations for the account aggregate.
///
/// The store enforces uniqueness on email and username atomically.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email or username already registered
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, account: Account) -> Result<Account, AuthError>;

    /// Retrieve an account by email address.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    /// Mark an account as verified.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Store operation failed
    async fn set_verified(&self, id: &AccountId) -> Result<(), AuthError>;

    /// Replace an account's stored password hash.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Store operation failed
    async fn set_password_hash(&self, id: &AccountId, password_hash: &str)
        -> Result<(), AuthError>;
}

/// Outbound message handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Email-verification token to embed in a confirmation link.
    EmailVerification { token: String },

    /// Short-lived numeric login code.
    OneTimeCode { code: String },

    /// Password-reset token to embed in a reset link.
    PasswordReset { token: String },
}

/// Outbound notification delivery.
///
/// Fire-and-forget from the core's perspective: the service logs delivery
/// failures and proceeds, it never fails an operation on them.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver a notification to a recipient address.
    ///
    /// # Errors
    /// * `DeliveryFailed` - The message could not be handed off
    async fn send(
        &self,
        recipient: &str,
        notification: Notification,
    ) -> Result<(), NotifierError>;
}
