use std::sync::Arc;

use async_trait::async_trait;
use auth::OtpManager;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Duration;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::RegisterCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthServicePort;
use crate::account::ports::Notification;
use crate::account::ports::Notifier;

/// Authentication facade.
///
/// Composes the password hasher, token issuer, and OTP manager with the
/// account repository and notifier ports to implement the login,
/// verification, and reset flows. Notification failures are logged and
/// swallowed; they never fail the operation that triggered them.
pub struct AuthService<R, N>
where
    R: AccountRepository,
    N: Notifier,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
    otp_manager: OtpManager,
    access_token_ttl: Duration,
}

impl<R, N> AuthService<R, N>
where
    R: AccountRepository,
    N: Notifier,
{
    /// Create a new service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `notifier` - Outbound notification implementation
    /// * `token_issuer` - Shared token issuer (also used by HTTP middleware)
    /// * `otp_manager` - One-time-passcode store
    /// * `access_token_ttl` - Lifetime of session tokens
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        token_issuer: Arc<TokenIssuer>,
        otp_manager: OtpManager,
        access_token_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            notifier,
            password_hasher: PasswordHasher::new(),
            token_issuer,
            otp_manager,
            access_token_ttl,
        }
    }

    /// Look up credentials and check the password, collapsing an unknown
    /// email and a wrong password into the same failure.
    async fn checked_account(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let account = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        if !self.password_hasher.verify(password, &account.password_hash) {
            return Err(AuthError::BadCredentials);
        }

        Ok(account)
    }

    fn issue_session_token(&self, email: &str) -> Result<String, AuthError> {
        self.token_issuer
            .issue(email, Some(self.access_token_ttl))
            .map_err(|e| AuthError::Unknown(format!("Token issuance failed: {}", e)))
    }

    async fn notify(&self, recipient: &str, notification: Notification) {
        if let Err(e) = self.notifier.send(recipient, notification).await {
            tracing::error!(recipient, "Failed to deliver notification: {}", e);
        }
    }
}

#[async_trait]
impl<R, N> AuthServicePort for AuthService<R, N>
where
    R: AccountRepository,
    N: Notifier,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AuthError> {
        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| AuthError::Unknown(format!("Password hashing failed: {}", e)))?;

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            is_verified: false,
            is_admin: false,
            created_at: Utc::now(),
        };

        let created = self.repository.create(account).await?;

        // Verification tokens use the issuer's short default lifetime.
        let token = self
            .token_issuer
            .issue(created.email.as_str(), None)
            .map_err(|e| AuthError::Unknown(format!("Token issuance failed: {}", e)))?;

        self.notify(
            created.email.as_str(),
            Notification::EmailVerification { token },
        )
        .await;

        Ok(created)
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let account = self.checked_account(email, password).await?;

        if !account.is_verified {
            return Err(AuthError::NotVerified);
        }

        self.issue_session_token(account.email.as_str())
    }

    async fn request_otp(&self, email: &str, password: &str) -> Result<(), AuthError> {
        // Password check only; an unverified account may still request a
        // code. Verification gates password login, not the OTP flow.
        let account = self.checked_account(email, password).await?;

        let code = self.otp_manager.generate();
        self.otp_manager.store(account.email.as_str(), &code);

        self.notify(account.email.as_str(), Notification::OneTimeCode { code })
            .await;

        Ok(())
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<String, AuthError> {
        if !self.otp_manager.verify_and_consume(email, code) {
            return Err(AuthError::InvalidOrExpiredOtp);
        }

        let account = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        self.issue_session_token(account.email.as_str())
    }

    async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let subject = self.token_issuer.validate(token).map_err(|e| {
            tracing::debug!("Verification token rejected: {}", e);
            AuthError::InvalidOrExpiredToken
        })?;

        // An unknown subject is indistinguishable from a forged token.
        let account = self
            .repository
            .find_by_email(&subject)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        if account.is_verified {
            return Err(AuthError::AlreadyVerified);
        }

        self.repository.set_verified(&account.id).await
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let account = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        let token = self
            .token_issuer
            .issue(account.email.as_str(), None)
            .map_err(|e| AuthError::Unknown(format!("Token issuance failed: {}", e)))?;

        self.notify(account.email.as_str(), Notification::PasswordReset { token })
            .await;

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let subject = self.token_issuer.validate(token).map_err(|e| {
            tracing::debug!("Reset token rejected: {}", e);
            AuthError::InvalidOrExpiredToken
        })?;

        let account = self
            .repository
            .find_by_email(&subject)
            .await?
            .ok_or_else(|| AuthError::NotFound(subject.clone()))?;

        let password_hash = self
            .password_hasher
            .hash(new_password)
            .map_err(|e| AuthError::Unknown(format!("Password hashing failed: {}", e)))?;

        self.repository
            .set_password_hash(&account.id, &password_hash)
            .await
    }

    async fn account_by_email(&self, email: &str) -> Result<Account, AuthError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))
    }
}
