use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::account::errors::AuthError;
use account_service::account::errors::NotifierError;
use account_service::account::models::Account;
use account_service::account::models::AccountId;
use account_service::account::ports::AccountRepository;
use account_service::account::ports::Notification;
use account_service::account::ports::Notifier;
use account_service::domain::account::service::AuthService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::OtpManager;
use auth::TokenIssuer;
use chrono::Duration;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-token-signing-at-least-32-bytes";

/// Test application that spawns a real server against in-memory adapters.
///
/// The recording notifier stands in for email delivery, which lets tests
/// fish the verification tokens and OTP codes out of the "outbox".
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub outbox: Outbox,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::new());
        let outbox = Outbox::new();
        let notifier = Arc::new(RecordingNotifier {
            outbox: outbox.clone(),
        });

        let token_issuer = Arc::new(TokenIssuer::new(TEST_SECRET));
        let auth_service = Arc::new(AuthService::new(
            repository,
            notifier,
            Arc::clone(&token_issuer),
            OtpManager::with_defaults(),
            Duration::hours(24),
        ));

        let router = create_router(auth_service, token_issuer);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            outbox,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }
}

/// Captured notifications, newest last.
#[derive(Clone)]
pub struct Outbox {
    sent: Arc<Mutex<Vec<(String, Notification)>>>,
}

impl Outbox {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(&self, recipient: String, notification: Notification) {
        self.sent.lock().unwrap().push((recipient, notification));
    }

    pub fn last_verification_token(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|(_, n)| match n {
                Notification::EmailVerification { token } => Some(token.clone()),
                _ => None,
            })
    }

    pub fn last_otp_code(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|(_, n)| match n {
                Notification::OneTimeCode { code } => Some(code.clone()),
                _ => None,
            })
    }

    pub fn last_reset_token(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|(_, n)| match n {
                Notification::PasswordReset { token } => Some(token.clone()),
                _ => None,
            })
    }
}

struct RecordingNotifier {
    outbox: Outbox,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        recipient: &str,
        notification: Notification,
    ) -> Result<(), NotifierError> {
        self.outbox.push(recipient.to_string(), notification);
        Ok(())
    }
}

/// In-memory account store with the same uniqueness contract as Postgres.
struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AuthError> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.contains_key(account.email.as_str()) {
            return Err(AuthError::DuplicateIdentity(
                account.email.as_str().to_string(),
            ));
        }
        if accounts
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(AuthError::DuplicateIdentity(
                account.username.as_str().to_string(),
            ));
        }

        accounts.insert(account.email.as_str().to_string(), account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.accounts.lock().unwrap().get(email).cloned())
    }

    async fn set_verified(&self, id: &AccountId) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|account| account.id == *id)
            .ok_or_else(|| AuthError::NotFound(id.to_string()))?;
        account.is_verified = true;
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: &AccountId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|account| account.id == *id)
            .ok_or_else(|| AuthError::NotFound(id.to_string()))?;
        account.password_hash = password_hash.to_string();
        Ok(())
    }
}
