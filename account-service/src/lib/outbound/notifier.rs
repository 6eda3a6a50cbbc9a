use async_trait::async_trait;

use crate::account::errors::NotifierError;
use crate::account::ports::Notification;
use crate::account::ports::Notifier;

/// Notifier adapter that renders messages and emits them to the log.
///
/// Transport is deliberately out of scope here: an SMTP relay (or any
/// other channel) slots in behind the same `Notifier` port without the
/// service noticing. The rendered text matches what a mail adapter would
/// send, including the site links built from the configured base URL.
pub struct LoggingNotifier {
    site_url: String,
}

impl LoggingNotifier {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
        }
    }

    fn render(&self, notification: &Notification) -> (&'static str, String) {
        match notification {
            Notification::EmailVerification { token } => (
                "Verify Your Email",
                format!(
                    "Click to verify: {}/api/auth/verify-email?token={}",
                    self.site_url, token
                ),
            ),
            Notification::OneTimeCode { code } => (
                "Your Login Code",
                format!("Your OTP is: {} (valid for 5 minutes)", code),
            ),
            Notification::PasswordReset { token } => (
                "Reset Your Password",
                format!(
                    "This is your password reset link: {}/reset-password/{}",
                    self.site_url, token
                ),
            ),
        }
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send(
        &self,
        recipient: &str,
        notification: Notification,
    ) -> Result<(), NotifierError> {
        let (subject, body) = self.render(&notification);

        tracing::info!(recipient, subject, body, "Outbound notification");

        Ok(())
    }
}
