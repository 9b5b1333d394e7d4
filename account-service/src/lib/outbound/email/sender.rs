use async_trait::async_trait;

use crate::config::Config;
use crate::domain::user::models::User;
use crate::outbound::email::messages::EmailMessage;
use crate::user::errors::EmailDeliveryError;
use crate::user::ports::EmailSender;

/// Email sender that hands messages to the log instead of an SMTP relay.
///
/// Recipient and subject are logged at `info`; the body, which holds the
/// single-use link, only at `debug`.
pub struct LogEmailSender {
    from: String,
}

impl LogEmailSender {
    /// # Arguments
    /// * `config` - Application configuration
    pub fn new(config: &Config) -> Self {
        tracing::info!(from = %config.email.from, "Email sender initialized (log transport)");
        Self {
            from: config.email.from.clone(),
        }
    }

    fn deliver(&self, message: EmailMessage) -> Result<(), EmailDeliveryError> {
        tracing::info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            "Email dispatched"
        );
        tracing::debug!(to = %message.to, body = %message.text, "Email body");
        Ok(())
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_email_verification(
        &self,
        user: &User,
        verification_link: &str,
    ) -> Result<(), EmailDeliveryError> {
        let message = EmailMessage::email_verification(&self.from, user, verification_link)?;
        self.deliver(message)
    }

    async fn send_password_reset(
        &self,
        user: &User,
        reset_link: &str,
    ) -> Result<(), EmailDeliveryError> {
        let message = EmailMessage::password_reset(&self.from, user, reset_link)?;
        self.deliver(message)
    }
}
