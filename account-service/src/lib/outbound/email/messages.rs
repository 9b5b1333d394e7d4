use crate::domain::user::models::User;
use crate::user::errors::EmailDeliveryError;

/// Plain-text email ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl EmailMessage {
    /// Build the email verification message for a freshly registered user.
    ///
    /// # Errors
    /// * `CompositionFailed` - Link is empty
    pub fn email_verification(
        from: &str,
        user: &User,
        verification_link: &str,
    ) -> Result<Self, EmailDeliveryError> {
        Self::with_link(
            from,
            user,
            "Verify Your Email",
            "Welcome! We're excited to have you on board.\n\n\
             To get started, please verify your email address by opening the link below:",
            verification_link,
            "If you did not create an account, no further action is required on your part.",
        )
    }

    /// Build the password reset message.
    ///
    /// # Errors
    /// * `CompositionFailed` - Link is empty
    pub fn password_reset(
        from: &str,
        user: &User,
        reset_link: &str,
    ) -> Result<Self, EmailDeliveryError> {
        Self::with_link(
            from,
            user,
            "Reset Your Password",
            "You have requested to reset your password.\n\n\
             To reset your password, please open the link below:",
            reset_link,
            "If you did not request a password reset, you can ignore this email.",
        )
    }

    fn with_link(
        from: &str,
        user: &User,
        subject: &str,
        intro: &str,
        link: &str,
        outro: &str,
    ) -> Result<Self, EmailDeliveryError> {
        if link.is_empty() {
            return Err(EmailDeliveryError::CompositionFailed(
                "missing action link".to_string(),
            ));
        }

        Ok(Self {
            from: from.to_string(),
            to: user.email.to_string(),
            subject: subject.to_string(),
            text: format!(
                "Hi {},\n\n{}\n\n{}\n\n{}\n",
                user.username, intro, link, outro
            ),
        })
    }
}
