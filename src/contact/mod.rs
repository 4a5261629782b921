//! The contact form: validation and hand-off to the email provider.

mod mailer;

pub use mailer::{Mailer, OutgoingEmail, ResendMailer};

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::error::ContactError;
use crate::render::escape_html;

pub const MISSING_FIELDS: &str = "All fields are required";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const DELIVERY_FAILED: &str = "Failed to send message. Please try again later.";
pub const DELIVERED: &str = "Message sent successfully! We will get back to you soon.";

pub const DEFAULT_RECIPIENT: &str = "contact@teamstaircase.com";
pub const DEFAULT_SENDER: &str = "Team Staircase <onboarding@resend.dev>";

/// A contact form submission. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Where contact messages go.
#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub recipient: String,
    pub sender: String,
    pub site_name: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            site_name: "Team Staircase".to_string(),
        }
    }
}

/// Body of a successful submission response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactReceipt {
    pub success: bool,
    pub message: &'static str,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactError> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ContactError::Validation(MISSING_FIELDS));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ContactError::Validation(INVALID_EMAIL));
        }
        Ok(())
    }

    /// Build the notification email for this submission.
    pub fn to_email(&self, settings: &ContactSettings) -> OutgoingEmail {
        let name = escape_html(self.name.trim());
        let email = escape_html(self.email.trim());
        let subject = escape_html(self.subject.trim());
        let message = escape_html(&self.message).replace("\r\n", "\n").replace('\n', "<br>");

        let html = format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;\">\
             <h2>New contact message</h2>\
             <p><strong>Name:</strong> {name}</p>\
             <p><strong>Email:</strong> {email}</p>\
             <p><strong>Subject:</strong> {subject}</p>\
             <p><strong>Message:</strong></p>\
             <p style=\"white-space: pre-wrap; line-height: 1.6;\">{message}</p>\
             <p style=\"font-size: 12px;\">Sent from the {} website contact form.</p>\
             </div>",
            escape_html(&settings.site_name)
        );

        OutgoingEmail {
            from: settings.sender.clone(),
            to: vec![settings.recipient.clone()],
            reply_to: self.email.trim().to_string(),
            subject: format!("[Contact] {} - {}", self.subject.trim(), self.name.trim()),
            html,
        }
    }
}

/// Validate `form` and forward it to `mailer`. Exactly one delivery attempt.
#[instrument(skip_all)]
pub async fn submit(
    mailer: &dyn Mailer,
    settings: &ContactSettings,
    form: &ContactForm,
) -> Result<ContactReceipt, ContactError> {
    form.validate()?;

    let email = form.to_email(settings);
    if let Err(e) = mailer.send(&email).await {
        error!(error = %e, "failed to deliver contact message");
        return Err(e);
    }

    info!("contact message delivered");
    Ok(ContactReceipt {
        success: true,
        message: DELIVERED,
    })
}

/// One `@`, a non-empty local part, and a domain with a dot that is neither
/// its first nor last character. No whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let domain: Vec<char> = domain.chars().collect();
    if local.is_empty() || domain.contains(&'@') || domain.len() < 3 {
        return false;
    }
    domain[1..domain.len() - 1].contains(&'.')
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), ContactError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                return Err(ContactError::Delivery("provider down".to_string()));
            }
            Ok(())
        }
    }

    fn form(name: &str, email: &str, subject: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_email_pattern() {
        for ok in ["a@b.co", "first.last@sub.example.org", "x@a..b"] {
            assert!(is_valid_email(ok), "{ok} should be valid");
        }
        for bad in [
            "bad", "a@b", "@b.co", "a@.co", "a@co.", "a@@b.co", "a@b@c.co", "a b@c.co", "a@b.c o",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_validation_errors() {
        let err = form("A", "bad", "S", "M").validate().unwrap_err();
        assert!(matches!(err, ContactError::Validation(INVALID_EMAIL)));

        let err = form("", "a@b.co", "S", "M").validate().unwrap_err();
        assert!(matches!(err, ContactError::Validation(MISSING_FIELDS)));

        let err = form("A", "a@b.co", "S", "   ").validate().unwrap_err();
        assert!(matches!(err, ContactError::Validation(MISSING_FIELDS)));

        assert!(form("A", "a@b.co", "S", "M").validate().is_ok());
    }

    #[test]
    fn test_email_composition() {
        let settings = ContactSettings::default();
        let email = form("Ana <3", "ana@example.com", "Collab", "Hi!\nLet's talk.").to_email(&settings);

        assert_eq!(email.subject, "[Contact] Collab - Ana <3");
        assert_eq!(email.reply_to, "ana@example.com");
        assert_eq!(email.to, vec![DEFAULT_RECIPIENT.to_string()]);
        assert!(email.html.contains("Ana &lt;3"));
        assert!(email.html.contains("Hi!<br>Let&#39;s talk."));
    }

    #[tokio::test]
    async fn test_submit_sends_with_reply_to() {
        let mailer = RecordingMailer::default();
        let settings = ContactSettings {
            recipient: "studio@example.com".to_string(),
            ..Default::default()
        };

        let receipt = submit(&mailer, &settings, &form("A", "a@b.co", "S", "M"))
            .await
            .unwrap();
        assert!(receipt.success);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "a@b.co");
        assert_eq!(sent[0].to, vec!["studio@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_mailer() {
        let mailer = RecordingMailer::default();
        let result = submit(
            &mailer,
            &ContactSettings::default(),
            &form("A", "bad", "S", "M"),
        )
        .await;
        assert!(result.is_err());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_single_attempt() {
        let mailer = RecordingMailer {
            fail: true,
            ..Default::default()
        };
        let result = submit(
            &mailer,
            &ContactSettings::default(),
            &form("A", "a@b.co", "S", "M"),
        )
        .await;
        assert!(matches!(result, Err(ContactError::Delivery(_))));
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }
}
