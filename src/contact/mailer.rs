use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::ContactError;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// A message ready to hand to the email provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

/// Delivers transactional email. One attempt per call.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ContactError>;
}

/// Sends email through the Resend HTTP API.
pub struct ResendMailer {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl ResendMailer {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_key)
    }

    pub fn with_client(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            http,
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint: RESEND_ENDPOINT.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ContactError> {
        let Some(api_key) = &self.api_key else {
            return Err(ContactError::Delivery("email api key is not configured".to_string()));
        };
        let body = serde_json::to_string(email)
            .map_err(|e| ContactError::Delivery(format!("failed to encode email: {e}")))?;

        debug!(to = ?email.to, "sending contact email");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ContactError::Delivery(format!("request to {} failed: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ContactError::Delivery(format!(
                "provider returned {status}: {detail}"
            )));
        }
        Ok(())
    }
}
