use anyhow::Context as _;
use reqwest::Client;
use serde_json::json;

use crate::config::MailConfig;
use crate::domain::repository::Mailer;
use crate::domain::types::OutgoingEmail;
use crate::error::StoreError;

/// Sends email through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    pub client: Client,
    pub config: MailConfig,
}

impl ResendMailer {
    fn from_header(&self) -> String {
        format!("{} <{}>", self.config.from_name, self.config.from_address)
    }
}

impl Mailer for ResendMailer {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), StoreError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Ok(());
        };
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({
                "from": self.from_header(),
                "to": [email.to],
                "subject": email.subject,
                "html": email.html,
            }))
            .send()
            .await
            .context("send email")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("mail provider returned {status}: {body}").into());
        }
        Ok(())
    }
}
