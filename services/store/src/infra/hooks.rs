use anyhow::Context as _;
use reqwest::Client;
use serde_json::Value;

use crate::domain::repository::HookTransport;

/// Posts hook envelopes as JSON. Any HTTP status counts as delivered.
#[derive(Clone)]
pub struct HttpHookTransport {
    pub client: Client,
}

impl HookTransport for HttpHookTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<u16, anyhow::Error> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .with_context(|| format!("post hook to {url}"))?;
        Ok(response.status().as_u16())
    }
}
