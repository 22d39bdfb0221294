use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::MailerConfig;

/// An email handed off to the relay.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Invalid mailer configuration: {0}")]
    Config(String),
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Relay rejected the message: {0}")]
    RelayRejected(String),
}

/// Client for the HTTP mail relay.
pub struct MailerClient {
    http_client: Client,
    base_url: String,
}

impl MailerClient {
    pub fn new(config: &MailerConfig) -> Result<Self, MailerError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MailerError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let url = format!("{}/send", self.base_url);

        tracing::debug!("Relaying email to {} via {}", email.to, url);

        let response = self
            .http_client
            .post(&url)
            .json(email)
            .send()
            .await
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::RelayRejected(format!("{}: {}", status, body)));
        }

        Ok(())
    }
}
