use anyhow::Context;
use async_trait::async_trait;

use super::{ContactMessage, Mailer};

const RESEND_URL: &str = "https://api.resend.com/emails";

pub struct ResendMailer {
    api_key: String,
    from: String,
    to: String,
    client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String, to: String) -> Self {
        Self {
            api_key,
            from,
            to,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &ContactMessage) -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": [self.to],
            "reply_to": message.email,
            "subject": message.subject(),
            "text": message.text_body(),
        });

        self.client
            .post(RESEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("failed to reach Resend")?
            .error_for_status()
            .context("Resend API returned error")?;

        tracing::info!(from = %message.email, "contact message delivered");
        Ok(())
    }
}
