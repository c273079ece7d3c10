pub mod resend;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactMessage, AppError> {
        let field = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let (Some(name), Some(email), Some(message)) =
            (field(&self.name), field(&self.email), field(&self.message))
        else {
            return Err(AppError::Validation(
                "Name, email, and message are required".to_string(),
            ));
        };
        if !email.contains('@') {
            return Err(AppError::Validation(format!("invalid email: {email}")));
        }
        Ok(ContactMessage {
            name,
            email,
            phone: field(&self.phone),
            message,
        })
    }
}

impl ContactMessage {
    pub fn subject(&self) -> String {
        format!("New contact form submission from {}", self.name)
    }

    pub fn text_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}\n",
            self.name,
            self.email,
            self.phone.as_deref().unwrap_or("Not provided"),
            self.message
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> anyhow::Result<()>;
}

/// Writes submissions to the log instead of delivering them. Used when no
/// mail API key is configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &ContactMessage) -> anyhow::Result<()> {
        tracing::info!(
            name = %message.name,
            email = %message.email,
            "contact form submission (mail delivery not configured)"
        );
        tracing::debug!(body = %message.text_body(), "contact message");
        Ok(())
    }
}
