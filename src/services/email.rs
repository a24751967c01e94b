//! Digest delivery: SendGrid v3 or a dry-run printer.

use async_trait::async_trait;
use serde_json::json;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const SENDGRID_BASE: &str = "https://api.sendgrid.com";
/// Characters of HTML echoed by a dry run.
pub const DRY_RUN_PREVIEW_CHARS: usize = 3000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Missing env vars: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
    #[error("Email request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("SendGrid rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, subject: &str, html: &str) -> Result<(), EmailError>;
}

/// The first `max_chars` characters of `html`, never splitting a code point.
pub fn preview(html: &str, max_chars: usize) -> &str {
    match html.char_indices().nth(max_chars) {
        Some((idx, _)) => &html[..idx],
        None => html,
    }
}

/// Prints the subject and the start of the HTML to stdout.
pub struct DryRunSender;

#[async_trait]
impl EmailSender for DryRunSender {
    async fn send(&self, subject: &str, html: &str) -> Result<(), EmailError> {
        info!(subject = %subject, "DRY_RUN=1, printing digest instead of sending");
        println!("{}", subject);
        println!("{}", preview(html, DRY_RUN_PREVIEW_CHARS));
        Ok(())
    }
}

pub struct SendGridSender {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    to_email: String,
    from_email: String,
}

impl SendGridSender {
    /// Reads `SENDGRID_API_KEY`, `TO_EMAIL` and `FROM_EMAIL`, reporting every
    /// missing one at once.
    pub fn from_env() -> Result<Self, EmailError> {
        let lookup = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        let api_key = lookup("SENDGRID_API_KEY");
        let to_email = lookup("TO_EMAIL");
        let from_email = lookup("FROM_EMAIL");

        let missing: Vec<String> = [
            ("SENDGRID_API_KEY", api_key.is_none()),
            ("TO_EMAIL", to_email.is_none()),
            ("FROM_EMAIL", from_email.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| key.to_string())
        .collect();

        match (api_key, to_email, from_email) {
            (Some(api_key), Some(to_email), Some(from_email)) => {
                let base_url =
                    env::var("SENDGRID_BASE_URL").unwrap_or_else(|_| SENDGRID_BASE.to_string());
                let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
                Ok(Self::with_client(base_url, api_key, to_email, from_email, client))
            }
            _ => Err(EmailError::MissingEnv(missing)),
        }
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        to_email: impl Into<String>,
        from_email: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            to_email: to_email.into(),
            from_email: from_email.into(),
        }
    }
}

#[async_trait]
impl EmailSender for SendGridSender {
    async fn send(&self, subject: &str, html: &str) -> Result<(), EmailError> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": self.to_email }] }],
            "from": { "email": self.from_email },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        });

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(to = %self.to_email, status = status.as_u16(), "Digest email sent");
        Ok(())
    }
}
