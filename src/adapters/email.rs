use crate::domain::ports::Mailer;
use crate::render::summary::EmailSummary;
use crate::utils::error::{DebtClearError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMAILJS_URL: &str = "https://api.emailjs.com";

/// Fixed service/template pair the summary email is sent through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJsConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_EMAILJS_URL.to_string()
}

impl Validate for EmailJsConfig {
    fn validate(&self) -> Result<()> {
        validate_url("email.api_url", &self.api_url)?;
        validate_non_empty_string("email.service_id", &self.service_id)?;
        validate_non_empty_string("email.template_id", &self.template_id)?;
        validate_non_empty_string("email.public_key", &self.public_key)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    to_name: &'a str,
    reply_to: &'a str,
    user_email: &'a str,
    months: String,
    strategy: &'a str,
    interest: &'a str,
    savings: &'a str,
    explanation: &'a str,
    target_date: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: TemplateParams<'a>,
}

pub struct EmailJsMailer {
    config: EmailJsConfig,
    client: Client,
}

impl EmailJsMailer {
    pub fn new(config: EmailJsConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn send_url(&self) -> String {
        format!(
            "{}/api/v1.0/email/send",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Mailer for EmailJsMailer {
    async fn send_summary(&self, summary: &EmailSummary) -> Result<bool> {
        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.access_token.as_deref(),
            template_params: TemplateParams {
                to_name: &summary.to_name,
                reply_to: &summary.to_email,
                user_email: &summary.to_email,
                months: summary.months.to_string(),
                strategy: &summary.strategy,
                interest: &summary.interest,
                savings: &summary.savings,
                explanation: &summary.explanation,
                target_date: &summary.target_date,
            },
        };

        tracing::debug!("Sending plan summary to {}", summary.to_email);
        let response = self
            .client
            .post(self.send_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| DebtClearError::EmailError {
                message: e.to_string(),
            })?;
        let status = response.status();

        if status.is_success() {
            tracing::info!("📧 Email sent to {}", summary.to_email);
            Ok(true)
        } else {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("❌ Email provider returned {}: {}", status, text);
            Ok(false)
        }
    }
}
