use async_trait::async_trait;
use engine::{GatewayError, Mailer, OutgoingMail};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{rejected, unreachable};

#[derive(Clone, Debug, Deserialize)]
pub struct MailConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Sender address.
    pub from: String,
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Mailer posting JSON to a transactional mail API with a bearer key.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    endpoint: Url,
    api_key: String,
    from: String,
    http: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|err| {
            GatewayError::Unreachable(format!("invalid mail endpoint: {err}"))
        })?;
        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            from: config.from.clone(),
            http: reqwest::Client::new(),
        })
    }

    fn payload<'a>(&'a self, mail: &'a OutgoingMail) -> Payload<'a> {
        Payload {
            from: &self.from,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.body,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), GatewayError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&self.payload(&mail))
            .send()
            .await
            .map_err(unreachable)?;

        if res.status().is_success() {
            tracing::info!("mail \"{}\" sent to {}", mail.subject, mail.to);
            return Ok(());
        }
        Err(rejected(res).await)
    }
}
