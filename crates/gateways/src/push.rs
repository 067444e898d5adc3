use std::collections::BTreeMap;

use async_trait::async_trait;
use engine::{GatewayError, Notifier, PushMessage};
use reqwest::{Url, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};

use crate::{rejected, unreachable};

#[derive(Clone, Debug, Deserialize)]
pub struct PushConfig {
    pub endpoint: String,
    pub server_key: String,
}

#[derive(Debug, Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    to: &'a str,
    notification: Notification<'a>,
    data: &'a BTreeMap<String, String>,
}

fn payload(message: &PushMessage) -> Payload<'_> {
    Payload {
        to: &message.token,
        notification: Notification {
            title: &message.title,
            body: &message.body,
        },
        data: &message.data,
    }
}

/// Push notifier speaking the FCM legacy HTTP protocol.
#[derive(Debug, Clone)]
pub struct HttpPushNotifier {
    endpoint: Url,
    server_key: String,
    http: reqwest::Client,
}

impl HttpPushNotifier {
    pub fn new(config: &PushConfig) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|err| {
            GatewayError::Unreachable(format!("invalid push endpoint: {err}"))
        })?;
        Ok(Self {
            endpoint,
            server_key: config.server_key.clone(),
            http: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl Notifier for HttpPushNotifier {
    async fn push(&self, message: PushMessage) -> Result<(), GatewayError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("key={}", self.server_key))
            .json(&payload(&message))
            .send()
            .await
            .map_err(unreachable)?;

        if res.status().is_success() {
            tracing::debug!("push \"{}\" delivered", message.title);
            return Ok(());
        }
        Err(rejected(res).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_nests_notification_and_data() {
        let message = PushMessage::new("device-1", "Hello", "World")
            .with_data("type", "family_invite")
            .with_data("link_id", "abc");

        let json = serde_json::to_value(payload(&message)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "to": "device-1",
                "notification": { "title": "Hello", "body": "World" },
                "data": { "link_id": "abc", "type": "family_invite" }
            })
        );
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let config = PushConfig {
            endpoint: "not a url".to_string(),
            server_key: "k".to_string(),
        };
        assert!(HttpPushNotifier::new(&config).is_err());
    }
}
