//! Push notification collaborator.
//!
//! The engine only knows the `Notifier` trait; the transport lives in the
//! `gateways` crate. Pushes are best-effort: failures are logged and never
//! change the outcome of the mutation that triggered them.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::GatewayError;

/// A push message addressed to one device token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

impl PushMessage {
    pub fn new(token: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            title: title.into(),
            body: body.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn push(&self, message: PushMessage) -> Result<(), GatewayError>;
}

/// Notifier used when no push gateway is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn push(&self, message: PushMessage) -> Result<(), GatewayError> {
        tracing::debug!("push disabled, dropping \"{}\"", message.title);
        Ok(())
    }
}

/// Sends `message` and swallows any failure.
pub(crate) async fn push_best_effort(notifier: &dyn Notifier, message: PushMessage) {
    let title = message.title.clone();
    if let Err(err) = notifier.push(message).await {
        tracing::warn!("push \"{title}\" failed: {err}");
    }
}
