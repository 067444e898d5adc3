//! Transactional mail collaborator.

use async_trait::async_trait;
use serde::Serialize;

use crate::GatewayError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), GatewayError>;
}

/// Mailer used when no mail gateway is configured: every send fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), GatewayError> {
        tracing::warn!("mail gateway not configured, cannot send to {}", mail.to);
        Err(GatewayError::NotConfigured)
    }
}
