//! HTTP transports for the engine's outbound collaborators.
//!
//! - [`HttpPushNotifier`] posts messages to a push gateway (FCM style).
//! - [`HttpMailer`] posts plain-text mail to a JSON mail API.

use engine::GatewayError;
use serde::Deserialize;

pub use mail::{HttpMailer, MailConfig};
pub use push::{HttpPushNotifier, PushConfig};

mod mail;
mod push;

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Maps a non-success response to [`GatewayError::Rejected`].
async fn rejected(res: reqwest::Response) -> GatewayError {
    let status = res.status().as_u16();
    let message = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    GatewayError::Rejected { status, message }
}

fn unreachable(err: reqwest::Error) -> GatewayError {
    GatewayError::Unreachable(err.to_string())
}
