//! Bearer tokens and the `/auth` endpoints.

use api_types::auth::{ChangePassword, ForgotPassword, Login, PushToken, Register, Token, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::{Duration, Utc};
use engine::{NewUser, User};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: String,
    exp: i64,
    iat: i64,
}

/// Signs and checks HS256 access tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// An out-of-range TTL saturates, so `issue` fails for it.
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::try_minutes(ttl_minutes).unwrap_or(Duration::MAX),
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, ServerError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            tracing::error!("token expiry out of range for ttl {}", self.ttl);
            ServerError::Internal("token creation failed".to_string())
        })?;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|err| {
            tracing::error!("token creation failed: {err}");
            ServerError::Internal("token creation failed".to_string())
        })
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        display_name: user.display_name(),
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        name: user.name,
        created_at: user.created_at,
    }
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .register(NewUser {
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
            name: payload.name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user_view(user))))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<Token>, ServerError> {
    let user = state
        .engine
        .authenticate(&payload.email, &payload.password)
        .await?;
    let access_token = state.tokens.issue(user.id)?;
    Ok(Json(Token {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.tokens.ttl_seconds(),
    }))
}

pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(payload): Json<ForgotPassword>,
) -> Result<StatusCode, ServerError> {
    state.engine.reset_password(&payload.email).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(user_view(user))
}

pub async fn push_token(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<PushToken>,
) -> Result<StatusCode, ServerError> {
    state.engine.set_push_token(user.id, &payload.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ChangePassword>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .change_password(user.id, &payload.old_password, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_same_user() {
        let issuer = TokenIssuer::new("secret", 60);
        let id = Uuid::new_v4();
        let token = issuer.issue(id).ok().unwrap();
        assert_eq!(issuer.verify(&token), Some(id));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = TokenIssuer::new("secret", 60);
        let other = TokenIssuer::new("another", 60);
        let token = other.issue(Uuid::new_v4()).ok().unwrap();
        assert_eq!(issuer.verify(&token), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("secret", -10);
        let token = issuer.issue(Uuid::new_v4()).ok().unwrap();
        assert_eq!(issuer.verify(&token), None);
    }

    #[test]
    fn ttl_out_of_range_fails_to_issue() {
        let issuer = TokenIssuer::new("secret", i64::MAX);
        assert!(matches!(
            issuer.issue(Uuid::new_v4()),
            Err(ServerError::Internal(_))
        ));
    }
}
