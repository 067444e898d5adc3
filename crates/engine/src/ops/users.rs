use chrono::Utc;
use sea_orm::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, OutgoingMail, ResultEngine, User, users,
    util::{normalize_email, normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const TEMPORARY_PASSWORD_LEN: usize = 12;

/// Registration payload.
#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub name: Option<String>,
}

impl Engine {
    /// Creates a new account.
    ///
    /// The email is stored trimmed and lower-cased; a second account with
    /// the same address is `ExistingKey`.
    pub async fn register(&self, new_user: NewUser) -> ResultEngine<User> {
        let email = normalize_email(&new_user.email)?;
        if new_user.password.is_empty() {
            return Err(EngineError::InvalidRequest(
                "password must not be empty".to_string(),
            ));
        }
        let digest = self.hasher.hash(&new_user.password)?;

        with_tx!(self, |db_tx| {
            if self.find_user_by_email(&db_tx, &email).await?.is_some() {
                return Err(EngineError::ExistingKey(email));
            }

            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                email: ActiveValue::Set(email.clone()),
                password: ActiveValue::Set(digest),
                full_name: ActiveValue::Set(normalize_optional_text(new_user.full_name.as_deref())),
                name: ActiveValue::Set(normalize_optional_text(new_user.name.as_deref())),
                push_token: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!("registered user {}", model.id);
            User::try_from(model)
        })
    }

    /// Checks credentials. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = email.trim().to_lowercase();
        with_tx!(self, |db_tx| {
            let model = self
                .find_user_by_email(&db_tx, &email)
                .await?
                .ok_or_else(|| EngineError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

            if !self.hasher.verify(password, &model.password)? {
                return Err(EngineError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            User::try_from(model)
        })
    }

    /// Return a user from DB.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            User::try_from(model)
        })
    }

    /// Stores the device token used for push notifications.
    pub async fn set_push_token(&self, user_id: Uuid, token: &str) -> ResultEngine<()> {
        let token = normalize_required_text(token, "push token")?;
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            let mut active: users::ActiveModel = model.into();
            active.push_token = ActiveValue::Set(Some(token));
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> ResultEngine<()> {
        if new_password.is_empty() {
            return Err(EngineError::InvalidRequest(
                "password must not be empty".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            if !self.hasher.verify(old_password, &model.password)? {
                return Err(EngineError::Unauthorized(
                    "current password does not match".to_string(),
                ));
            }

            let digest = self.hasher.hash(new_password)?;
            let mut active: users::ActiveModel = model.into();
            active.password = ActiveValue::Set(digest);
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Replaces the password of `email` with a random temporary one and
    /// mails it.
    ///
    /// The mail is sent before commit: if the mail gateway fails the old
    /// password stays valid and the caller gets `DependencyFailure`.
    pub async fn reset_password(&self, email: &str) -> ResultEngine<()> {
        let email = email.trim().to_lowercase();
        let temporary = temporary_password();
        let digest = self.hasher.hash(&temporary)?;

        with_tx!(self, |db_tx| {
            let model = self
                .find_user_by_email(&db_tx, &email)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            let user_id = model.id.clone();

            let mut active: users::ActiveModel = model.into();
            active.password = ActiveValue::Set(digest);
            active.update(&db_tx).await?;

            self.mailer
                .send(OutgoingMail {
                    to: email.clone(),
                    subject: "Your temporary password".to_string(),
                    body: format!(
                        "Your password has been reset.\n\nTemporary password: {temporary}\n\nPlease change it after signing in."
                    ),
                })
                .await?;

            tracing::info!("password reset for user {user_id}");
            Ok(())
        })
    }
}

fn temporary_password() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    raw[..TEMPORARY_PASSWORD_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_passwords_are_short_and_distinct() {
        let a = temporary_password();
        let b = temporary_password();
        assert_eq!(a.len(), TEMPORARY_PASSWORD_LEN);
        assert_ne!(a, b);
    }
}
