//! Users table and the `User` domain type.
//!
//! Every other entity is owned by a user through its `user_id` column.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// A registered account.
///
/// The password digest never leaves the storage model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub name: Option<String>,
    /// Push-notification address of the user's device, if registered.
    pub push_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown to other users: full name, then short name, then the
    /// local part of the email address.
    pub fn display_name(&self) -> String {
        display_name(self.full_name.as_deref(), self.name.as_deref(), &self.email)
    }
}

pub fn display_name(full_name: Option<&str>, name: Option<&str>, email: &str) -> String {
    fn present(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|s| !s.is_empty())
    }

    present(full_name)
        .or_else(|| present(name))
        .map(ToString::to_string)
        .unwrap_or_else(|| email_local_part(email).to_string())
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub push_token: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "user")?,
            email: model.email,
            full_name: model.full_name,
            name: model.name,
            push_token: model.push_token,
            created_at: model.created_at,
        })
    }
}
