//! Family sharing links.
//!
//! A link is a directed edge owner → member. The owner creates it in
//! `Pending`; only the member moves it to `Accepted` or `Rejected`. Either
//! side may delete it. Financial data of the member is readable by the
//! owner only while the link is `Accepted`.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

pub const DEFAULT_GROUP_NAME: &str = "Family";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Pending,
    Accepted,
    Rejected,
}

impl LinkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Applies the member's decision.
    ///
    /// `Pending` moves to either terminal status; repeating the decision that
    /// produced the current status is a no-op. Flipping a decided link is
    /// rejected: the way out of a decided link is deletion.
    pub fn respond(self, decision: LinkDecision) -> ResultEngine<LinkStatus> {
        let target = decision.status();
        match self {
            Self::Pending => Ok(target),
            current if current == target => Ok(current),
            current => Err(EngineError::InvalidRequest(format!(
                "invitation already {}",
                current.as_str()
            ))),
        }
    }
}

impl TryFrom<&str> for LinkStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(EngineError::InvalidRequest(format!(
                "invalid link status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkDecision {
    Accept,
    Reject,
}

impl LinkDecision {
    pub fn status(self) -> LinkStatus {
        match self {
            Self::Accept => LinkStatus::Accepted,
            Self::Reject => LinkStatus::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyLink {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub member_id: Uuid,
    /// The owner's label for the member.
    pub display_name: Option<String>,
    pub group_name: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "family_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub member_id: String,
    pub display_name: Option<String>,
    pub group_name: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::MemberId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Member,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for FamilyLink {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "family link")?,
            owner_id: parse_uuid(&model.owner_id, "user")?,
            member_id: parse_uuid(&model.member_id, "user")?,
            display_name: model.display_name,
            group_name: model.group_name,
            status: LinkStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}
