//! Family sharing: invitations, membership views and the read gate on a
//! member's transactions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DEFAULT_GROUP_NAME, EngineError, FamilyLink, LinkDecision, LinkStatus, PushMessage,
    ResultEngine, Transaction, family_links,
    notifier::push_best_effort,
    users::{self, display_name},
    util::{normalize_optional_text, parse_uuid},
};

use super::{BalanceSummary, Engine, with_tx};

/// Invitation request from an owner.
#[derive(Clone, Debug, Default)]
pub struct FamilyInvite {
    pub member_email: String,
    /// The owner's label for the member.
    pub display_name: Option<String>,
    pub group_name: Option<String>,
}

/// An outgoing link as seen by its owner.
///
/// The aggregates are the member's figures and stay zero until the member
/// accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub link_id: Uuid,
    pub member_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub group_name: String,
    pub status: LinkStatus,
    pub totals: BalanceSummary,
    pub created_at: DateTime<Utc>,
}

/// A pending link as seen by the invited member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub link_id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: String,
    pub owner_display_name: String,
    pub group_name: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
}

/// An accepted link as seen by the member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedFamily {
    pub link_id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: String,
    pub owner_display_name: String,
    pub group_name: String,
}

fn user_display_name(model: &users::Model) -> String {
    display_name(model.full_name.as_deref(), model.name.as_deref(), &model.email)
}

impl Engine {
    /// Invites the user registered under `invite.member_email`.
    ///
    /// Inviting the same member twice returns the existing link untouched,
    /// whatever its status.
    pub async fn invite(&self, owner_id: Uuid, invite: FamilyInvite) -> ResultEngine<FamilyLink> {
        let member_email = invite.member_email.trim().to_lowercase();
        let (link, push) = with_tx!(self, |db_tx| {
            let owner = self.require_user(&db_tx, owner_id).await?;
            if owner.email.to_lowercase() == member_email {
                return Err(EngineError::InvalidRequest(
                    "cannot invite yourself".to_string(),
                ));
            }

            let member = self
                .find_user_by_email(&db_tx, &member_email)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            let member_id = parse_uuid(&member.id, "user")?;

            match self.find_link(&db_tx, owner_id, member_id).await? {
                Some(existing) => Ok((FamilyLink::try_from(existing)?, None)),
                None => self.create_link(&db_tx, &owner, &member, invite).await,
            }
        })?;

        if let Some(message) = push {
            push_best_effort(self.notifier.as_ref(), message).await;
        }
        Ok(link)
    }

    async fn create_link(
        &self,
        db: &DatabaseTransaction,
        owner: &users::Model,
        member: &users::Model,
        invite: FamilyInvite,
    ) -> ResultEngine<(FamilyLink, Option<PushMessage>)> {
        let group_name = normalize_optional_text(invite.group_name.as_deref())
            .unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string());
        let model = family_links::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            owner_id: ActiveValue::Set(owner.id.clone()),
            member_id: ActiveValue::Set(member.id.clone()),
            display_name: ActiveValue::Set(normalize_optional_text(
                invite.display_name.as_deref(),
            )),
            group_name: ActiveValue::Set(group_name.clone()),
            status: ActiveValue::Set(LinkStatus::Pending.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(db)
        .await?;
        let link = FamilyLink::try_from(model)?;
        tracing::info!(
            "family link {} created ({} -> {})",
            link.id,
            link.owner_id,
            link.member_id
        );

        let push = member.push_token.clone().map(|token| {
            PushMessage::new(
                token,
                "Family invitation",
                format!(
                    "{} invited you to join \"{group_name}\"",
                    user_display_name(owner)
                ),
            )
            .with_data("type", "family_invite")
            .with_data("link_id", link.id.to_string())
            .with_data("owner_id", link.owner_id.to_string())
        });
        Ok((link, push))
    }

    /// The member's answer to an invitation.
    ///
    /// Only the invited member can respond; for anyone else the link does
    /// not exist.
    pub async fn respond(
        &self,
        member_id: Uuid,
        link_id: Uuid,
        decision: LinkDecision,
    ) -> ResultEngine<FamilyLink> {
        let (link, push) = with_tx!(self, |db_tx| {
            let model = family_links::Entity::find_by_id(link_id.to_string())
                .filter(family_links::Column::MemberId.eq(member_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("invitation not exists".to_string()))?;

            let current = LinkStatus::try_from(model.status.as_str())?;
            let next = current.respond(decision)?;
            if next == current {
                Ok((FamilyLink::try_from(model)?, None))
            } else {
                self.apply_decision(&db_tx, model, next).await
            }
        })?;

        if let Some(message) = push {
            push_best_effort(self.notifier.as_ref(), message).await;
        }
        Ok(link)
    }

    async fn apply_decision(
        &self,
        db: &DatabaseTransaction,
        model: family_links::Model,
        next: LinkStatus,
    ) -> ResultEngine<(FamilyLink, Option<PushMessage>)> {
        let owner_id = model.owner_id.clone();
        let member_id = model.member_id.clone();
        let mut active: family_links::ActiveModel = model.into();
        active.status = ActiveValue::Set(next.as_str().to_string());
        let link = FamilyLink::try_from(active.update(db).await?)?;
        tracing::info!("family link {} is now {}", link.id, next.as_str());

        if next != LinkStatus::Accepted {
            return Ok((link, None));
        }

        let owner = users::Entity::find_by_id(owner_id).one(db).await?;
        let member = users::Entity::find_by_id(member_id).one(db).await?;
        let push = match (owner.and_then(|o| o.push_token), member) {
            (Some(token), Some(member)) => Some(
                PushMessage::new(
                    token,
                    "Invitation accepted",
                    format!("{} joined your family", user_display_name(&member)),
                )
                .with_data("type", "family_accept")
                .with_data("link_id", link.id.to_string())
                .with_data("member_id", link.member_id.to_string()),
            ),
            _ => None,
        };
        Ok((link, push))
    }

    /// Every link owned by `owner_id`, with the member's figures for the
    /// accepted ones.
    pub async fn list_outgoing(&self, owner_id: Uuid) -> ResultEngine<Vec<FamilyMember>> {
        with_tx!(self, |db_tx| {
            let links = family_links::Entity::find()
                .filter(family_links::Column::OwnerId.eq(owner_id.to_string()))
                .order_by_asc(family_links::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            let members = self
                .users_by_id(&db_tx, links.iter().map(|l| l.member_id.clone()))
                .await?;

            let mut result = Vec::with_capacity(links.len());
            for model in links {
                let Some(member) = members.get(&model.member_id) else {
                    continue;
                };
                let link = FamilyLink::try_from(model)?;
                let totals = if link.status == LinkStatus::Accepted {
                    self.summary_of(&db_tx, link.member_id).await?
                } else {
                    BalanceSummary::default()
                };
                result.push(FamilyMember {
                    link_id: link.id,
                    member_id: link.member_id,
                    email: member.email.clone(),
                    display_name: link
                        .display_name
                        .clone()
                        .unwrap_or_else(|| user_display_name(member)),
                    group_name: link.group_name,
                    status: link.status,
                    totals,
                    created_at: link.created_at,
                });
            }
            Ok(result)
        })
    }

    /// Pending invitations addressed to `member_id`, newest first.
    pub async fn list_incoming_pending(&self, member_id: Uuid) -> ResultEngine<Vec<Invitation>> {
        with_tx!(self, |db_tx| {
            let links = self
                .links_of_member(&db_tx, member_id, LinkStatus::Pending)
                .await?;
            let owners = self
                .users_by_id(&db_tx, links.iter().map(|l| l.owner_id.clone()))
                .await?;

            let mut result = Vec::with_capacity(links.len());
            for model in links {
                let Some(owner) = owners.get(&model.owner_id) else {
                    continue;
                };
                let link = FamilyLink::try_from(model)?;
                result.push(Invitation {
                    link_id: link.id,
                    owner_id: link.owner_id,
                    owner_email: owner.email.clone(),
                    owner_display_name: user_display_name(owner),
                    group_name: link.group_name,
                    status: link.status,
                    created_at: link.created_at,
                });
            }
            Ok(result)
        })
    }

    /// Families `member_id` has joined.
    pub async fn list_joined(&self, member_id: Uuid) -> ResultEngine<Vec<JoinedFamily>> {
        with_tx!(self, |db_tx| {
            let links = self
                .links_of_member(&db_tx, member_id, LinkStatus::Accepted)
                .await?;
            let owners = self
                .users_by_id(&db_tx, links.iter().map(|l| l.owner_id.clone()))
                .await?;

            let mut result = Vec::with_capacity(links.len());
            for model in links {
                let Some(owner) = owners.get(&model.owner_id) else {
                    continue;
                };
                let link = FamilyLink::try_from(model)?;
                result.push(JoinedFamily {
                    link_id: link.id,
                    owner_id: link.owner_id,
                    owner_email: owner.email.clone(),
                    owner_display_name: user_display_name(owner),
                    group_name: link.group_name,
                });
            }
            Ok(result)
        })
    }

    /// The member's transactions, newest first. Requires an accepted
    /// owner → member link.
    pub async fn view_member_transactions(
        &self,
        owner_id: Uuid,
        member_id: Uuid,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let accepted = self
                .find_link(&db_tx, owner_id, member_id)
                .await?
                .is_some_and(|link| link.status == LinkStatus::Accepted.as_str());
            if !accepted {
                return Err(EngineError::Forbidden(
                    "not allowed to view this member".to_string(),
                ));
            }
            self.transactions_of(&db_tx, member_id).await
        })
    }

    /// Owner side removal, in any status.
    pub async fn remove_member(&self, owner_id: Uuid, member_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let link = self
                .find_link(&db_tx, owner_id, member_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("family member not exists".to_string()))?;
            link.delete(&db_tx).await?;
            tracing::info!("family link {owner_id} -> {member_id} removed by owner");
            Ok(())
        })
    }

    /// Member side exit from an accepted link.
    pub async fn leave_family(&self, member_id: Uuid, link_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let link = family_links::Entity::find_by_id(link_id.to_string())
                .filter(family_links::Column::MemberId.eq(member_id.to_string()))
                .filter(family_links::Column::Status.eq(LinkStatus::Accepted.as_str()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("family not exists".to_string()))?;
            link.delete(&db_tx).await?;
            tracing::info!("user {member_id} left family link {link_id}");
            Ok(())
        })
    }

    async fn links_of_member(
        &self,
        db: &DatabaseTransaction,
        member_id: Uuid,
        status: LinkStatus,
    ) -> ResultEngine<Vec<family_links::Model>> {
        family_links::Entity::find()
            .filter(family_links::Column::MemberId.eq(member_id.to_string()))
            .filter(family_links::Column::Status.eq(status.as_str()))
            .order_by_desc(family_links::Column::CreatedAt)
            .all(db)
            .await
            .map_err(Into::into)
    }

    async fn users_by_id(
        &self,
        db: &DatabaseTransaction,
        ids: impl Iterator<Item = String>,
    ) -> ResultEngine<HashMap<String, users::Model>> {
        let ids: Vec<String> = ids.collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids))
            .all(db)
            .await?;
        Ok(models.into_iter().map(|m| (m.id.clone(), m)).collect())
    }
}
