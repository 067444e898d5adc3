use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, LinkStatus, PushMessage, ResultEngine, Transaction, TransactionKind, family_links,
    notifier::push_best_effort,
    transactions,
    users::{self, display_name},
    util::{ensure_positive_amount, normalize_optional_text},
};

use super::{Engine, with_tx};

/// Fields accepted when creating or updating a transaction.
#[derive(Clone, Debug)]
pub struct TransactionInput {
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub category_id: Option<Uuid>,
    /// Defaults to now on create; left untouched on update when `None`.
    pub occurred_at: Option<DateTime<Utc>>,
}

impl Engine {
    /// Transactions owned by `user_id`, newest first.
    pub async fn list_transactions(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.transactions_of(&db_tx, user_id).await
        })
    }

    /// Records a transaction and tells every owner following `user_id`
    /// through an accepted family link.
    pub async fn new_transaction(
        &self,
        user_id: Uuid,
        input: TransactionInput,
    ) -> ResultEngine<Transaction> {
        ensure_positive_amount(input.amount_minor)?;
        let (transaction, pushes) = with_tx!(self, |db_tx| {
            let member = self.require_user(&db_tx, user_id).await?;
            let category_id = self
                .resolve_category_id(&db_tx, user_id, input.category_id)
                .await?;

            let model = transactions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                category_id: ActiveValue::Set(category_id),
                kind: ActiveValue::Set(input.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(input.amount_minor),
                note: ActiveValue::Set(normalize_optional_text(input.note.as_deref())),
                occurred_at: ActiveValue::Set(input.occurred_at.unwrap_or_else(Utc::now)),
                updated_at: ActiveValue::Set(None),
            }
            .insert(&db_tx)
            .await?;
            let transaction = Transaction::try_from(model)?;

            let pushes = self
                .family_transaction_pushes(&db_tx, &member, &transaction)
                .await?;
            Ok::<_, EngineError>((transaction, pushes))
        })?;

        for message in pushes {
            push_best_effort(self.notifier.as_ref(), message).await;
        }
        Ok(transaction)
    }

    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        input: TransactionInput,
    ) -> ResultEngine<Transaction> {
        ensure_positive_amount(input.amount_minor)?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_owned_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let category_id = self
                .resolve_category_id(&db_tx, user_id, input.category_id)
                .await?;

            let mut active: transactions::ActiveModel = model.into();
            active.kind = ActiveValue::Set(input.kind.as_str().to_string());
            active.amount_minor = ActiveValue::Set(input.amount_minor);
            active.note = ActiveValue::Set(normalize_optional_text(input.note.as_deref()));
            active.category_id = ActiveValue::Set(category_id);
            if let Some(occurred_at) = input.occurred_at {
                active.occurred_at = ActiveValue::Set(occurred_at);
            }
            active.updated_at = ActiveValue::Set(Some(Utc::now()));
            let model = active.update(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    pub async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_owned_transaction(&db_tx, user_id, transaction_id)
                .await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }

    pub(super) async fn transactions_of(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(transactions::Column::OccurredAt)
            .all(db)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// One push per owner with an accepted link to `member` and a device token.
    async fn family_transaction_pushes(
        &self,
        db: &DatabaseTransaction,
        member: &users::Model,
        transaction: &Transaction,
    ) -> ResultEngine<Vec<PushMessage>> {
        let owner_ids: Vec<String> = family_links::Entity::find()
            .filter(family_links::Column::MemberId.eq(member.id.clone()))
            .filter(family_links::Column::Status.eq(LinkStatus::Accepted.as_str()))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.owner_id)
            .collect();
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }
        let owners = users::Entity::find()
            .filter(users::Column::Id.is_in(owner_ids))
            .filter(users::Column::PushToken.is_not_null())
            .all(db)
            .await?;

        let member_name = display_name(
            member.full_name.as_deref(),
            member.name.as_deref(),
            &member.email,
        );
        let verb = match transaction.kind {
            TransactionKind::Income => "received",
            TransactionKind::Expense => "spent",
        };

        let pushes = owners
            .into_iter()
            .filter_map(|owner| owner.push_token)
            .filter(|token| !token.is_empty())
            .map(|token| {
                PushMessage::new(
                    token,
                    "New family transaction",
                    format!(
                        "{member_name} {verb} {}",
                        format_minor(transaction.amount_minor)
                    ),
                )
                .with_data("type", "family_tx")
                .with_data("member_id", member.id.clone())
                .with_data("tx_id", transaction.id.to_string())
                .with_data("tx_type", transaction.kind.as_str())
            })
            .collect();
        Ok(pushes)
    }
}

/// Renders minor units as `units.cents`.
fn format_minor(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_minor_pads_cents() {
        assert_eq!(format_minor(12_345), "123.45");
        assert_eq!(format_minor(5), "0.05");
        assert_eq!(format_minor(-250), "-2.50");
    }
}
