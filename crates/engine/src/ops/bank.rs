//! Simulated bank accounts.
//!
//! Unlike wallets, a bank account carries a live balance: every movement
//! updates it in the same DB transaction that records the movement.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    BankAccount, BankTransaction, ResultEngine, TransactionKind, bank_accounts, bank_transactions,
    util::{
        balance_in_range, ensure_positive_amount, normalize_optional_text, normalize_required_text,
    },
};

use super::{Engine, with_tx};

#[derive(Clone, Debug, Default)]
pub struct BankAccountNew {
    pub bank_name: String,
    pub account_number: String,
    pub balance_minor: i64,
}

#[derive(Clone, Debug)]
pub struct BankTransactionNew {
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: Option<String>,
}

impl Engine {
    pub async fn open_bank_account(
        &self,
        user_id: Uuid,
        input: BankAccountNew,
    ) -> ResultEngine<BankAccount> {
        let bank_name = normalize_required_text(&input.bank_name, "bank name")?;
        let account_number = normalize_required_text(&input.account_number, "account number")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let now = Utc::now();
            let model = bank_accounts::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                bank_name: ActiveValue::Set(bank_name),
                account_number: ActiveValue::Set(account_number),
                balance_minor: ActiveValue::Set(input.balance_minor),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            BankAccount::try_from(model)
        })
    }

    pub async fn list_bank_accounts(&self, user_id: Uuid) -> ResultEngine<Vec<BankAccount>> {
        with_tx!(self, |db_tx| {
            let models = bank_accounts::Entity::find()
                .filter(bank_accounts::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(bank_accounts::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(BankAccount::try_from).collect()
        })
    }

    /// Deletes an account together with its movements.
    pub async fn delete_bank_account(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_owned_bank_account(&db_tx, user_id, account_id)
                .await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Movements of an owned account, newest first.
    pub async fn list_bank_transactions(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> ResultEngine<Vec<BankTransaction>> {
        with_tx!(self, |db_tx| {
            self.require_owned_bank_account(&db_tx, user_id, account_id)
                .await?;
            let models = bank_transactions::Entity::find()
                .filter(bank_transactions::Column::AccountId.eq(account_id.to_string()))
                .order_by_desc(bank_transactions::Column::OccurredAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(BankTransaction::try_from).collect()
        })
    }

    /// Applies a movement to the account balance and records it with the
    /// resulting balance.
    pub async fn simulate_bank_transaction(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        input: BankTransactionNew,
    ) -> ResultEngine<BankTransaction> {
        ensure_positive_amount(input.amount_minor)?;
        with_tx!(self, |db_tx| {
            let account = self
                .require_owned_bank_account(&db_tx, user_id, account_id)
                .await?;
            let balance_after = balance_in_range(
                account
                    .balance_minor
                    .checked_add(input.kind.signed(input.amount_minor)),
            )?;
            let now = Utc::now();

            let mut active: bank_accounts::ActiveModel = account.into();
            active.balance_minor = ActiveValue::Set(balance_after);
            active.updated_at = ActiveValue::Set(now);
            active.update(&db_tx).await?;

            let model = bank_transactions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                account_id: ActiveValue::Set(account_id.to_string()),
                kind: ActiveValue::Set(input.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(input.amount_minor),
                description: ActiveValue::Set(normalize_optional_text(input.description.as_deref())),
                occurred_at: ActiveValue::Set(now),
                balance_after_minor: ActiveValue::Set(balance_after),
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!("bank account {account_id} balance now {balance_after}");
            BankTransaction::try_from(model)
        })
    }
}
