use sea_orm::{
    DatabaseTransaction, FromQueryResult, QueryFilter, QuerySelect, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ResultEngine, TransactionKind, transactions, util::balance_in_range, wallets};

use super::{Engine, with_tx};

/// Income and expense sums of one user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income_minor: i64,
    pub expense_minor: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    /// Wallet seeds plus income minus expense.
    pub wallet_balance_minor: i64,
}

#[derive(Debug, FromQueryResult)]
struct KindSum {
    kind: String,
    total: Option<i64>,
}

#[derive(Debug, FromQueryResult)]
struct SeedSum {
    total: Option<i64>,
}

impl Engine {
    /// The caller's own totals and derived wallet balance.
    pub async fn balance_summary(&self, user_id: Uuid) -> ResultEngine<BalanceSummary> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            self.summary_of(&db_tx, user_id).await
        })
    }

    /// Income and expense totals of `user_id`.
    pub async fn totals(&self, user_id: Uuid) -> ResultEngine<Totals> {
        with_tx!(self, |db_tx| self.sum_by_kind(&db_tx, user_id).await)
    }

    /// Sum of wallet seeds plus income minus expense, recomputed on every call.
    pub async fn current_wallet_balance(&self, user_id: Uuid, totals: Totals) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            self.wallet_balance_in(&db_tx, user_id, totals).await
        })
    }

    pub(super) async fn summary_of(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<BalanceSummary> {
        let totals = self.sum_by_kind(db, user_id).await?;
        let wallet_balance_minor = self.wallet_balance_in(db, user_id, totals).await?;
        Ok(BalanceSummary {
            total_income_minor: totals.income_minor,
            total_expense_minor: totals.expense_minor,
            wallet_balance_minor,
        })
    }

    /// Sums the user's transactions grouped by kind. A kind with no rows
    /// counts as zero.
    async fn sum_by_kind(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Totals> {
        let rows = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Kind)
            .column_as(Expr::col(transactions::Column::AmountMinor).sum(), "total")
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .group_by(transactions::Column::Kind)
            .into_model::<KindSum>()
            .all(db)
            .await?;

        let mut totals = Totals::default();
        for row in rows {
            let total = row.total.unwrap_or(0);
            match TransactionKind::try_from(row.kind.as_str())? {
                TransactionKind::Income => totals.income_minor = total,
                TransactionKind::Expense => totals.expense_minor = total,
            }
        }
        Ok(totals)
    }

    async fn wallet_balance_in(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        totals: Totals,
    ) -> ResultEngine<i64> {
        let seeds = wallets::Entity::find()
            .select_only()
            .column_as(Expr::col(wallets::Column::BalanceMinor).sum(), "total")
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .into_model::<SeedSum>()
            .one(db)
            .await?
            .and_then(|row| row.total)
            .unwrap_or(0);
        balance_in_range(
            seeds
                .checked_add(totals.income_minor)
                .and_then(|balance| balance.checked_sub(totals.expense_minor)),
        )
    }
}
