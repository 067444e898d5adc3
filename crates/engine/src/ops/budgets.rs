use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Budget, BudgetPeriod, BudgetScope, EngineError, ResultEngine, budgets,
    util::ensure_positive_amount,
};

use super::{Engine, with_tx};

#[derive(Clone, Debug)]
pub struct BudgetInput {
    pub amount_minor: i64,
    pub period: BudgetPeriod,
    pub scope: BudgetScope,
    pub category_id: Option<Uuid>,
    pub active: bool,
}

impl Engine {
    pub async fn list_budgets(&self, user_id: Uuid) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            let models = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(budgets::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Budget::try_from).collect()
        })
    }

    pub async fn new_budget(&self, user_id: Uuid, input: BudgetInput) -> ResultEngine<Budget> {
        ensure_positive_amount(input.amount_minor)?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let category_id = self.budget_category(&db_tx, user_id, &input).await?;
            let model = budgets::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                amount_minor: ActiveValue::Set(input.amount_minor),
                period: ActiveValue::Set(input.period.as_str().to_string()),
                scope: ActiveValue::Set(input.scope.as_str().to_string()),
                category_id: ActiveValue::Set(category_id),
                active: ActiveValue::Set(input.active),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Budget::try_from(model)
        })
    }

    pub async fn update_budget(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
        input: BudgetInput,
    ) -> ResultEngine<Budget> {
        ensure_positive_amount(input.amount_minor)?;
        with_tx!(self, |db_tx| {
            let model = self.require_owned_budget(&db_tx, user_id, budget_id).await?;
            let category_id = self.budget_category(&db_tx, user_id, &input).await?;

            let mut active: budgets::ActiveModel = model.into();
            active.amount_minor = ActiveValue::Set(input.amount_minor);
            active.period = ActiveValue::Set(input.period.as_str().to_string());
            active.scope = ActiveValue::Set(input.scope.as_str().to_string());
            active.category_id = ActiveValue::Set(category_id);
            active.active = ActiveValue::Set(input.active);
            let model = active.update(&db_tx).await?;
            Budget::try_from(model)
        })
    }

    pub async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_owned_budget(&db_tx, user_id, budget_id).await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// A category budget needs an owned category; an overall one takes none.
    async fn budget_category(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        input: &BudgetInput,
    ) -> ResultEngine<Option<String>> {
        match (input.scope, input.category_id) {
            (BudgetScope::Overall, None) => Ok(None),
            (BudgetScope::Overall, Some(_)) => Err(EngineError::InvalidRequest(
                "overall budget cannot reference a category".to_string(),
            )),
            (BudgetScope::Category, None) => Err(EngineError::InvalidRequest(
                "category budget requires category_id".to_string(),
            )),
            (BudgetScope::Category, Some(id)) => self.resolve_category_id(db, user_id, Some(id)).await,
        }
    }
}
