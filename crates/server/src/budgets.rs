//! Budgets API endpoints.

use api_types::{
    Deleted,
    budget::{BudgetUpsert, BudgetView, Period, Scope},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Budget, BudgetInput, BudgetPeriod, BudgetScope, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn budget_view(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        amount_minor: budget.amount_minor,
        period: match budget.period {
            BudgetPeriod::Day => Period::Day,
            BudgetPeriod::Month => Period::Month,
            BudgetPeriod::Year => Period::Year,
        },
        scope: match budget.scope {
            BudgetScope::Overall => Scope::Overall,
            BudgetScope::Category => Scope::Category,
        },
        category_id: budget.category_id,
        active: budget.active,
        created_at: budget.created_at,
    }
}

fn budget_input(payload: BudgetUpsert) -> BudgetInput {
    BudgetInput {
        amount_minor: payload.amount_minor,
        period: match payload.period {
            Period::Day => BudgetPeriod::Day,
            Period::Month => BudgetPeriod::Month,
            Period::Year => BudgetPeriod::Year,
        },
        scope: match payload.scope {
            Scope::Overall => BudgetScope::Overall,
            Scope::Category => BudgetScope::Category,
        },
        category_id: payload.category_id,
        active: payload.active,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let budgets = state.engine.list_budgets(user.id).await?;
    Ok(Json(budgets.into_iter().map(budget_view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetUpsert>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .new_budget(user.id, budget_input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(budget_view(budget))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<BudgetUpsert>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .update_budget(user.id, budget_id, budget_input(payload))
        .await?;
    Ok(Json(budget_view(budget)))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.delete_budget(user.id, budget_id).await?;
    Ok(Json(Deleted { deleted: true }))
}
