//! Transactions API endpoints.

use api_types::{
    Deleted, TransactionKind as ApiKind,
    transaction::{TransactionUpsert, TransactionView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Transaction, TransactionInput, TransactionKind, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn kind_from_api(kind: ApiKind) -> TransactionKind {
    match kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Expense => TransactionKind::Expense,
    }
}

pub(crate) fn kind_to_api(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Expense => ApiKind::Expense,
    }
}

pub(crate) fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        user_id: tx.user_id,
        category_id: tx.category_id,
        kind: kind_to_api(tx.kind),
        amount_minor: tx.amount_minor,
        note: tx.note,
        date: tx.occurred_at,
        updated_at: tx.updated_at,
    }
}

fn transaction_input(payload: TransactionUpsert) -> TransactionInput {
    TransactionInput {
        kind: kind_from_api(payload.kind),
        amount_minor: payload.amount_minor,
        note: payload.note,
        category_id: payload.category_id,
        occurred_at: payload.date,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state.engine.list_transactions(user.id).await?;
    Ok(Json(txs.into_iter().map(transaction_view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionUpsert>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .new_transaction(user.id, transaction_input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(tx_id): Path<Uuid>,
    Json(payload): Json<TransactionUpsert>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(user.id, tx_id, transaction_input(payload))
        .await?;
    Ok(Json(transaction_view(tx)))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(tx_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.delete_transaction(user.id, tx_id).await?;
    Ok(Json(Deleted { deleted: true }))
}
