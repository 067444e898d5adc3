//! Simulated bank API endpoints.

use api_types::{
    Deleted,
    bank::{BankAccountNew, BankAccountView, BankTransactionView, SimulateTx},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{BankAccount, BankTransaction, BankTransactionNew, User};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    transactions::{kind_from_api, kind_to_api},
};

fn account_view(account: BankAccount) -> BankAccountView {
    BankAccountView {
        id: account.id,
        bank_name: account.bank_name,
        account_number: account.account_number,
        balance_minor: account.balance_minor,
    }
}

fn bank_transaction_view(tx: BankTransaction) -> BankTransactionView {
    BankTransactionView {
        id: tx.id,
        kind: kind_to_api(tx.kind),
        amount_minor: tx.amount_minor,
        description: tx.description,
        date: tx.occurred_at,
        balance_after_minor: tx.balance_after_minor,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BankAccountView>>, ServerError> {
    let accounts = state.engine.list_bank_accounts(user.id).await?;
    Ok(Json(accounts.into_iter().map(account_view).collect()))
}

pub async fn open(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<BankAccountNew>,
) -> Result<(StatusCode, Json<BankAccountView>), ServerError> {
    let account = state
        .engine
        .open_bank_account(
            user.id,
            engine::BankAccountNew {
                bank_name: payload.bank_name,
                account_number: payload.account_number,
                balance_minor: payload.balance_minor,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(account_view(account))))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.delete_bank_account(user.id, account_id).await?;
    Ok(Json(Deleted { deleted: true }))
}

pub async fn list_transactions(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<BankTransactionView>>, ServerError> {
    let txs = state
        .engine
        .list_bank_transactions(user.id, account_id)
        .await?;
    Ok(Json(txs.into_iter().map(bank_transaction_view).collect()))
}

pub async fn simulate(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<SimulateTx>,
) -> Result<(StatusCode, Json<BankTransactionView>), ServerError> {
    let tx = state
        .engine
        .simulate_bank_transaction(
            user.id,
            account_id,
            BankTransactionNew {
                kind: kind_from_api(payload.kind),
                amount_minor: payload.amount_minor,
                description: payload.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(bank_transaction_view(tx))))
}
