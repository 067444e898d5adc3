//! Wallets API endpoints.

use api_types::{
    Deleted,
    wallet::{Balance, WalletUpsert, WalletView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{User, Wallet, WalletInput};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn wallet_view(wallet: Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        balance_minor: wallet.balance_minor,
        created_at: wallet.created_at,
    }
}

fn wallet_input(payload: WalletUpsert) -> WalletInput {
    WalletInput {
        name: payload.name,
        balance_minor: payload.balance_minor,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state.engine.list_wallets(user.id).await?;
    Ok(Json(wallets.into_iter().map(wallet_view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletUpsert>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let wallet = state
        .engine
        .new_wallet(user.id, wallet_input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(wallet_view(wallet))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<WalletUpsert>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state
        .engine
        .update_wallet(user.id, wallet_id, wallet_input(payload))
        .await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.delete_wallet(user.id, wallet_id).await?;
    Ok(Json(Deleted { deleted: true }))
}

/// Own totals and the wallet balance derived from them.
pub async fn balance(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Balance>, ServerError> {
    let summary = state.engine.balance_summary(user.id).await?;
    Ok(Json(Balance {
        total_income_minor: summary.total_income_minor,
        total_expense_minor: summary.total_expense_minor,
        wallet_balance_minor: summary.wallet_balance_minor,
    }))
}
