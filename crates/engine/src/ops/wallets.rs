use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, Wallet, util::normalize_optional_text, wallets};

use super::{Engine, with_tx};

/// Fields accepted when creating or updating a wallet.
#[derive(Clone, Debug, Default)]
pub struct WalletInput {
    pub name: Option<String>,
    /// Opening balance. Transactions never change it.
    pub balance_minor: i64,
}

impl Engine {
    /// Wallets owned by `user_id`, oldest first.
    pub async fn list_wallets(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            let models = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(wallets::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Wallet::try_from).collect()
        })
    }

    pub async fn new_wallet(&self, user_id: Uuid, input: WalletInput) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let model = wallets::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(normalize_optional_text(input.name.as_deref())),
                balance_minor: ActiveValue::Set(input.balance_minor),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Wallet::try_from(model)
        })
    }

    /// Overwrites name and seed balance of an owned wallet.
    pub async fn update_wallet(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
        input: WalletInput,
    ) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.require_owned_wallet(&db_tx, user_id, wallet_id).await?;
            let mut active: wallets::ActiveModel = model.into();
            active.name = ActiveValue::Set(normalize_optional_text(input.name.as_deref()));
            active.balance_minor = ActiveValue::Set(input.balance_minor);
            let model = active.update(&db_tx).await?;
            Wallet::try_from(model)
        })
    }

    pub async fn delete_wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_owned_wallet(&db_tx, user_id, wallet_id).await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
