use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, bank_accounts, budgets, categories, family_links, transactions,
    users, wallets,
};

use super::Engine;

/// Generates a `require_*` lookup returning the row only when it is owned by
/// `user_id`. A row owned by someone else is reported exactly like a missing
/// one.
macro_rules! impl_owned_lookup {
    ($require_fn:ident, $entity:path, $model:ty, $owner_col:expr, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id.to_string())
                .filter($owner_col.eq(user_id.to_string()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        require_owned_wallet,
        wallets::Entity,
        wallets::Model,
        wallets::Column::UserId,
        "wallet not exists"
    );

    impl_owned_lookup!(
        require_owned_category,
        categories::Entity,
        categories::Model,
        categories::Column::UserId,
        "category not exists"
    );

    impl_owned_lookup!(
        require_owned_transaction,
        transactions::Entity,
        transactions::Model,
        transactions::Column::UserId,
        "transaction not exists"
    );

    impl_owned_lookup!(
        require_owned_budget,
        budgets::Entity,
        budgets::Model,
        budgets::Column::UserId,
        "budget not exists"
    );

    impl_owned_lookup!(
        require_owned_bank_account,
        bank_accounts::Entity,
        bank_accounts::Model,
        bank_accounts::Column::UserId,
        "bank account not exists"
    );

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn find_user_by_email(
        &self,
        db: &DatabaseTransaction,
        email: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// The owner → member link, whatever its status.
    pub(super) async fn find_link(
        &self,
        db: &DatabaseTransaction,
        owner_id: Uuid,
        member_id: Uuid,
    ) -> ResultEngine<Option<family_links::Model>> {
        family_links::Entity::find()
            .filter(family_links::Column::OwnerId.eq(owner_id.to_string()))
            .filter(family_links::Column::MemberId.eq(member_id.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Resolves an optional category reference, requiring caller ownership.
    pub(super) async fn resolve_category_id(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Option<String>> {
        match category_id {
            Some(id) => {
                let model = self.require_owned_category(db, user_id, id).await?;
                Ok(Some(model.id))
            }
            None => Ok(None),
        }
    }
}
