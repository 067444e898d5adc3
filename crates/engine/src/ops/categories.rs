use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Category, ResultEngine, categories,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

#[derive(Clone, Debug, Default)]
pub struct CategoryInput {
    pub name: String,
    pub icon: String,
    pub color: Option<String>,
}

impl Engine {
    /// Categories owned by `user_id`, newest first.
    pub async fn list_categories(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let models = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(categories::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Category::try_from).collect()
        })
    }

    pub async fn new_category(
        &self,
        user_id: Uuid,
        input: CategoryInput,
    ) -> ResultEngine<Category> {
        let name = normalize_required_text(&input.name, "category name")?;
        let icon = normalize_required_text(&input.icon, "category icon")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let model = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name),
                icon: ActiveValue::Set(icon),
                color: ActiveValue::Set(normalize_optional_text(input.color.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Category::try_from(model)
        })
    }

    pub async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        input: CategoryInput,
    ) -> ResultEngine<Category> {
        let name = normalize_required_text(&input.name, "category name")?;
        let icon = normalize_required_text(&input.icon, "category icon")?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_owned_category(&db_tx, user_id, category_id)
                .await?;
            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(name);
            active.icon = ActiveValue::Set(icon);
            active.color = ActiveValue::Set(normalize_optional_text(input.color.as_deref()));
            let model = active.update(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Deletes a category. Transactions keep existing without a category;
    /// budgets scoped to it are removed with it.
    pub async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_owned_category(&db_tx, user_id, category_id)
                .await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
