//! Categories API endpoints.

use api_types::{
    Deleted,
    category::{CategoryUpsert, CategoryView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Category, CategoryInput, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        icon: category.icon,
        color: category.color,
        created_at: category.created_at,
    }
}

fn category_input(payload: CategoryUpsert) -> CategoryInput {
    CategoryInput {
        name: payload.name,
        icon: payload.icon,
        color: payload.color,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories(user.id).await?;
    Ok(Json(categories.into_iter().map(category_view).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryUpsert>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .new_category(user.id, category_input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryUpsert>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(user.id, category_id, category_input(payload))
        .await?;
    Ok(Json(category_view(category)))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.delete_category(user.id, category_id).await?;
    Ok(Json(Deleted { deleted: true }))
}
