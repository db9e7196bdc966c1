use axum::{http::StatusCode, Json};
use shared::{
    api::{
        error::{ServerError, ServerErrorContext},
        payloads::NewUserPayload,
    },
    model::{User, ValidateModel},
};
use tracing::{info, instrument};

use crate::{extract::FormOrJson, store::Storage};

#[instrument(skip(store))]
pub async fn create_user(
    Storage(store): Storage,
    FormOrJson(payload): FormOrJson<NewUserPayload>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    let new_user = payload.validate()?;

    let user = store
        .create_user(new_user)
        .await
        .or_persistence("Failed to save user")?;
    info!(id = %user.id, username = %user.username, "Created user");

    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(store))]
pub async fn list_users(Storage(store): Storage) -> Result<Json<Vec<User>>, ServerError> {
    let users = store
        .fetch_users()
        .await
        .or_persistence("Failed to fetch users")?;

    Ok(Json(users))
}
