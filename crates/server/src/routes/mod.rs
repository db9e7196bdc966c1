use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use shared::{
    api::{
        error::{ServerError, ServerErrorContext},
        Object,
    },
    model::User,
    types::Uuid,
};
use tracing::debug;

use crate::store::Store;

mod users;
pub use users::*;

mod exercises;
pub use exercises::*;

mod logs;
pub use logs::*;

pub const USER_NOT_FOUND: &str = "User not found";

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Arc<dyn Store>: FromRef<S>,
{
    Router::new()
        .route(Object::Users.path(), post(create_user).get(list_users))
        .route(Object::UserExercises.path(), post(log_exercise))
        .route(Object::UserLogs.path(), get(fetch_log))
}

/// Looks up the user named by a path parameter. Ids that aren't valid uuids
/// can't belong to anyone and are reported as not found
async fn find_user(store: &dyn Store, user_id: &str, failure: &str) -> Result<User, ServerError> {
    let Ok(id) = Uuid::parse(user_id) else {
        debug!(user_id, "Malformed user id");
        return Err(ServerError::not_found(USER_NOT_FOUND));
    };

    store
        .fetch_user(id)
        .await
        .or_persistence(failure)?
        .ok_or_else(|| ServerError::not_found(USER_NOT_FOUND))
}
