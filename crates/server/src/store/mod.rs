use std::{convert::Infallible, fmt, sync::Arc};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use shared::{
    model::{Exercise, ExerciseFilter, NewExercise, NewUser, User},
    types::Uuid,
};

mod memory;
pub use memory::*;

mod sqlite;
pub use sqlite::*;

/// Persistence for users and their exercises.
///
/// Reads return records in insertion order.
#[async_trait]
pub trait Store: fmt::Debug + Send + Sync + 'static {
    async fn create_user(&self, new_user: NewUser) -> Result<User, anyhow::Error>;

    async fn fetch_users(&self) -> Result<Vec<User>, anyhow::Error>;

    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>, anyhow::Error>;

    async fn create_exercise(&self, new_exercise: NewExercise) -> Result<Exercise, anyhow::Error>;

    async fn fetch_exercises(&self, filter: ExerciseFilter) -> Result<Vec<Exercise>, anyhow::Error>;
}

/// Extractor for the store held in the app state
#[derive(Debug, Clone)]
pub struct Storage(pub Arc<dyn Store>);

impl From<Arc<dyn Store>> for Storage {
    fn from(store: Arc<dyn Store>) -> Self {
        Storage(store)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Storage
where
    S: Send + Sync,
    Arc<dyn Store>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(<Arc<dyn Store>>::from_ref(state).into())
    }
}
