use std::time::Duration;

use anyhow::anyhow;
use axum::async_trait;
use deadpool_sqlite::Pool;
use rusqlite::Connection;
use shared::{
    model::{Exercise, ExerciseFilter, NewExercise, NewUser, User},
    types::Uuid,
};
use tracing::instrument;

use super::Store;

/// [`Store`] backed by a pool of SQLite connections
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool,
    timeout: Duration,
}

impl SqliteStore {
    /// `timeout` bounds the wait for a pooled connection. Once a call has a
    /// connection it runs to completion, so a write is never reported as
    /// failed after it committed
    pub fn new(pool: Pool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Runs `f` on a pooled connection on the blocking thread pool
    async fn interact<F, R>(&self, f: F) -> Result<R, anyhow::Error>
    where
        F: FnOnce(&mut Connection) -> Result<R, anyhow::Error> + Send + 'static,
        R: Send + 'static,
    {
        let conn = tokio::time::timeout(self.timeout, self.pool.get())
            .await
            .map_err(|_| anyhow!("Timed out after {:?} waiting for a database connection", self.timeout))?
            .map_err(|e| anyhow!("Failed to get a database connection: {e}"))?;

        conn.interact(f)
            .await
            .map_err(|e| anyhow!("Database interaction failed: {e}"))?
    }
}

#[async_trait]
impl Store for SqliteStore {
    #[instrument(skip(self))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        self.interact(move |conn| User::create(conn, new_user)).await
    }

    #[instrument(skip(self))]
    async fn fetch_users(&self) -> Result<Vec<User>, anyhow::Error> {
        self.interact(|conn| Ok(User::fetch_all(conn)?)).await
    }

    #[instrument(skip(self))]
    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>, anyhow::Error> {
        self.interact(move |conn| Ok(User::fetch_by_id(conn, &id)?)).await
    }

    #[instrument(skip(self))]
    async fn create_exercise(&self, new_exercise: NewExercise) -> Result<Exercise, anyhow::Error> {
        self.interact(move |conn| Exercise::create(conn, new_exercise)).await
    }

    #[instrument(skip(self))]
    async fn fetch_exercises(&self, filter: ExerciseFilter) -> Result<Vec<Exercise>, anyhow::Error> {
        self.interact(move |conn| Ok(Exercise::fetch_filtered(conn, &filter)?)).await
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::db;

    async fn store() -> SqliteStore {
        let path = std::env::temp_dir().join(format!("store-{}.sqlite", Uuid::new_v4()));
        let path = path.to_string_lossy();
        db::run_migrations(&path).unwrap();
        SqliteStore::new(db::create_pool(&path).unwrap(), Duration::from_secs(5))
    }

    async fn log(store: &SqliteStore, user: &User, description: &str, day: u32) -> Exercise {
        let date = Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap();
        store
            .create_exercise(NewExercise::new(user, description.into(), 10, date))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_users_round_trip_in_insertion_order() {
        let store = store().await;
        let first = store.create_user(NewUser::new("zed")).await.unwrap();
        let second = store.create_user(NewUser::new("amy")).await.unwrap();
        let duplicate = store.create_user(NewUser::new("zed")).await.unwrap();

        assert_ne!(first.id, duplicate.id);
        assert_eq!(store.fetch_users().await.unwrap(), vec![first.clone(), second, duplicate]);
        assert_eq!(store.fetch_user(first.id).await.unwrap(), Some(first));
        assert_eq!(store.fetch_user(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_exercise_for_unknown_user_violates_foreign_key() {
        let store = store().await;
        let ghost = User {
            id: Uuid::new_v4(),
            username: "ghost".into(),
        };
        let new_exercise = NewExercise::new(&ghost, "run".into(), 5, Utc::now());
        assert!(store.create_exercise(new_exercise).await.is_err());
    }

    #[tokio::test]
    async fn test_filtered_exercises() {
        let store = store().await;
        let user = store.create_user(NewUser::new("fcc_test")).await.unwrap();
        let other = store.create_user(NewUser::new("other")).await.unwrap();

        // Logged out of date order to check results come back in insertion order
        let third = log(&store, &user, "third", 3).await;
        let first = log(&store, &user, "first", 1).await;
        let second = log(&store, &user, "second", 2).await;
        log(&store, &other, "not mine", 2).await;

        let all = store.fetch_exercises(ExerciseFilter::for_user(user.id)).await.unwrap();
        assert_eq!(all, vec![third.clone(), first.clone(), second.clone()]);

        let bounded = ExerciseFilter {
            from: Some(Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap()),
            to: Some(Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap()),
            ..ExerciseFilter::for_user(user.id)
        };
        assert_eq!(
            store.fetch_exercises(bounded).await.unwrap(),
            vec![third.clone(), second.clone()]
        );

        let limited = ExerciseFilter {
            limit: Some(2),
            ..ExerciseFilter::for_user(user.id)
        };
        assert_eq!(store.fetch_exercises(limited).await.unwrap(), vec![third, first]);
    }

    #[tokio::test]
    async fn test_timeout_only_bounds_waiting_for_a_connection() {
        let path = std::env::temp_dir().join(format!("store-{}.sqlite", Uuid::new_v4()));
        let path = path.to_string_lossy();
        db::run_migrations(&path).unwrap();

        let pool = deadpool_sqlite::Config::new(&*path)
            .builder(deadpool_sqlite::Runtime::Tokio1)
            .unwrap()
            .max_size(1)
            .build()
            .unwrap();
        let impatient = SqliteStore::new(pool.clone(), Duration::from_millis(200));
        let patient = SqliteStore::new(pool.clone(), Duration::from_secs(5));

        let user = patient.create_user(NewUser::new("fcc_test")).await.unwrap();

        let held = pool.get().await.unwrap();
        let err = impatient.fetch_users().await.unwrap_err();
        assert!(err.to_string().contains("waiting for a database connection"), "{err}");
        drop(held);

        assert_eq!(impatient.fetch_users().await.unwrap(), vec![user]);
    }

    #[tokio::test]
    async fn test_fractional_seconds_compare_after_whole_second_bound() {
        let store = store().await;
        let user = store.create_user(NewUser::new("fcc_test")).await.unwrap();
        let date = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        let exercise = store
            .create_exercise(NewExercise::new(&user, "sprint".into(), 1, date))
            .await
            .unwrap();
        assert_eq!(exercise.date, date);

        let from_midnight = ExerciseFilter {
            from: Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()),
            ..ExerciseFilter::for_user(user.id)
        };
        assert_eq!(store.fetch_exercises(from_midnight).await.unwrap(), vec![exercise]);

        let to_midnight = ExerciseFilter {
            to: Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()),
            ..ExerciseFilter::for_user(user.id)
        };
        assert!(store.fetch_exercises(to_midnight).await.unwrap().is_empty());
    }
}
