use std::sync::atomic::{AtomicU64, Ordering};

use axum::async_trait;
use dashmap::DashMap;
use shared::{
    model::{Exercise, ExerciseFilter, NewExercise, NewUser, User},
    types::Uuid,
};

use super::Store;

#[derive(Debug, Clone)]
struct Sequenced<T> {
    sequence: u64,
    record: T,
}

/// [`Store`] that keeps everything in process memory. Used by tests and by
/// `--in-memory` runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, Sequenced<User>>,
    exercises: DashMap<Uuid, Sequenced<Exercise>>,
    sequence: AtomicU64,
}

impl MemoryStore {
    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

fn in_insertion_order<T>(mut records: Vec<Sequenced<T>>) -> Vec<T> {
    records.sort_by_key(|r| r.sequence);
    records.into_iter().map(|r| r.record).collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        let user = new_user.with_id(Uuid::new_v4());
        let sequence = self.next_sequence();
        self.users.insert(user.id, Sequenced { sequence, record: user.clone() });
        Ok(user)
    }

    async fn fetch_users(&self) -> Result<Vec<User>, anyhow::Error> {
        let users = self.users.iter().map(|r| r.value().clone()).collect();
        Ok(in_insertion_order(users))
    }

    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>, anyhow::Error> {
        Ok(self.users.get(&id).map(|r| r.record.clone()))
    }

    async fn create_exercise(&self, new_exercise: NewExercise) -> Result<Exercise, anyhow::Error> {
        if !self.users.contains_key(&new_exercise.user_id) {
            anyhow::bail!("No user {} for new exercise", new_exercise.user_id);
        }

        let exercise = new_exercise.with_id(Uuid::new_v4());
        let sequence = self.next_sequence();
        self.exercises.insert(exercise.id, Sequenced { sequence, record: exercise.clone() });
        Ok(exercise)
    }

    async fn fetch_exercises(&self, filter: ExerciseFilter) -> Result<Vec<Exercise>, anyhow::Error> {
        let matching = self
            .exercises
            .iter()
            .filter(|r| filter.matches(&r.record))
            .map(|r| r.value().clone())
            .collect();

        let mut exercises = in_insertion_order(matching);
        if let Some(limit) = filter.limit {
            exercises.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(exercises)
    }
}
