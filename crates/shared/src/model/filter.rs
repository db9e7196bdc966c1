use chrono::{DateTime, Utc};

use crate::{model::Exercise, types::Uuid};

/// Selects a user's exercises for the log endpoint. Both date bounds are
/// inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseFilter {
    pub user_id: Uuid,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

impl ExerciseFilter {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            from: None,
            to: None,
            limit: None,
        }
    }

    /// Whether `exercise` passes the user and date conditions. The limit is
    /// applied by whoever collects the matches
    pub fn matches(&self, exercise: &Exercise) -> bool {
        exercise.user_id == self.user_id
            && self.from.map_or(true, |from| exercise.date >= from)
            && self.to.map_or(true, |to| exercise.date <= to)
    }
}
