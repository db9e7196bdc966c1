use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{present, Scalar};
use crate::{
    api::error::ServerError,
    model::{Exercise, NewExercise, User, ValidateModel},
    types::Uuid,
    utils::{format_date, DateParseError},
};

pub const DESCRIPTION_AND_DURATION_REQUIRED: &str = "Description and duration are required";

/// Body of `POST /api/users/:_id/exercises`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewExercisePayload {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<Scalar>,
    #[serde(default)]
    pub date: Option<Scalar>,
}

/// An exercise body with every required field present. Values are still raw:
/// they are only parsed once the user is known to exist
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseFields {
    pub description: String,
    pub duration: Scalar,
    pub date: Option<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExerciseFieldsError {
    #[error("Duration is not an integer: {0:?}")]
    Duration(Scalar),
    #[error(transparent)]
    Date(#[from] DateParseError),
}

impl ValidateModel for NewExercisePayload {
    type Valid = ExerciseFields;

    fn validate(self) -> Result<ExerciseFields, ServerError> {
        let description = self.description.filter(|d| !d.is_empty());
        let duration = present(self.duration.as_ref()).cloned();

        match (description, duration) {
            (Some(description), Some(duration)) => Ok(ExerciseFields {
                description,
                duration,
                date: present(self.date.as_ref()).cloned(),
            }),
            _ => Err(ServerError::validation(DESCRIPTION_AND_DURATION_REQUIRED)),
        }
    }
}

impl ExerciseFields {
    /// Parses the raw values into an exercise for `user`, dated `now` when no
    /// date was supplied
    pub fn into_new_exercise(
        self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<NewExercise, ExerciseFieldsError> {
        let duration = self
            .duration
            .to_integer()
            .ok_or_else(|| ExerciseFieldsError::Duration(self.duration.clone()))?;

        let date = match &self.date {
            Some(date) => date.to_date()?,
            None => now,
        };

        Ok(NewExercise::new(user, self.description, duration, date))
    }
}

/// Response of `POST /api/users/:_id/exercises`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseResponse {
    /// Id of the user the exercise was logged for
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub date: String,
    pub duration: i64,
    pub description: String,
}

impl From<&Exercise> for ExerciseResponse {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.user_id,
            username: exercise.username.clone(),
            date: format_date(&exercise.date),
            duration: exercise.duration,
            description: exercise.description.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "fcc_test".into(),
        }
    }

    fn payload(description: Option<&str>, duration: Option<Scalar>, date: Option<&str>) -> NewExercisePayload {
        NewExercisePayload {
            description: description.map(Into::into),
            duration,
            date: date.map(Scalar::from),
        }
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let expected = Err(ServerError::validation(DESCRIPTION_AND_DURATION_REQUIRED));
        assert_eq!(payload(None, Some(Scalar::Integer(30)), None).validate(), expected);
        assert_eq!(payload(Some("run"), None, None).validate(), expected);
        assert_eq!(payload(Some(""), Some(Scalar::Integer(30)), None).validate(), expected);
        assert_eq!(payload(Some("run"), Some("".into()), None).validate(), expected);
    }

    #[test]
    fn test_blank_date_is_dropped() {
        let fields = payload(Some("run"), Some("30".into()), Some("")).validate().unwrap();
        assert_eq!(fields.date, None);
    }

    #[test]
    fn test_into_new_exercise() {
        let user = user();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let fields = payload(Some("test"), Some("30".into()), Some("2023-01-01"))
            .validate()
            .unwrap();

        let exercise = fields.into_new_exercise(&user, now).unwrap();
        assert_eq!(exercise.user_id, user.id);
        assert_eq!(exercise.username, "fcc_test");
        assert_eq!(exercise.description, "test");
        assert_eq!(exercise.duration, 30);
        assert_eq!(exercise.date, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_date_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let fields = payload(Some("test"), Some(Scalar::Integer(10)), None).validate().unwrap();
        assert_eq!(fields.into_new_exercise(&user(), now).unwrap().date, now);
    }

    #[test]
    fn test_unparseable_values() {
        let now = Utc::now();
        let fields = payload(Some("test"), Some("long".into()), None).validate().unwrap();
        assert_eq!(
            fields.into_new_exercise(&user(), now),
            Err(ExerciseFieldsError::Duration("long".into()))
        );

        let fields = payload(Some("test"), Some(Scalar::Integer(5)), Some("someday")).validate().unwrap();
        assert!(matches!(
            fields.into_new_exercise(&user(), now),
            Err(ExerciseFieldsError::Date(_))
        ));
    }

    #[test]
    fn test_response_uses_user_id_and_display_date() {
        let user = user();
        let date = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let exercise = NewExercise::new(&user, "test".into(), 30, date).with_id(Uuid::new_v4());

        let json = serde_json::to_value(ExerciseResponse::from(&exercise)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": user.id.to_string(),
                "username": "fcc_test",
                "date": "Sun Jan 01 2023",
                "duration": 30,
                "description": "test",
            })
        );
    }
}
