use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    model::{Exercise, ExerciseFilter, User},
    types::Uuid,
    utils::{format_date, parse_date, parse_leading_integer, DateParseError},
};

/// Query string of `GET /api/users/:_id/logs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl LogQuery {
    /// Builds the exercise filter for `user_id`.
    ///
    /// Empty bounds are ignored. Only a positive `limit` caps the result.
    pub fn into_filter(self, user_id: Uuid) -> Result<ExerciseFilter, DateParseError> {
        fn bound(value: Option<String>) -> Result<Option<DateTime<Utc>>, DateParseError> {
            value
                .filter(|v| !v.is_empty())
                .map(parse_date)
                .transpose()
        }

        let limit = self
            .limit
            .as_deref()
            .and_then(parse_leading_integer)
            .filter(|limit| *limit > 0)
            .map(|limit| limit as u64);

        Ok(ExerciseFilter {
            user_id,
            from: bound(self.from)?,
            to: bound(self.to)?,
            limit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<&Exercise> for LogEntry {
    fn from(exercise: &Exercise) -> Self {
        Self {
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: format_date(&exercise.date),
        }
    }
}

/// Response of `GET /api/users/:_id/logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

impl LogResponse {
    pub fn new(user: &User, filter: &ExerciseFilter, exercises: &[Exercise]) -> Self {
        let log: Vec<LogEntry> = exercises.iter().map(LogEntry::from).collect();
        Self {
            id: user.id,
            username: user.username.clone(),
            from: filter.from.as_ref().map(format_date),
            to: filter.to.as_ref().map(format_date),
            count: log.len(),
            log,
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::NewExercise;

    fn query(from: Option<&str>, to: Option<&str>, limit: Option<&str>) -> LogQuery {
        LogQuery {
            from: from.map(Into::into),
            to: to.map(Into::into),
            limit: limit.map(Into::into),
        }
    }

    #[test]
    fn test_empty_query_has_no_bounds() {
        let id = Uuid::new_v4();
        let filter = LogQuery::default().into_filter(id).unwrap();
        assert_eq!(filter, ExerciseFilter::for_user(id));
    }

    #[test]
    fn test_bounds_and_limit() {
        let filter = query(Some("2023-01-01"), Some("2023-01-31"), Some("3"))
            .into_filter(Uuid::new_v4())
            .unwrap();
        assert_eq!(filter.from, Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(filter.to, Some(Utc.with_ymd_and_hms(2023, 1, 31, 0, 0, 0).unwrap()));
        assert_eq!(filter.limit, Some(3));
    }

    #[test]
    fn test_non_positive_or_garbage_limit_means_no_cap() {
        for limit in ["0", "-2", "", "many"] {
            let filter = query(None, None, Some(limit)).into_filter(Uuid::new_v4()).unwrap();
            assert_eq!(filter.limit, None, "limit={limit:?}");
        }
    }

    #[test]
    fn test_empty_bounds_are_ignored() {
        let filter = query(Some(""), Some(""), None).into_filter(Uuid::new_v4()).unwrap();
        assert_eq!(filter.from, None);
        assert_eq!(filter.to, None);
    }

    #[test]
    fn test_bad_bound() {
        assert!(query(Some("last week"), None, None)
            .into_filter(Uuid::new_v4())
            .is_err());
    }

    #[test]
    fn test_response_echoes_bounds_and_counts() {
        let user = User {
            id: Uuid::new_v4(),
            username: "fcc_test".into(),
        };
        let filter = query(Some("2023-01-01"), None, None).into_filter(user.id).unwrap();
        let exercises = vec![
            NewExercise::new(
                &user,
                "test".into(),
                30,
                Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap(),
            )
            .with_id(Uuid::new_v4()),
        ];

        let json = serde_json::to_value(LogResponse::new(&user, &filter, &exercises)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": user.id.to_string(),
                "username": "fcc_test",
                "from": "Sun Jan 01 2023",
                "count": 1,
                "log": [
                    { "description": "test", "duration": 30, "date": "Mon Jan 02 2023" }
                ],
            })
        );
    }
}
