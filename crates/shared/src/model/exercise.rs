use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{model::User, types::Uuid};

#[cfg(feature = "backend")]
use {
    crate::model::ExerciseFilter,
    anyhow::anyhow,
    exemplar::Model,
    rusqlite::{
        types::{ToSql, ToSqlOutput, Value, ValueRef},
        Connection, OptionalExtension,
    },
    sea_query::{enum_def, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Copy of the user's name at the time the exercise was logged
    pub username: String,
    pub description: String,
    /// Minutes
    pub duration: i64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub user_id: Uuid,
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: DateTime<Utc>,
}

impl NewExercise {
    pub fn new(user: &User, description: String, duration: i64, date: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            description,
            duration,
            date,
        }
    }

    pub fn with_id(self, id: Uuid) -> Exercise {
        let Self {
            user_id,
            username,
            description,
            duration,
            date,
        } = self;
        Exercise {
            id,
            user_id,
            username,
            description,
            duration,
            date,
        }
    }
}

/// Text the `date` column holds for `date`. Bounds are bound with the same
/// encoding so the comparison is a plain text comparison
#[cfg(feature = "backend")]
fn date_column_text(date: &DateTime<Utc>) -> Result<String, rusqlite::Error> {
    match date.to_sql()? {
        ToSqlOutput::Owned(Value::Text(text)) => Ok(text),
        ToSqlOutput::Borrowed(ValueRef::Text(text)) => Ok(String::from_utf8_lossy(text).into_owned()),
        _ => Err(rusqlite::Error::ToSqlConversionFailure(
            "date column is not stored as text".into(),
        )),
    }
}

#[cfg(feature = "backend")]
impl Exercise {
    fn select() -> SelectStatement {
        Query::select()
            .columns([
                ExerciseIden::Id,
                ExerciseIden::UserId,
                ExerciseIden::Username,
                ExerciseIden::Description,
                ExerciseIden::Duration,
                ExerciseIden::Date,
            ])
            .from(ExerciseIden::Table)
            .to_owned()
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Option<Exercise>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(ExerciseIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.query_row(&*values.as_params(), Exercise::from_row).optional()
    }

    /// Exercises matching `filter` in insertion order
    pub fn fetch_filtered(
        conn: &Connection,
        filter: &ExerciseFilter,
    ) -> Result<Vec<Exercise>, rusqlite::Error> {
        let mut query = Self::select();
        query.and_where(Expr::col(ExerciseIden::UserId).eq(filter.user_id));

        if let Some(from) = &filter.from {
            query.and_where(Expr::col(ExerciseIden::Date).gte(date_column_text(from)?));
        }
        if let Some(to) = &filter.to {
            query.and_where(Expr::col(ExerciseIden::Date).lte(date_column_text(to)?));
        }

        query.order_by_expr(Expr::cust("rowid"), Order::Asc);

        if let Some(limit) = filter.limit {
            query.limit(limit);
        }

        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), Exercise::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    pub fn create(conn: &mut Connection, new_exercise: NewExercise) -> Result<Exercise, anyhow::Error> {
        let id = Uuid::new_v4();
        let tx = conn.transaction()?;
        let exercise = {
            new_exercise.with_id(id).insert(&tx)?;
            Exercise::fetch_by_id(&tx, &id)?
                .ok_or_else(|| anyhow!("Exercise {id} missing after insert"))?
        };
        tx.commit()?;

        Ok(exercise)
    }
}
