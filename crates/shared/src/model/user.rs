use serde::{Deserialize, Serialize};

use crate::types::Uuid;

#[cfg(feature = "backend")]
use {
    anyhow::anyhow,
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("user"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
}

/// A user that hasn't been given an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
}

impl NewUser {
    pub fn new<T: Into<String>>(username: T) -> Self {
        Self { username: username.into() }
    }

    pub fn with_id(self, id: Uuid) -> User {
        User { id, username: self.username }
    }
}

#[cfg(feature = "backend")]
impl User {
    fn select() -> SelectStatement {
        Query::select()
            .columns([UserIden::Id, UserIden::Username])
            .from(UserIden::Table)
            .to_owned()
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Option<User>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .and_where(Expr::col(UserIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.query_row(&*values.as_params(), User::from_row).optional()
    }

    /// Every user in insertion order
    pub fn fetch_all(conn: &Connection) -> Result<Vec<User>, rusqlite::Error> {
        let (sql, values) = Self::select()
            .order_by_expr(Expr::cust("rowid"), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), User::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    pub fn create(conn: &mut Connection, new_user: NewUser) -> Result<User, anyhow::Error> {
        let id = Uuid::new_v4();
        let tx = conn.transaction()?;
        let user = {
            new_user.with_id(id).insert(&tx)?;
            User::fetch_by_id(&tx, &id)?
                .ok_or_else(|| anyhow!("User {id} missing after insert"))?
        };
        tx.commit()?;

        Ok(user)
    }
}
