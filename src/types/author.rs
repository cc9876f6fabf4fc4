use std::fmt::Display;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{sqlite::SqliteQueryResult, FromRow};

use crate::{
    traits::{CreateTable, DbTable, Insertable},
    types::{book::Book, uuid::Uuid},
};

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub date_of_death: Option<NaiveDate>,
}

impl DbTable for Author {
    const TABLE_NAME: &'static str = "author";
}

impl CreateTable for Author {
    async fn create_table(conn: &sqlx::SqlitePool) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                birth_date TEXT NOT NULL,
                date_of_death TEXT,
                UNIQUE (name, birth_date)
            );"#,
            Self::TABLE_NAME
        ))
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl Insertable for Author {
    async fn insert<'e, E>(&self, conn: E) -> sqlx::Result<SqliteQueryResult>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO author ( id, name, birth_date, date_of_death )
            VALUES ( ?1, ?2, ?3, ?4 )
            "#,
        )
        .bind(&self.id)
        .bind(&self.name)
        .bind(self.birth_date)
        .bind(self.date_of_death)
        .execute(conn)
        .await
    }
}

impl Author {
    pub async fn fetch_all(conn: &sqlx::SqlitePool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT * FROM {} ORDER BY rowid",
            Self::TABLE_NAME
        ))
        .fetch_all(conn)
        .await
    }

    pub async fn fetch_by_id(conn: &sqlx::SqlitePool, id: &Uuid) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT * FROM {} WHERE id = ?1",
            Self::TABLE_NAME
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Books written by this author, in insertion order.
    pub async fn books(&self, conn: &sqlx::SqlitePool) -> sqlx::Result<Vec<Book>> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT * FROM {} WHERE author_id = ?1 ORDER BY rowid",
            Book::TABLE_NAME
        ))
        .bind(&self.id)
        .fetch_all(conn)
        .await
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
