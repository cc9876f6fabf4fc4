use std::fmt::Display;

use anyhow::Result;
use serde::Serialize;
use sqlx::{sqlite::SqliteQueryResult, FromRow};

use crate::{
    traits::{CreateTable, DbTable, Insertable, Removeable},
    types::{author::Author, uuid::Uuid},
};

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
    pub author_id: Uuid,
}

/// A book joined with its author's name, as shown on the list page.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct BookListing {
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
    pub author_id: Uuid,
    pub author_name: String,
}

impl DbTable for Book {
    const TABLE_NAME: &'static str = "book";
}

impl CreateTable for Book {
    async fn create_table(conn: &sqlx::SqlitePool) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                isbn TEXT NOT NULL UNIQUE,
                author_id TEXT NOT NULL REFERENCES author(id)
            );"#,
            Self::TABLE_NAME
        ))
        .execute(conn)
        .await?;
        Ok(())
    }
}

impl Insertable for Book {
    async fn insert<'e, E>(&self, conn: E) -> sqlx::Result<SqliteQueryResult>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO book ( id, title, isbn, author_id )
            VALUES ( ?1, ?2, ?3, ?4 )
            "#,
        )
        .bind(&self.id)
        .bind(&self.title)
        .bind(&self.isbn)
        .bind(&self.author_id)
        .execute(conn)
        .await
    }
}

impl Removeable for Book {
    async fn remove<'e, E>(id: &Uuid, conn: E) -> sqlx::Result<SqliteQueryResult>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(&format!("DELETE FROM {} WHERE id = ?1", Self::TABLE_NAME))
            .bind(id)
            .execute(conn)
            .await
    }
}

impl Book {
    pub async fn fetch_by_id(conn: &sqlx::SqlitePool, id: &Uuid) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT * FROM {} WHERE id = ?1",
            Self::TABLE_NAME
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    pub async fn author(&self, conn: &sqlx::SqlitePool) -> sqlx::Result<Author> {
        sqlx::query_as::<_, Author>(&format!(
            "SELECT * FROM {} WHERE id = ?1",
            Author::TABLE_NAME
        ))
        .bind(&self.author_id)
        .fetch_one(conn)
        .await
    }
}

impl BookListing {
    /// Books joined with their author, optionally filtered by a
    /// case-insensitive substring match on the title.
    pub async fn search(conn: &sqlx::SqlitePool, title: Option<&str>) -> sqlx::Result<Vec<Self>> {
        match title {
            Some(title) => {
                sqlx::query_as::<_, Self>(
                    r#"
                    SELECT book.id, book.title, book.isbn, book.author_id,
                           author.name AS author_name
                    FROM book
                    INNER JOIN author ON author.id = book.author_id
                    WHERE book.title LIKE ?1
                    ORDER BY book.rowid
                    "#,
                )
                .bind(format!("%{title}%"))
                .fetch_all(conn)
                .await
            }
            None => {
                sqlx::query_as::<_, Self>(
                    r#"
                    SELECT book.id, book.title, book.isbn, book.author_id,
                           author.name AS author_name
                    FROM book
                    INNER JOIN author ON author.id = book.author_id
                    ORDER BY book.rowid
                    "#,
                )
                .fetch_all(conn)
                .await
            }
        }
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] ({})", self.title, self.isbn, self.id)
    }
}
