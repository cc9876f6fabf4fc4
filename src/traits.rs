use anyhow::Result;
use sqlx::sqlite::SqliteQueryResult;

use crate::types::uuid::Uuid;

pub trait DbTable {
    const TABLE_NAME: &'static str;
}

pub trait CreateTable {
    async fn create_table(conn: &sqlx::SqlitePool) -> Result<()>;
}

pub trait Insertable {
    async fn insert<'e, E>(&self, conn: E) -> sqlx::Result<SqliteQueryResult>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;
}

pub trait Removeable: DbTable {
    async fn remove<'e, E>(id: &Uuid, conn: E) -> sqlx::Result<SqliteQueryResult>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;
}
