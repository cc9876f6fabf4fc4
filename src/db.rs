use std::path::Path;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    Pool, SqlitePool,
};

use crate::{
    traits::CreateTable,
    types::{author::Author, book::Book},
};

/// Opens (and on first run creates) the file-backed database.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(Pool::connect_with(
        SqliteConnectOptions::new()
            .filename(database_url)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .create_if_missing(true),
    )
    .await?)
}

pub async fn create_tables(conn: &SqlitePool) -> Result<()> {
    tokio::try_join!(Author::create_table(conn), Book::create_table(conn))?;
    Ok(())
}
