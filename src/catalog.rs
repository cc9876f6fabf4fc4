//! The four catalog operations. Validation happens here; uniqueness and the
//! book→author foreign key are additionally enforced by the schema, so a
//! concurrent duplicate loses at the insert and still gets the right error.

use chrono::{Local, NaiveDate};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    error::CatalogError,
    traits::{Insertable, Removeable},
    types::{
        author::Author,
        book::{Book, BookListing},
        uuid::Uuid,
    },
};

/// Raw form input for `create_author`. The birth date field appears as both
/// `birth_date` and `birthdate` in the wild, so both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(alias = "birthdate")]
    pub birth_date: String,
    #[serde(default)]
    pub date_of_death: Option<String>,
}

/// Raw form input for `create_book`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub author_id: String,
}

fn parse_date(raw: &str) -> Result<NaiveDate, CatalogError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CatalogError::Validation(format!("'{raw}' is not a valid date (expected YYYY-MM-DD)"))
    })
}

fn is_in_future(date: NaiveDate) -> bool {
    date > Local::now().date_naive()
}

/// All books, or the books whose title contains `search` in any letter case.
pub async fn list_books(
    conn: &SqlitePool,
    search: Option<&str>,
) -> Result<Vec<BookListing>, CatalogError> {
    let search = search.map(str::trim).filter(|q| !q.is_empty());
    Ok(BookListing::search(conn, search).await?)
}

pub async fn create_author(conn: &SqlitePool, input: NewAuthor) -> Result<Author, CatalogError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::Validation(
            "Author name must not be empty".to_string(),
        ));
    }

    let birth_date = parse_date(&input.birth_date)?;
    if is_in_future(birth_date) {
        return Err(CatalogError::Validation(
            "Birth date cannot be in the future".to_string(),
        ));
    }

    // An empty form field arrives as "" rather than a missing key.
    let date_of_death = input
        .date_of_death
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty());
    let date_of_death = match date_of_death {
        Some(raw) => {
            let date = parse_date(raw)?;
            if is_in_future(date) {
                return Err(CatalogError::Validation(
                    "Death date cannot be in the future".to_string(),
                ));
            }
            if date < birth_date {
                return Err(CatalogError::Validation(
                    "Death date cannot be before birth date".to_string(),
                ));
            }
            Some(date)
        }
        None => None,
    };

    let author = Author {
        id: Uuid::new(),
        name,
        birth_date,
        date_of_death,
    };

    let mut tx = conn.begin().await?;
    author.insert(&mut tx).await?;
    tx.commit().await?;

    info!("Added author {}.", author);
    Ok(author)
}

pub async fn create_book(conn: &SqlitePool, input: NewBook) -> Result<Book, CatalogError> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(CatalogError::Validation(
            "Book title must not be empty".to_string(),
        ));
    }
    let isbn = input.isbn.trim().to_string();
    if isbn.is_empty() {
        return Err(CatalogError::Validation(
            "ISBN must not be empty".to_string(),
        ));
    }

    let author_id: Uuid = input.author_id.trim().parse().map_err(|_| {
        CatalogError::Validation(format!("'{}' is not a valid author id", input.author_id))
    })?;
    // Authors are never deleted, so this check cannot race with the insert.
    if Author::fetch_by_id(conn, &author_id).await?.is_none() {
        return Err(CatalogError::ReferentialIntegrity(format!(
            "No author with id {author_id} exists"
        )));
    }

    let book = Book {
        id: Uuid::new(),
        title,
        isbn,
        author_id,
    };

    let mut tx = conn.begin().await?;
    book.insert(&mut tx).await?;
    tx.commit().await?;

    info!("Added book {}.", book);
    Ok(book)
}

/// Deletes a book by id. A nonexistent id is always `NotFound`, never a
/// silent success.
pub async fn delete_book(conn: &SqlitePool, id: &Uuid) -> Result<(), CatalogError> {
    let mut tx = conn.begin().await?;
    let result = Book::remove(id, &mut tx).await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound);
    }
    tx.commit().await?;

    info!("Removed book {}.", id);
    Ok(())
}
