use thiserror::Error;

/// Everything a catalog operation can fail with. All variants are handled at
/// the request-handler boundary; none are allowed to crash the process.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    ReferentialIntegrity(String),
    #[error("not found")]
    NotFound,
    #[error("internal error: {0}")]
    Persistence(#[source] sqlx::Error),
}

// SQLite extended result codes relevant here. 1555 is a primary-key
// violation, which for our TEXT uuid keys only happens on a collision.
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let code = db_err.code();
            let code = code.as_deref();
            if code == Some(SQLITE_CONSTRAINT_UNIQUE) || code == Some(SQLITE_CONSTRAINT_PRIMARYKEY)
            {
                let message = db_err.message();
                if message.contains("book.isbn") {
                    return Self::Duplicate("Book with this ISBN already exists".to_string());
                }
                if message.contains("author.name") || message.contains("author.birth_date") {
                    return Self::Duplicate("Author already exists".to_string());
                }
                return Self::Duplicate(message.to_string());
            }
            if code == Some(SQLITE_CONSTRAINT_FOREIGNKEY) {
                return Self::ReferentialIntegrity(
                    "Book refers to an author that does not exist".to_string(),
                );
            }
        }
        if matches!(err, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }
        Self::Persistence(err)
    }
}
