use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use librarium::catalog::{self, NewAuthor, NewBook};
use librarium::db;
use librarium::error::CatalogError;
use librarium::types::{author::Author, book::Book, uuid::Uuid};

// In-memory sqlite gives every connection its own database, so the pool is
// capped at a single connection.
async fn setup() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(":memory:")
                .foreign_keys(true),
        )
        .await
        .unwrap();
    db::create_tables(&pool).await.unwrap();
    pool
}

fn new_author(name: &str, birth_date: &str, date_of_death: Option<&str>) -> NewAuthor {
    NewAuthor {
        name: name.to_string(),
        birth_date: birth_date.to_string(),
        date_of_death: date_of_death.map(str::to_string),
    }
}

fn new_book(title: &str, isbn: &str, author_id: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        isbn: isbn.to_string(),
        author_id: author_id.to_string(),
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn valid_author_round_trips() {
    let conn = setup().await;
    let author = catalog::create_author(
        &conn,
        new_author("Mary Shelley", "1797-08-30", Some("1851-02-01")),
    )
    .await
    .unwrap();

    let stored = Author::fetch_by_id(&conn, &author.id).await.unwrap();
    assert_eq!(stored, Some(author.clone()));
    assert_eq!(author.name, "Mary Shelley");
    assert_eq!(author.birth_date, date("1797-08-30"));
    assert_eq!(author.date_of_death, Some(date("1851-02-01")));
}

#[tokio::test]
async fn living_author_has_no_death_date() {
    let conn = setup().await;
    let author = catalog::create_author(&conn, new_author("Anne Carson", "1950-06-21", None))
        .await
        .unwrap();
    assert_eq!(author.date_of_death, None);

    // An empty form field is treated as absent, not as a malformed date.
    let author = catalog::create_author(&conn, new_author("Ali Smith", "1962-08-24", Some("")))
        .await
        .unwrap();
    assert_eq!(author.date_of_death, None);
}

#[tokio::test]
async fn author_input_is_trimmed() {
    let conn = setup().await;
    let author = catalog::create_author(&conn, new_author("  Jane Austen  ", " 1775-12-16 ", None))
        .await
        .unwrap();
    assert_eq!(author.name, "Jane Austen");
    assert_eq!(author.birth_date, date("1775-12-16"));
}

#[tokio::test]
async fn future_birth_date_is_rejected() {
    let conn = setup().await;
    let err = catalog::create_author(&conn, new_author("Time Traveler", "9999-01-01", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(err.to_string(), "Birth date cannot be in the future");
    assert!(Author::fetch_all(&conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn future_death_date_is_rejected() {
    let conn = setup().await;
    let err = catalog::create_author(
        &conn,
        new_author("Time Traveler", "1950-01-01", Some("9999-01-01")),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Death date cannot be in the future");
    assert!(Author::fetch_all(&conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn death_before_birth_is_rejected() {
    let conn = setup().await;
    let err = catalog::create_author(
        &conn,
        new_author("Benjamin Button", "1900-01-01", Some("1899-12-31")),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Death date cannot be before birth date");
    assert!(Author::fetch_all(&conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let conn = setup().await;
    for bad in ["16-12-1775", "1775/12/16", "yesterday", "1775-13-01"] {
        let err = catalog::create_author(&conn, new_author("Jane Austen", bad, None))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)), "{bad}");
    }
    let err = catalog::create_author(
        &conn,
        new_author("Jane Austen", "1775-12-16", Some("not a date")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert!(Author::fetch_all(&conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_author_name_is_rejected() {
    let conn = setup().await;
    let err = catalog::create_author(&conn, new_author("   ", "1775-12-16", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn duplicate_author_is_rejected() {
    let conn = setup().await;
    catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None))
        .await
        .unwrap();

    let err = catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate(_)));
    assert_eq!(err.to_string(), "Author already exists");
    assert_eq!(Author::fetch_all(&conn).await.unwrap().len(), 1);

    // Same name with a different birth date is a different person.
    catalog::create_author(&conn, new_author("Jane Austen", "1900-01-01", None))
        .await
        .unwrap();
    assert_eq!(Author::fetch_all(&conn).await.unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_duplicate_authors_leave_one_record() {
    let conn = setup().await;
    let (a, b) = tokio::join!(
        catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None)),
        catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None)),
    );
    assert_eq!(a.is_ok() as usize + b.is_ok() as usize, 1);
    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(matches!(loser, CatalogError::Duplicate(_)));
    assert_eq!(Author::fetch_all(&conn).await.unwrap().len(), 1);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let conn = setup().await;
    let author = catalog::create_author(&conn, new_author("Various", "1900-01-01", None))
        .await
        .unwrap();
    let author_id = author.id.to_string();
    catalog::create_book(&conn, new_book("The ABCs", "1", &author_id))
        .await
        .unwrap();
    catalog::create_book(&conn, new_book("xyz", "2", &author_id))
        .await
        .unwrap();

    let hits = catalog::list_books(&conn, Some("abc")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "The ABCs");
    assert_eq!(hits[0].author_name, "Various");

    // No search text, or blank search text, returns everything.
    assert_eq!(catalog::list_books(&conn, None).await.unwrap().len(), 2);
    assert_eq!(catalog::list_books(&conn, Some("  ")).await.unwrap().len(), 2);

    assert!(catalog::list_books(&conn, Some("nothing"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn duplicate_isbn_is_rejected() {
    let conn = setup().await;
    let author = catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None))
        .await
        .unwrap();
    let author_id = author.id.to_string();
    let original = catalog::create_book(&conn, new_book("Emma", "111", &author_id))
        .await
        .unwrap();

    let err = catalog::create_book(&conn, new_book("Not Emma", "111", &author_id))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate(_)));
    assert_eq!(err.to_string(), "Book with this ISBN already exists");

    // The original book is unaffected.
    let stored = Book::fetch_by_id(&conn, &original.id).await.unwrap();
    assert_eq!(stored, Some(original));
    assert_eq!(catalog::list_books(&conn, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn book_requires_existing_author() {
    let conn = setup().await;

    let err = catalog::create_book(&conn, new_book("Orphan", "111", &Uuid::new().to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ReferentialIntegrity(_)));

    let err = catalog::create_book(&conn, new_book("Orphan", "111", "not-a-uuid"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    assert!(catalog::list_books(&conn, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_book_fields_are_rejected() {
    let conn = setup().await;
    let author = catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None))
        .await
        .unwrap();
    let author_id = author.id.to_string();

    let err = catalog::create_book(&conn, new_book("  ", "111", &author_id))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    let err = catalog::create_book(&conn, new_book("Emma", "  ", &author_id))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn deleting_missing_book_is_not_found() {
    let conn = setup().await;
    let author = catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None))
        .await
        .unwrap();
    catalog::create_book(&conn, new_book("Emma", "111", &author.id.to_string()))
        .await
        .unwrap();

    let err = catalog::delete_book(&conn, &Uuid::new()).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));
    assert_eq!(catalog::list_books(&conn, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_book_leaves_author_and_siblings() {
    let conn = setup().await;
    let author = catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None))
        .await
        .unwrap();
    let author_id = author.id.to_string();
    let emma = catalog::create_book(&conn, new_book("Emma", "111", &author_id))
        .await
        .unwrap();
    let persuasion = catalog::create_book(&conn, new_book("Persuasion", "222", &author_id))
        .await
        .unwrap();

    catalog::delete_book(&conn, &emma.id).await.unwrap();

    // Deleting again is NotFound, never a silent success.
    let err = catalog::delete_book(&conn, &emma.id).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));

    let remaining = author.books(&conn).await.unwrap();
    assert_eq!(remaining, vec![persuasion]);
    assert_eq!(
        Author::fetch_by_id(&conn, &author.id).await.unwrap(),
        Some(author)
    );
}

#[tokio::test]
async fn books_navigate_back_to_their_author() {
    let conn = setup().await;
    let author = catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None))
        .await
        .unwrap();
    let emma = catalog::create_book(&conn, new_book("Emma", "111", &author.id.to_string()))
        .await
        .unwrap();
    assert_eq!(emma.author(&conn).await.unwrap(), author);
}

#[tokio::test]
async fn jane_austen_scenario() {
    let conn = setup().await;

    let jane = catalog::create_author(&conn, new_author("Jane Austen", "1775-12-16", None))
        .await
        .unwrap();
    let emma = catalog::create_book(&conn, new_book("Emma", "111", &jane.id.to_string()))
        .await
        .unwrap();

    let hits = catalog::list_books(&conn, Some("emma")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, emma.id);
    assert_eq!(hits[0].author_name, "Jane Austen");

    catalog::delete_book(&conn, &emma.id).await.unwrap();
    assert!(catalog::list_books(&conn, None).await.unwrap().is_empty());
    assert_eq!(
        Author::fetch_by_id(&conn, &jane.id).await.unwrap(),
        Some(jane)
    );
}
