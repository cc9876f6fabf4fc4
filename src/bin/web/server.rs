use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{http::StatusCode, Router};
use handlebars::Handlebars;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use librarium::catalog::{self, NewAuthor, NewBook};
use librarium::config::Config;
use librarium::error::CatalogError;
use librarium::types::{author::Author, uuid::Uuid};

pub struct AppState {
    conn: sqlx::SqlitePool,
    templates: Handlebars<'static>,
}

pub async fn start(conn: &sqlx::SqlitePool, config: &Config) -> anyhow::Result<()> {
    let conn = conn.clone();
    let state = Arc::new(AppState {
        conn,
        templates: crate::templates::registry()?,
    });

    let app = Router::new()
        .route("/", get(home))
        .route("/add_author", get(add_author_form).post(add_author))
        .route("/add_book", get(add_book_form).post(add_book))
        .route("/book/:id/delete", post(delete_book))
        .with_state(state);

    let addr = SocketAddr::new(config.host, config.port);
    info!("Listening on {addr}.");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

/// One-time message carried back to the originating page in the query string.
#[derive(Deserialize)]
struct Flash {
    error: Option<String>,
}

#[derive(Deserialize)]
struct HomeParams {
    q: Option<String>,
    error: Option<String>,
}

fn render(state: &AppState, name: &str, data: &serde_json::Value) -> Response {
    match state.templates.render(name, data) {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!("Rendering {} failed: {}.", name, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn redirect_with_flash(path: &str, message: &str) -> Response {
    let query = serde_urlencoded::to_string([("error", message)]).unwrap_or_default();
    Redirect::to(&format!("{path}?{query}")).into_response()
}

/// Validation-type failures carry their own user-facing message; everything
/// else is wrapped with what was being attempted.
fn flash_message(action: &str, err: &CatalogError) -> String {
    match err {
        CatalogError::Validation(message)
        | CatalogError::Duplicate(message)
        | CatalogError::ReferentialIntegrity(message) => message.clone(),
        other => format!("Error {action}: {other}"),
    }
}

async fn home(Query(params): Query<HomeParams>, State(state): State<Arc<AppState>>) -> Response {
    match catalog::list_books(&state.conn, params.q.as_deref()).await {
        Ok(books) => render(
            &state,
            "home",
            &json!({ "books": books, "q": params.q, "error": params.error }),
        ),
        Err(e) => {
            error!("Listing books failed: {}.", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn add_author_form(
    Query(flash): Query<Flash>,
    State(state): State<Arc<AppState>>,
) -> Response {
    render(&state, "add_author", &json!({ "error": flash.error }))
}

async fn add_author(State(state): State<Arc<AppState>>, Form(input): Form<NewAuthor>) -> Response {
    match catalog::create_author(&state.conn, input).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            info!("Rejected author: {}.", e);
            redirect_with_flash("/add_author", &flash_message("adding author", &e))
        }
    }
}

async fn add_book_form(Query(flash): Query<Flash>, State(state): State<Arc<AppState>>) -> Response {
    let authors = match Author::fetch_all(&state.conn).await {
        Ok(authors) => authors,
        Err(e) => {
            error!("Listing authors failed: {}.", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    render(
        &state,
        "add_book",
        &json!({ "authors": authors, "error": flash.error }),
    )
}

async fn add_book(State(state): State<Arc<AppState>>, Form(input): Form<NewBook>) -> Response {
    match catalog::create_book(&state.conn, input).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            info!("Rejected book: {}.", e);
            redirect_with_flash("/add_book", &flash_message("adding book", &e))
        }
    }
}

async fn delete_book(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let id = match id.parse::<Uuid>() {
        Ok(id) => id,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };
    match catalog::delete_book(&state.conn, &id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(CatalogError::NotFound) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("Deleting book {} failed: {}.", id, e);
            redirect_with_flash("/", &flash_message("deleting book", &e))
        }
    }
}
