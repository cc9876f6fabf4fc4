use anyhow::Result;
use dotenvy::{dotenv, var as envar};

mod server;
mod templates;

use librarium::{config::Config, db};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::read_config()?;
    let db_url = envar("DATABASE_URL").unwrap_or_else(|_| config.database_url.clone());

    let conn = db::connect(&db_url).await?;
    db::create_tables(&conn).await?;

    server::start(&conn, &config).await
}
