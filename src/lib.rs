//! Library catalog: authors and the books they wrote, backed by SQLite.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod traits;
pub mod types;
