pub mod uuid;

pub mod author;
pub mod book;
