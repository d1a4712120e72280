pub mod config;
pub mod embeddings;
pub mod images;
pub mod sqlite;
