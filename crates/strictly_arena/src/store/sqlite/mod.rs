//! SQLite persistence for games and move logs.

mod models;
mod repository;
mod schema; // Diesel schema - internal use only

pub use repository::SqliteStore;
