//! Database module: models, schema and stores for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and conversions
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: repository-style stores over a sqlx pool

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{AccountRow, CredentialRow};
pub use schema::SQLITE_INIT;
pub use sqlite::{AccountStore, CredentialStore, SqlitePool, TokenStore, connect};
