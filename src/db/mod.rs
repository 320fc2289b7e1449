//! Database module: donation rows and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: row struct mirroring the `donations` table and conversions
//! - `schema.rs`: SQL DDL applied at startup (SQLite-first)
//! - `sqlite.rs`: the donation store over a sqlx pool

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::DbDonation;
pub use schema::SQLITE_INIT;
pub use sqlite::{DonationStorage, SqlitePool, connect};
