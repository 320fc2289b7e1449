//! SQL DDL for initializing the donation storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT (ids are never reused)
/// - `amount_cents` INTEGER, fixed 2-decimal precision, strictly positive
/// - `date` TEXT, RFC3339 UTC with microseconds (fixed width, sorts lexically)
/// - `crm_synced` BOOLEAN (stored as INTEGER 0/1)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS donations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    donor_name TEXT NOT NULL,
    amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
    date TEXT NOT NULL,
    crm_synced INTEGER NOT NULL DEFAULT 0,
    crm_response TEXT NOT NULL DEFAULT 'Pending'
);

CREATE INDEX IF NOT EXISTS idx_donations_date ON donations(date);
"#;
