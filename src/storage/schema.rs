//! Database schema definitions
//!
//! This module contains the SQL schema for the frontier database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Every canonical URL ever observed
CREATE TABLE IF NOT EXISTS urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    status TEXT NOT NULL,
    digest TEXT,
    created INTEGER NOT NULL,
    updated INTEGER NOT NULL,
    CHECK (created <= updated)
);

CREATE INDEX IF NOT EXISTS idx_urls_status_updated ON urls(status, updated);

-- Links found on a page, keyed by the page's record
CREATE TABLE IF NOT EXISTS links (
    url_id INTEGER NOT NULL REFERENCES urls(id),
    link TEXT NOT NULL,
    UNIQUE(url_id, link)
);
"#;

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 1;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
