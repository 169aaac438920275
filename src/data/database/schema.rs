//! SQLite schema for the recipe cache and a small migration runner.

use log::{debug, info, warn};
use rusqlite::Connection;

use crate::constants::{
    FAVORITE_RECIPES_TABLE, FOOD_JOKE_TABLE, PREFERENCES_TABLE, RECIPES_TABLE,
};
use crate::error::Result;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

fn init_schema_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    init_schema_version(conn)?;

    let version = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Apply all pending migrations to bring the database up to date
pub fn migrate(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    debug!("Current schema version: {}", current_version);

    if current_version > SCHEMA_VERSION {
        // Cached data is disposable: a database written by a newer build is
        // wiped rather than read with the wrong layout.
        warn!(
            "Schema version {} is newer than supported {}, recreating cache tables",
            current_version, SCHEMA_VERSION
        );
        drop_all(conn)?;
        return migrate(conn);
    }

    if current_version == SCHEMA_VERSION {
        return Ok(());
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        info!("Applying migration to version {}", version);
        apply_migration(conn, version)?;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        // The loop above never goes past SCHEMA_VERSION
        _ => Ok(()),
    }
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {RECIPES_TABLE} (
            id INTEGER PRIMARY KEY,
            food_recipe TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {FAVORITE_RECIPES_TABLE} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL,
            result TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_favorites_recipe_id
            ON {FAVORITE_RECIPES_TABLE}(recipe_id);

        CREATE TABLE IF NOT EXISTS {FOOD_JOKE_TABLE} (
            id INTEGER PRIMARY KEY,
            text TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {PREFERENCES_TABLE} (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "
    ))?;
    Ok(())
}

fn drop_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "
        DROP TABLE IF EXISTS {RECIPES_TABLE};
        DROP TABLE IF EXISTS {FAVORITE_RECIPES_TABLE};
        DROP TABLE IF EXISTS {FOOD_JOKE_TABLE};
        DROP TABLE IF EXISTS {PREFERENCES_TABLE};
        DROP TABLE IF EXISTS schema_version;
        "
    ))?;
    Ok(())
}
