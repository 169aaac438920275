//! SQLite storage for the offline cache, favorites and preferences.
//!
//! Records are stored as JSON text, so the table layout stays stable while
//! the API model grows new fields.

mod entities;
pub mod schema;

pub use entities::{FavoritesEntity, FoodJokeEntity, RecipesEntity, SINGLE_ROW_ID};

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::constants::{
    FAVORITE_RECIPES_TABLE, FOOD_JOKE_TABLE, PREFERENCES_TABLE, RECIPES_TABLE,
};
use crate::error::{MealMuseError, Result};
use crate::model::{FoodJoke, FoodRecipe, Recipe};

pub struct RecipesDatabase {
    conn: Mutex<Connection>,
}

impl RecipesDatabase {
    /// Open (or create) the database file and bring its schema up to date
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!("Opening recipes database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| MealMuseError::LockPoisoned)
    }

    // Offline recipe cache

    /// Replace the cached recipe list. The entity id is ignored; there is
    /// only ever the one row.
    pub fn insert_recipes(&self, entity: &RecipesEntity) -> Result<()> {
        let blob = serde_json::to_string(&entity.food_recipe)?;
        self.conn()?.execute(
            &format!("INSERT OR REPLACE INTO {RECIPES_TABLE} (id, food_recipe) VALUES (?1, ?2)"),
            params![SINGLE_ROW_ID, blob],
        )?;
        Ok(())
    }

    pub fn read_recipes(&self) -> Result<Vec<RecipesEntity>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, food_recipe FROM {RECIPES_TABLE} ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entities = Vec::new();
        for row in rows {
            let (id, blob) = row?;
            let food_recipe: FoodRecipe = serde_json::from_str(&blob)?;
            entities.push(RecipesEntity { id, food_recipe });
        }
        Ok(entities)
    }

    // Favorites

    /// Insert a favorite, replacing any row with the same id. Returns the row id.
    pub fn insert_favorite_recipe(&self, entity: &FavoritesEntity) -> Result<i64> {
        let blob = serde_json::to_string(&entity.result)?;
        let conn = self.conn()?;
        if entity.id == 0 {
            conn.execute(
                &format!(
                    "INSERT INTO {FAVORITE_RECIPES_TABLE} (recipe_id, result) VALUES (?1, ?2)"
                ),
                params![entity.result.recipe_id, blob],
            )?;
            Ok(conn.last_insert_rowid())
        } else {
            conn.execute(
                &format!(
                    "INSERT OR REPLACE INTO {FAVORITE_RECIPES_TABLE} (id, recipe_id, result) \
                     VALUES (?1, ?2, ?3)"
                ),
                params![entity.id, entity.result.recipe_id, blob],
            )?;
            Ok(entity.id)
        }
    }

    pub fn read_favorite_recipes(&self) -> Result<Vec<FavoritesEntity>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, result FROM {FAVORITE_RECIPES_TABLE} ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entities = Vec::new();
        for row in rows {
            let (id, blob) = row?;
            let result: Recipe = serde_json::from_str(&blob)?;
            entities.push(FavoritesEntity { id, result });
        }
        Ok(entities)
    }

    pub fn find_favorite_by_recipe_id(&self, recipe_id: i64) -> Result<Option<FavoritesEntity>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT id, result FROM {FAVORITE_RECIPES_TABLE} \
                     WHERE recipe_id = ?1 ORDER BY id ASC LIMIT 1"
                ),
                [recipe_id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((id, blob)) => Ok(Some(FavoritesEntity {
                id,
                result: serde_json::from_str(&blob)?,
            })),
            None => Ok(None),
        }
    }

    /// Returns whether a row was deleted
    pub fn delete_favorite_recipe(&self, entity: &FavoritesEntity) -> Result<bool> {
        let deleted = self.conn()?.execute(
            &format!("DELETE FROM {FAVORITE_RECIPES_TABLE} WHERE id = ?1"),
            [entity.id],
        )?;
        Ok(deleted > 0)
    }

    pub fn delete_all_favorite_recipes(&self) -> Result<usize> {
        let deleted = self
            .conn()?
            .execute(&format!("DELETE FROM {FAVORITE_RECIPES_TABLE}"), [])?;
        Ok(deleted)
    }

    // Food joke cache

    pub fn insert_food_joke(&self, entity: &FoodJokeEntity) -> Result<()> {
        self.conn()?.execute(
            &format!("INSERT OR REPLACE INTO {FOOD_JOKE_TABLE} (id, text) VALUES (?1, ?2)"),
            params![SINGLE_ROW_ID, entity.food_joke.text],
        )?;
        Ok(())
    }

    pub fn read_food_joke(&self) -> Result<Vec<FoodJokeEntity>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, text FROM {FOOD_JOKE_TABLE} ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(FoodJokeEntity {
                id: row.get(0)?,
                food_joke: FoodJoke { text: row.get(1)? },
            })
        })?;

        let mut entities = Vec::new();
        for row in rows {
            entities.push(row?);
        }
        Ok(entities)
    }

    // Key/value preferences

    pub fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                &format!("SELECT value FROM {PREFERENCES_TABLE} WHERE key = ?1"),
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write several preferences in one transaction
    pub fn set_preferences(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                &format!("INSERT OR REPLACE INTO {PREFERENCES_TABLE} (key, value) VALUES (?1, ?2)"),
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
