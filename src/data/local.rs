use std::sync::Arc;

use crate::data::database::{FavoritesEntity, FoodJokeEntity, RecipesDatabase, RecipesEntity};
use crate::error::Result;

/// Local half of the repository.
///
/// SQLite calls block, so each one runs on tokio's blocking pool.
#[derive(Clone)]
pub struct LocalDataSource {
    db: Arc<RecipesDatabase>,
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

impl LocalDataSource {
    pub fn new(db: Arc<RecipesDatabase>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> Arc<RecipesDatabase> {
        Arc::clone(&self.db)
    }

    pub async fn read_recipes(&self) -> Result<Vec<RecipesEntity>> {
        let db = self.database();
        run_blocking(move || db.read_recipes()).await
    }

    pub async fn insert_recipes(&self, entity: RecipesEntity) -> Result<()> {
        let db = self.database();
        run_blocking(move || db.insert_recipes(&entity)).await
    }

    pub async fn read_favorite_recipes(&self) -> Result<Vec<FavoritesEntity>> {
        let db = self.database();
        run_blocking(move || db.read_favorite_recipes()).await
    }

    pub async fn find_favorite_by_recipe_id(
        &self,
        recipe_id: i64,
    ) -> Result<Option<FavoritesEntity>> {
        let db = self.database();
        run_blocking(move || db.find_favorite_by_recipe_id(recipe_id)).await
    }

    pub async fn insert_favorite_recipe(&self, entity: FavoritesEntity) -> Result<i64> {
        let db = self.database();
        run_blocking(move || db.insert_favorite_recipe(&entity)).await
    }

    pub async fn delete_favorite_recipe(&self, entity: FavoritesEntity) -> Result<bool> {
        let db = self.database();
        run_blocking(move || db.delete_favorite_recipe(&entity)).await
    }

    pub async fn delete_all_favorite_recipes(&self) -> Result<usize> {
        let db = self.database();
        run_blocking(move || db.delete_all_favorite_recipes()).await
    }

    pub async fn read_food_joke(&self) -> Result<Vec<FoodJokeEntity>> {
        let db = self.database();
        run_blocking(move || db.read_food_joke()).await
    }

    pub async fn insert_food_joke(&self, entity: FoodJokeEntity) -> Result<()> {
        let db = self.database();
        run_blocking(move || db.insert_food_joke(&entity)).await
    }

    pub(crate) async fn get_preference(&self, key: &'static str) -> Result<Option<String>> {
        let db = self.database();
        run_blocking(move || db.get_preference(key)).await
    }

    pub(crate) async fn set_preferences(&self, entries: Vec<(&'static str, String)>) -> Result<()> {
        let db = self.database();
        run_blocking(move || db.set_preferences(&entries)).await
    }
}
