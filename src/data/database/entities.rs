use serde::{Deserialize, Serialize};

use crate::model::{FoodJoke, FoodRecipe, Recipe};

/// Fixed key of the single-row caches
pub const SINGLE_ROW_ID: i64 = 0;

/// Last successful recipe list. Only one row ever exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipesEntity {
    pub id: i64,
    pub food_recipe: FoodRecipe,
}

impl RecipesEntity {
    pub fn new(food_recipe: FoodRecipe) -> Self {
        Self {
            id: SINGLE_ROW_ID,
            food_recipe,
        }
    }
}

/// A recipe the user marked as favorite.
///
/// An `id` of 0 asks the database to generate one on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesEntity {
    pub id: i64,
    pub result: Recipe,
}

impl FavoritesEntity {
    pub fn new(result: Recipe) -> Self {
        Self { id: 0, result }
    }
}

/// Last fetched joke. Only one row ever exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodJokeEntity {
    pub id: i64,
    pub food_joke: FoodJoke,
}

impl FoodJokeEntity {
    pub fn new(food_joke: FoodJoke) -> Self {
        Self {
            id: SINGLE_ROW_ID,
            food_joke,
        }
    }
}
