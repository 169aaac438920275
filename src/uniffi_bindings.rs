//! UniFFI bindings for mealmuse
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.
//! The host app owns connectivity tracking and passes its current view in
//! [`FfiClientConfig::online`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::connectivity::StaticConnectivity;
use crate::{
    ExtendedIngredient, FavoritesEntity, FoodJoke, FoodRecipe, MealMuse, MealMuseError,
    NetworkResult, Recipe,
};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible ingredient
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiIngredient {
    pub amount: f64,
    pub consistency: String,
    pub image: Option<String>,
    pub name: String,
    pub original: String,
    pub unit: String,
}

/// FFI-compatible recipe structure
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub recipe_id: i64,
    pub title: String,
    pub summary: String,
    pub image: Option<String>,
    pub ready_in_minutes: u32,
    pub aggregate_likes: u32,
    pub vegan: bool,
    pub vegetarian: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub very_healthy: bool,
    pub cheap: bool,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub ingredients: Vec<FfiIngredient>,
}

impl From<ExtendedIngredient> for FfiIngredient {
    fn from(ingredient: ExtendedIngredient) -> Self {
        FfiIngredient {
            amount: ingredient.amount,
            consistency: ingredient.consistency,
            image: ingredient.image,
            name: ingredient.name,
            original: ingredient.original,
            unit: ingredient.unit,
        }
    }
}

impl From<FfiIngredient> for ExtendedIngredient {
    fn from(ffi: FfiIngredient) -> Self {
        ExtendedIngredient {
            amount: ffi.amount,
            consistency: ffi.consistency,
            image: ffi.image,
            name: ffi.name,
            original: ffi.original,
            unit: ffi.unit,
        }
    }
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            recipe_id: recipe.recipe_id,
            title: recipe.title,
            summary: recipe.summary,
            image: recipe.image,
            ready_in_minutes: recipe.ready_in_minutes,
            aggregate_likes: recipe.aggregate_likes,
            vegan: recipe.vegan,
            vegetarian: recipe.vegetarian,
            gluten_free: recipe.gluten_free,
            dairy_free: recipe.dairy_free,
            very_healthy: recipe.very_healthy,
            cheap: recipe.cheap,
            source_url: recipe.source_url,
            source_name: recipe.source_name,
            ingredients: recipe
                .extended_ingredients
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl From<FfiRecipe> for Recipe {
    fn from(ffi: FfiRecipe) -> Self {
        Recipe {
            recipe_id: ffi.recipe_id,
            title: ffi.title,
            summary: ffi.summary,
            image: ffi.image,
            ready_in_minutes: ffi.ready_in_minutes,
            aggregate_likes: ffi.aggregate_likes,
            vegan: ffi.vegan,
            vegetarian: ffi.vegetarian,
            gluten_free: ffi.gluten_free,
            dairy_free: ffi.dairy_free,
            very_healthy: ffi.very_healthy,
            cheap: ffi.cheap,
            source_url: ffi.source_url,
            source_name: ffi.source_name,
            extended_ingredients: ffi.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

fn ffi_recipes(food_recipe: FoodRecipe) -> Vec<FfiRecipe> {
    food_recipe.results.into_iter().map(Into::into).collect()
}

/// A stored favorite
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiFavorite {
    pub id: i64,
    pub recipe: FfiRecipe,
}

impl From<FavoritesEntity> for FfiFavorite {
    fn from(entity: FavoritesEntity) -> Self {
        FfiFavorite {
            id: entity.id,
            recipe: entity.result.into(),
        }
    }
}

/// Outcome of a recipes request
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiRecipesResult {
    Success {
        recipes: Vec<FfiRecipe>,
    },
    /// `cached` holds the last successful list, if any
    Error {
        message: String,
        cached: Option<Vec<FfiRecipe>>,
    },
}

impl From<NetworkResult<FoodRecipe>> for FfiRecipesResult {
    fn from(state: NetworkResult<FoodRecipe>) -> Self {
        match state {
            NetworkResult::Success(food_recipe) => FfiRecipesResult::Success {
                recipes: ffi_recipes(food_recipe),
            },
            NetworkResult::Error { message, data } => FfiRecipesResult::Error {
                message,
                cached: data.map(ffi_recipes),
            },
            // Requests are awaited to completion before converting
            NetworkResult::Loading => FfiRecipesResult::Error {
                message: "Request still in progress".to_string(),
                cached: None,
            },
        }
    }
}

/// Outcome of a food joke request
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiFoodJokeResult {
    Success { text: String },
    Error { message: String, cached: Option<String> },
}

impl From<NetworkResult<FoodJoke>> for FfiFoodJokeResult {
    fn from(state: NetworkResult<FoodJoke>) -> Self {
        match state {
            NetworkResult::Success(joke) => FfiFoodJokeResult::Success { text: joke.text },
            NetworkResult::Error { message, data } => FfiFoodJokeResult::Error {
                message,
                cached: data.map(|joke| joke.text),
            },
            NetworkResult::Loading => FfiFoodJokeResult::Error {
                message: "Request still in progress".to_string(),
                cached: None,
            },
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiMealMuseError {
    /// Local database failure
    DatabaseError { message: String },
    /// Missing API key or bad configuration
    ConfigError { message: String },
    /// Invalid input provided
    InvalidInput { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiMealMuseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiMealMuseError::DatabaseError { message } => write!(f, "Database error: {}", message),
            FfiMealMuseError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiMealMuseError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            FfiMealMuseError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiMealMuseError {}

impl From<MealMuseError> for FfiMealMuseError {
    fn from(err: MealMuseError) -> Self {
        let message = err.to_string();
        match err {
            MealMuseError::Database(_)
            | MealMuseError::LockPoisoned
            | MealMuseError::Serialization(_)
            | MealMuseError::Io(_) => FfiMealMuseError::DatabaseError { message },
            MealMuseError::Config(_) | MealMuseError::MissingApiKey | MealMuseError::Builder(_) => {
                FfiMealMuseError::ConfigError { message }
            }
            MealMuseError::RecipeNotCached(_) => FfiMealMuseError::InvalidInput { message },
            MealMuseError::Task(_) => FfiMealMuseError::RuntimeError { message },
            // Request failures are reported through the result types, not as errors
            _ => FfiMealMuseError::RuntimeError { message },
        }
    }
}

/// Configuration for every call
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiClientConfig {
    /// SQLite file inside the app's private storage
    pub database_path: String,
    /// API key (uses SPOONACULAR_API_KEY if not specified)
    pub api_key: Option<String>,
    /// Optional base URL override
    pub base_url: Option<String>,
    /// Optional timeout in seconds (uses default if not specified)
    pub timeout_seconds: Option<u64>,
    /// The host's current connectivity state
    pub online: bool,
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiMealMuseError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiMealMuseError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

async fn build_app(config: FfiClientConfig) -> Result<MealMuse, FfiMealMuseError> {
    if config.database_path.trim().is_empty() {
        return Err(FfiMealMuseError::InvalidInput {
            message: "database_path cannot be empty".to_string(),
        });
    }

    let mut builder = MealMuse::builder()
        .database_path(config.database_path)
        .connectivity(Arc::new(StaticConnectivity(config.online)));

    if let Some(api_key) = config.api_key {
        builder = builder.api_key(api_key);
    }

    if let Some(base_url) = config.base_url {
        builder = builder.base_url(base_url);
    }

    if let Some(timeout_secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    Ok(builder.build().await?)
}

/// Fetch recipes for a meal/diet filter, falling back to the offline cache
///
/// Without explicit filters the stored selection is used.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn fetch_recipes(
    config: FfiClientConfig,
    meal_type: Option<String>,
    diet_type: Option<String>,
) -> Result<FfiRecipesResult, FfiMealMuseError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let mut app = build_app(config).await?;
        app.require_api_key()?;

        app.recipes.load_meal_and_diet_type().await;
        let stored = app.recipes.read_meal_and_diet_type().await;
        if meal_type.is_some() || diet_type.is_some() {
            app.recipes.save_meal_and_diet_type_temp(
                meal_type.as_deref().unwrap_or(&stored.selected_meal_type),
                stored.selected_meal_type_id,
                diet_type.as_deref().unwrap_or(&stored.selected_diet_type),
                stored.selected_diet_type_id,
            );
        }

        let queries = app.recipes.apply_queries();
        Ok(app.main.get_recipes(&queries).await.into())
    })
}

/// Free-text recipe search
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn search_recipes(
    config: FfiClientConfig,
    query: String,
) -> Result<FfiRecipesResult, FfiMealMuseError> {
    if query.trim().is_empty() {
        return Err(FfiMealMuseError::InvalidInput {
            message: "Search query cannot be empty".to_string(),
        });
    }

    let rt = create_runtime()?;
    rt.block_on(async {
        let app = build_app(config).await?;
        app.require_api_key()?;
        let queries = app.recipes.apply_search_query(&query);
        Ok(app.main.search_recipes(&queries).await.into())
    })
}

/// Fetch a random food joke
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_food_joke(config: FfiClientConfig) -> Result<FfiFoodJokeResult, FfiMealMuseError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let app = build_app(config).await?;
        let api_key = app.require_api_key()?.to_string();
        Ok(app.main.get_food_joke(&api_key).await.into())
    })
}

/// Recipes from the last successful fetch
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn read_cached_recipes(
    config: FfiClientConfig,
) -> Result<Option<Vec<FfiRecipe>>, FfiMealMuseError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let app = build_app(config).await?;
        let cached = app.main.read_recipes().await?;
        Ok(cached
            .into_iter()
            .next()
            .map(|entity| ffi_recipes(entity.food_recipe)))
    })
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn list_favorites(config: FfiClientConfig) -> Result<Vec<FfiFavorite>, FfiMealMuseError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let app = build_app(config).await?;
        let favorites = app.main.read_favorite_recipes().await?;
        Ok(favorites.into_iter().map(Into::into).collect())
    })
}

/// Save a recipe as favorite and return its favorite id
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn add_favorite(config: FfiClientConfig, recipe: FfiRecipe) -> Result<i64, FfiMealMuseError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let app = build_app(config).await?;
        let id = app
            .main
            .insert_favorite_recipe(FavoritesEntity::new(recipe.into()))
            .await?;
        Ok(id)
    })
}

/// Remove a favorite by id; returns whether it existed
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn remove_favorite(config: FfiClientConfig, id: i64) -> Result<bool, FfiMealMuseError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let app = build_app(config).await?;
        let favorite = app
            .main
            .read_favorite_recipes()
            .await?
            .into_iter()
            .find(|favorite| favorite.id == id);
        match favorite {
            Some(favorite) => Ok(app.main.delete_favorite_recipe(favorite).await?),
            None => Ok(false),
        }
    })
}

/// Remove every favorite; returns how many were removed
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn clear_favorites(config: FfiClientConfig) -> Result<u64, FfiMealMuseError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let app = build_app(config).await?;
        Ok(app.main.delete_all_favorite_recipes().await? as u64)
    })
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
