use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::watch;

use crate::connectivity::Connectivity;
use crate::data::database::{FavoritesEntity, FoodJokeEntity, RecipesEntity};
use crate::data::{ApiResponse, Queries, Repository};
use crate::diff::RecipesDiff;
use crate::error::{MealMuseError, Resource, Result};
use crate::model::{FoodJoke, FoodRecipe};
use crate::network_result::NetworkResult;

/// Runs API requests against the offline cache and publishes their state.
///
/// Each request kind has its own watch channel. Subscribers always see the
/// latest state: `Loading` while a request is in flight, then its outcome.
/// Calls are not de-duplicated; concurrent calls race and the last cache
/// write wins.
pub struct MainViewModel {
    repository: Repository,
    connectivity: Arc<dyn Connectivity>,
    recipes_response: watch::Sender<NetworkResult<FoodRecipe>>,
    searched_recipes_response: watch::Sender<NetworkResult<FoodRecipe>>,
    food_joke_response: watch::Sender<NetworkResult<FoodJoke>>,
}

impl MainViewModel {
    pub fn new(repository: Repository, connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            repository,
            connectivity,
            recipes_response: watch::channel(NetworkResult::Loading).0,
            searched_recipes_response: watch::channel(NetworkResult::Loading).0,
            food_joke_response: watch::channel(NetworkResult::Loading).0,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn recipes_response(&self) -> watch::Receiver<NetworkResult<FoodRecipe>> {
        self.recipes_response.subscribe()
    }

    pub fn searched_recipes_response(&self) -> watch::Receiver<NetworkResult<FoodRecipe>> {
        self.searched_recipes_response.subscribe()
    }

    pub fn food_joke_response(&self) -> watch::Receiver<NetworkResult<FoodJoke>> {
        self.food_joke_response.subscribe()
    }

    // Local database

    pub async fn read_recipes(&self) -> Result<Vec<RecipesEntity>> {
        self.repository.local.read_recipes().await
    }

    pub async fn read_favorite_recipes(&self) -> Result<Vec<FavoritesEntity>> {
        self.repository.local.read_favorite_recipes().await
    }

    pub async fn read_food_joke(&self) -> Result<Vec<FoodJokeEntity>> {
        self.repository.local.read_food_joke().await
    }

    pub async fn insert_favorite_recipe(&self, favorite: FavoritesEntity) -> Result<i64> {
        self.repository.local.insert_favorite_recipe(favorite).await
    }

    pub async fn delete_favorite_recipe(&self, favorite: FavoritesEntity) -> Result<bool> {
        self.repository.local.delete_favorite_recipe(favorite).await
    }

    pub async fn delete_all_favorite_recipes(&self) -> Result<usize> {
        self.repository.local.delete_all_favorite_recipes().await
    }

    // Network

    /// Fetch recipes for a filter query.
    ///
    /// Success replaces the offline cache. Any failure returns an error that
    /// carries the previously cached recipes, if there are any.
    pub async fn get_recipes(&self, queries: &Queries) -> NetworkResult<FoodRecipe> {
        self.recipes_response.send_replace(NetworkResult::Loading);

        let outcome = match self.ensure_online().await {
            Ok(()) => self
                .repository
                .remote
                .get_recipes(queries)
                .await
                .and_then(handle_food_recipes_response),
            Err(e) => Err(e),
        };

        let state = match outcome {
            Ok(food_recipe) => {
                self.offline_cache_recipes(&food_recipe).await;
                NetworkResult::Success(food_recipe)
            }
            Err(e) => {
                warn!("Fetching recipes failed: {}", e);
                NetworkResult::error(e.user_message(Resource::Recipes))
                    .with_cached(self.cached_recipes().await)
            }
        };

        self.recipes_response.send_replace(state.clone());
        state
    }

    /// Free-text search. Results are never cached.
    pub async fn search_recipes(&self, queries: &Queries) -> NetworkResult<FoodRecipe> {
        self.searched_recipes_response
            .send_replace(NetworkResult::Loading);

        let outcome = match self.ensure_online().await {
            Ok(()) => self
                .repository
                .remote
                .search_recipes(queries)
                .await
                .and_then(handle_food_recipes_response),
            Err(e) => Err(e),
        };

        let state = match outcome {
            Ok(food_recipe) => NetworkResult::Success(food_recipe),
            Err(e) => {
                warn!("Searching recipes failed: {}", e);
                NetworkResult::error(e.user_message(Resource::Recipes))
                    .with_cached(self.cached_recipes().await)
            }
        };

        self.searched_recipes_response.send_replace(state.clone());
        state
    }

    /// Fetch a random joke, caching it like the recipe list
    pub async fn get_food_joke(&self, api_key: &str) -> NetworkResult<FoodJoke> {
        self.food_joke_response.send_replace(NetworkResult::Loading);

        let outcome = match self.ensure_online().await {
            Ok(()) => self
                .repository
                .remote
                .get_food_joke(api_key)
                .await
                .and_then(handle_food_joke_response),
            Err(e) => Err(e),
        };

        let state = match outcome {
            Ok(food_joke) => {
                self.offline_cache_food_joke(&food_joke).await;
                NetworkResult::Success(food_joke)
            }
            Err(e) => {
                warn!("Fetching food joke failed: {}", e);
                NetworkResult::error(e.user_message(Resource::FoodJoke))
                    .with_cached(self.cached_food_joke().await)
            }
        };

        self.food_joke_response.send_replace(state.clone());
        state
    }

    async fn ensure_online(&self) -> Result<()> {
        if self.connectivity.has_internet_connection().await {
            Ok(())
        } else {
            Err(MealMuseError::NoInternetConnection)
        }
    }

    async fn offline_cache_recipes(&self, food_recipe: &FoodRecipe) {
        if let Some(previous) = self.cached_recipes().await {
            let diff = RecipesDiff::new(&previous.results, &food_recipe.results).calculate();
            debug!(
                "Refresh: {} new, {} changed, {} gone",
                diff.inserted.len(),
                diff.changed.len(),
                diff.removed.len()
            );
        }

        let entity = RecipesEntity::new(food_recipe.clone());
        match self.repository.local.insert_recipes(entity).await {
            Ok(()) => info!("Cached {} recipes", food_recipe.results.len()),
            Err(e) => warn!("Failed to cache recipes: {}", e),
        }
    }

    async fn offline_cache_food_joke(&self, food_joke: &FoodJoke) {
        let entity = FoodJokeEntity::new(food_joke.clone());
        if let Err(e) = self.repository.local.insert_food_joke(entity).await {
            warn!("Failed to cache food joke: {}", e);
        }
    }

    async fn cached_recipes(&self) -> Option<FoodRecipe> {
        match self.repository.local.read_recipes().await {
            Ok(entities) => entities.into_iter().next().map(|e| e.food_recipe),
            Err(e) => {
                warn!("Failed to read cached recipes: {}", e);
                None
            }
        }
    }

    async fn cached_food_joke(&self) -> Option<FoodJoke> {
        match self.repository.local.read_food_joke().await {
            Ok(entities) => entities.into_iter().next().map(|e| e.food_joke),
            Err(e) => {
                warn!("Failed to read cached food joke: {}", e);
                None
            }
        }
    }
}

/// Classify a recipes answer: 402, then empty results, then other failures
pub fn handle_food_recipes_response(response: ApiResponse<FoodRecipe>) -> Result<FoodRecipe> {
    if response.status == 402 {
        return Err(MealMuseError::ApiKeyLimited);
    }
    if !response.is_successful() {
        return Err(MealMuseError::Http {
            status: response.status,
            reason: response.reason,
        });
    }
    match response.body {
        Some(food_recipe) if !food_recipe.is_empty() => Ok(food_recipe),
        _ => Err(MealMuseError::NoResults),
    }
}

pub fn handle_food_joke_response(response: ApiResponse<FoodJoke>) -> Result<FoodJoke> {
    if response.status == 402 {
        return Err(MealMuseError::ApiKeyLimited);
    }
    match response.body {
        Some(food_joke) if response.is_successful() => Ok(food_joke),
        _ => Err(MealMuseError::Http {
            status: response.status,
            reason: response.reason,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Recipe;

    fn response<T>(status: u16, reason: &str, body: Option<T>) -> ApiResponse<T> {
        ApiResponse {
            status,
            reason: reason.to_string(),
            body,
        }
    }

    fn one_recipe() -> FoodRecipe {
        FoodRecipe {
            results: vec![Recipe {
                recipe_id: 1,
                title: "Soup".to_string(),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_recipes_402_is_api_key_limited() {
        let err = handle_food_recipes_response(response(402, "Payment Required", None))
            .unwrap_err();
        assert!(matches!(err, MealMuseError::ApiKeyLimited));
        assert_eq!(err.user_message(Resource::Recipes), "API Key Limitada");
    }

    #[test]
    fn test_recipes_empty_results() {
        let err = handle_food_recipes_response(response(200, "OK", Some(FoodRecipe::default())))
            .unwrap_err();
        assert!(matches!(err, MealMuseError::NoResults));

        let err = handle_food_recipes_response(response(204, "No Content", None)).unwrap_err();
        assert!(matches!(err, MealMuseError::NoResults));
    }

    #[test]
    fn test_recipes_success() {
        let food_recipe =
            handle_food_recipes_response(response(200, "OK", Some(one_recipe()))).unwrap();
        assert_eq!(food_recipe, one_recipe());
    }

    #[test]
    fn test_recipes_other_status_uses_reason() {
        let err = handle_food_recipes_response(response(401, "Unauthorized", None)).unwrap_err();
        assert_eq!(err.user_message(Resource::Recipes), "Unauthorized");
    }

    #[test]
    fn test_food_joke_classification() {
        let err = handle_food_joke_response(response(402, "Payment Required", None)).unwrap_err();
        assert_eq!(err.user_message(Resource::FoodJoke), "API Key Limited.");

        let joke = FoodJoke {
            text: "Lettuce romaine calm.".to_string(),
        };
        assert_eq!(
            handle_food_joke_response(response(200, "OK", Some(joke.clone()))).unwrap(),
            joke
        );

        let err = handle_food_joke_response(response(503, "Service Unavailable", None))
            .unwrap_err();
        assert_eq!(err.user_message(Resource::FoodJoke), "Service Unavailable");
    }
}
