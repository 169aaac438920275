//! Recipe search client for the Spoonacular API with an offline cache.
//!
//! Every request goes through the same flow: check connectivity, call the
//! API, cache a successful answer locally, and on any failure fall back to
//! the last cached answer. The outcome is reported as a [`NetworkResult`].
//!
//! ```no_run
//! use mealmuse::{AppConfig, MealMuse, NetworkResult};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = MealMuse::builder().config(AppConfig::load()?).build().await?;
//! let queries = app.recipes.apply_queries();
//!
//! match app.main.get_recipes(&queries).await {
//!     NetworkResult::Success(food_recipe) => println!("{} recipes", food_recipe.results.len()),
//!     NetworkResult::Error { message, data } => {
//!         eprintln!("{}", message);
//!         if let Some(cached) = data {
//!             println!("{} cached recipes", cached.results.len());
//!         }
//!     }
//!     NetworkResult::Loading => {}
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod data;
pub mod diff;
pub mod error;
pub mod model;
pub mod network_result;
pub mod uniffi_bindings;
pub mod viewmodels;

pub use builder::{MealMuse, MealMuseBuilder};
pub use config::AppConfig;
pub use connectivity::{Connectivity, NetworkListener, StaticConnectivity};
pub use data::database::{FavoritesEntity, FoodJokeEntity, RecipesEntity};
pub use data::{ApiResponse, FoodRecipesApi, MealAndDietType, Queries};
pub use error::{MealMuseError, Resource};
pub use model::{ExtendedIngredient, FoodJoke, FoodRecipe, Recipe};
pub use network_result::NetworkResult;
pub use viewmodels::{MainViewModel, RecipesViewModel};
