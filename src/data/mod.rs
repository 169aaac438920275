pub mod database;
pub mod local;
pub mod preferences;
pub mod remote;

pub use local::LocalDataSource;
pub use preferences::{MealAndDietType, PreferencesStore};
pub use remote::{ApiResponse, FoodRecipesApi, Queries, RemoteDataSource, SpoonacularApi};

/// Both data sources, handed to the view models as one unit
pub struct Repository {
    pub remote: RemoteDataSource,
    pub local: LocalDataSource,
}

impl Repository {
    pub fn new(remote: RemoteDataSource, local: LocalDataSource) -> Self {
        Self { remote, local }
    }
}
