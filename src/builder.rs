use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::connectivity::{Connectivity, NetworkListener, StaticConnectivity};
use crate::data::database::RecipesDatabase;
use crate::data::{
    FoodRecipesApi, LocalDataSource, PreferencesStore, RemoteDataSource, Repository,
    SpoonacularApi,
};
use crate::error::{MealMuseError, Result};
use crate::viewmodels::{MainViewModel, RecipesViewModel};

/// Where the local database lives
#[derive(Debug, Clone)]
enum Storage {
    File(PathBuf),
    InMemory,
}

/// Upper bound for the connectivity probe, independent of the request timeout
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for wiring the data sources and view models together
#[derive(Default)]
pub struct MealMuseBuilder {
    config: Option<AppConfig>,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    storage: Option<Storage>,
    offline: bool,
    connectivity: Option<Arc<dyn Connectivity>>,
    api: Option<Box<dyn FoodRecipesApi>>,
}

impl MealMuseBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// # Example
    /// ```no_run
    /// # use mealmuse::{AppConfig, MealMuse};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let app = MealMuse::builder()
    ///     .config(AppConfig::load()?)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the API base URL (proxies, tests)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the Spoonacular API key
    ///
    /// # Example
    /// ```
    /// use mealmuse::MealMuse;
    ///
    /// let builder = MealMuse::builder().api_key("your-api-key");
    /// ```
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Store the cache in this SQLite file
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage = Some(Storage::File(path.into()));
        self
    }

    /// Keep the cache in memory only
    pub fn in_memory(mut self) -> Self {
        self.storage = Some(Storage::InMemory);
        self
    }

    /// Treat the network as unavailable: every request falls back to the cache
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Use a custom connectivity check
    pub fn connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    /// Use a custom API client instead of the reqwest one
    pub fn api(mut self, api: Box<dyn FoodRecipesApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Open the database and assemble both view models
    ///
    /// # Errors
    /// Returns `MealMuseError` if the HTTP client cannot be created or the
    /// database cannot be opened or migrated.
    pub async fn build(self) -> Result<MealMuse> {
        let config = self.config.unwrap_or_default();

        let base_url = self.base_url.unwrap_or_else(|| config.api.base_url.clone());
        let timeout = self.timeout.unwrap_or_else(|| config.api.timeout());
        let api_key = self.api_key.or_else(|| config.api.resolve_api_key());
        if api_key.is_none() {
            warn!("No API key configured; only cached data will be available");
        }

        let api = match self.api {
            Some(api) => api,
            None => Box::new(SpoonacularApi::new(base_url.clone(), Some(timeout))?),
        };

        let storage = self
            .storage
            .unwrap_or_else(|| Storage::File(config.database.resolve_path()));
        debug!("Using storage {:?}", storage);
        let db = match storage {
            Storage::File(path) => RecipesDatabase::open(&path)?,
            Storage::InMemory => RecipesDatabase::open_in_memory()?,
        };
        let local = LocalDataSource::new(Arc::new(db));

        let connectivity: Arc<dyn Connectivity> = if self.offline {
            Arc::new(StaticConnectivity(false))
        } else if let Some(connectivity) = self.connectivity {
            connectivity
        } else {
            match NetworkListener::for_base_url(&base_url, timeout.min(PROBE_TIMEOUT)) {
                Some(listener) => Arc::new(listener),
                None => {
                    return Err(MealMuseError::Builder(format!(
                        "Cannot derive a host to probe from base URL '{}'",
                        base_url
                    )))
                }
            }
        };

        let repository = Repository::new(RemoteDataSource::new(api), local.clone());
        let main = MainViewModel::new(repository, Arc::clone(&connectivity));

        let mut recipes = RecipesViewModel::new(
            PreferencesStore::new(local),
            config.defaults.clone(),
            api_key.unwrap_or_default(),
        );
        recipes.back_online = recipes.read_back_online().await;

        Ok(MealMuse {
            main,
            recipes,
            connectivity,
        })
    }
}

/// The assembled client: both view models plus the shared connectivity check
pub struct MealMuse {
    pub main: MainViewModel,
    pub recipes: RecipesViewModel,
    connectivity: Arc<dyn Connectivity>,
}

impl MealMuse {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use mealmuse::MealMuse;
    ///
    /// let builder = MealMuse::builder();
    /// ```
    pub fn builder() -> MealMuseBuilder {
        MealMuseBuilder::default()
    }

    /// Fails with `MissingApiKey` when no key was configured
    pub fn require_api_key(&self) -> Result<&str> {
        match self.recipes.api_key() {
            "" => Err(MealMuseError::MissingApiKey),
            key => Ok(key),
        }
    }

    /// Re-check connectivity and return the status notice to show, if any
    pub async fn refresh_network_status(&mut self) -> Option<&'static str> {
        self.recipes.network_status = self.connectivity.has_internet_connection().await;
        self.recipes.show_network_status().await
    }
}
