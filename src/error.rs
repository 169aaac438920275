use thiserror::Error;

/// Which API resource a request was made for.
///
/// The recipe and joke endpoints report some failures with different
/// user-facing wording, so messages are resolved per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Recipes,
    FoodJoke,
}

/// Errors that can occur while fetching, caching or storing recipes
#[derive(Error, Debug)]
pub enum MealMuseError {
    /// The connectivity check reported no usable network
    #[error("No internet connection")]
    NoInternetConnection,

    /// The HTTP request timed out
    #[error("Request timed out")]
    Timeout,

    /// The API answered 402: the key's daily quota is used up
    #[error("API key quota exhausted (HTTP 402)")]
    ApiKeyLimited,

    /// The API answered successfully but without any recipe
    #[error("No recipes found")]
    NoResults,

    /// Any other non-2xx answer
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    /// Transport level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Local database failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Another thread panicked while holding the database connection
    #[error("Database connection lock poisoned")]
    LockPoisoned,

    /// Malformed JSON, either from the API or from a cached blob
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// A favorite can only be made from a recipe in the offline cache
    #[error("Recipe {0} is not in the local cache; fetch it first")]
    RecipeNotCached(i64),

    /// No API key in config, builder or environment
    #[error("No Spoonacular API key configured (set MEALMUSE__API__API_KEY or SPOONACULAR_API_KEY)")]
    MissingApiKey,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking database task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl MealMuseError {
    /// Map the error to the message shown to the user for `resource`.
    pub fn user_message(&self, resource: Resource) -> String {
        match self {
            MealMuseError::NoInternetConnection => "No Internet Connection.".to_string(),
            MealMuseError::Timeout => "Timeout".to_string(),
            MealMuseError::ApiKeyLimited => match resource {
                Resource::Recipes => "API Key Limitada".to_string(),
                Resource::FoodJoke => "API Key Limited.".to_string(),
            },
            MealMuseError::NoResults => "Recetas no encontradas".to_string(),
            MealMuseError::Http { status, reason } => {
                if reason.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    reason.clone()
                }
            }
            MealMuseError::Request(e) if e.is_timeout() => "Timeout".to_string(),
            _ => "Recipes not found.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MealMuseError>;
