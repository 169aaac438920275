use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::constants::QUERY_API_KEY;
use crate::error::{MealMuseError, Result};
use crate::model::{FoodJoke, FoodRecipe};

/// Query-string parameters for a request, sorted by key
pub type Queries = BTreeMap<String, String>;

/// A received HTTP answer, before it is classified into a request state.
///
/// Transport failures never produce an `ApiResponse`; they surface as
/// `Err` from the [`FoodRecipesApi`] call instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    /// Reason phrase of the status line (may be empty)
    pub reason: String,
    /// Decoded body; only present for 2xx answers
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The recipe web API
#[async_trait]
pub trait FoodRecipesApi: Send + Sync {
    /// `GET /recipes/complexSearch` with a filter query
    async fn get_recipes(&self, queries: &Queries) -> Result<ApiResponse<FoodRecipe>>;

    /// `GET /recipes/complexSearch` with a free-text query
    async fn search_recipes(&self, queries: &Queries) -> Result<ApiResponse<FoodRecipe>>;

    /// `GET /food/jokes/random`
    async fn get_food_joke(&self, api_key: &str) -> Result<ApiResponse<FoodJoke>>;
}

/// reqwest-backed client for api.spoonacular.com
pub struct SpoonacularApi {
    client: Client,
    base_url: String,
}

impl SpoonacularApi {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mealmuse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        queries: &Queries,
    ) -> Result<ApiResponse<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} ({} query parameters)", url, queries.len());

        let response = self
            .client
            .get(&url)
            .query(queries)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        debug!("{} answered {}", url, status);

        if !status.is_success() {
            return Ok(ApiResponse {
                status: status.as_u16(),
                reason,
                body: None,
            });
        }

        let text = response.text().await.map_err(classify_transport_error)?;
        let body: T = serde_json::from_str(&text)?;

        Ok(ApiResponse {
            status: status.as_u16(),
            reason,
            body: Some(body),
        })
    }
}

fn classify_transport_error(err: reqwest::Error) -> MealMuseError {
    if err.is_timeout() {
        MealMuseError::Timeout
    } else {
        MealMuseError::Request(err)
    }
}

#[async_trait]
impl FoodRecipesApi for SpoonacularApi {
    async fn get_recipes(&self, queries: &Queries) -> Result<ApiResponse<FoodRecipe>> {
        self.get("/recipes/complexSearch", queries).await
    }

    async fn search_recipes(&self, queries: &Queries) -> Result<ApiResponse<FoodRecipe>> {
        self.get("/recipes/complexSearch", queries).await
    }

    async fn get_food_joke(&self, api_key: &str) -> Result<ApiResponse<FoodJoke>> {
        let mut queries = Queries::new();
        queries.insert(QUERY_API_KEY.to_string(), api_key.to_string());
        self.get("/food/jokes/random", &queries).await
    }
}

/// Remote half of the repository
pub struct RemoteDataSource {
    api: Box<dyn FoodRecipesApi>,
}

impl RemoteDataSource {
    pub fn new(api: Box<dyn FoodRecipesApi>) -> Self {
        Self { api }
    }

    pub async fn get_recipes(&self, queries: &Queries) -> Result<ApiResponse<FoodRecipe>> {
        self.api.get_recipes(queries).await
    }

    pub async fn search_recipes(&self, queries: &Queries) -> Result<ApiResponse<FoodRecipe>> {
        self.api.search_recipes(queries).await
    }

    pub async fn get_food_joke(&self, api_key: &str) -> Result<ApiResponse<FoodJoke>> {
        self.api.get_food_joke(api_key).await
    }
}
