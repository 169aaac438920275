use log::{info, warn};

use crate::config::QueryDefaults;
use crate::constants::{
    QUERY_ADD_RECIPE_INFORMATION, QUERY_API_KEY, QUERY_DIET, QUERY_FILL_INGREDIENTS,
    QUERY_NUMBER, QUERY_SEARCH, QUERY_TYPE,
};
use crate::data::{MealAndDietType, PreferencesStore, Queries};

pub const NO_INTERNET_CONNECTION: &str = "No Internet Connection.";
pub const BACK_ONLINE: &str = "We're back online.";

/// Builds API queries from the user's filter and tracks network status
/// transitions.
pub struct RecipesViewModel {
    preferences: PreferencesStore,
    defaults: QueryDefaults,
    api_key: String,
    meal_and_diet: Option<MealAndDietType>,
    pub network_status: bool,
    pub back_online: bool,
}

impl RecipesViewModel {
    pub fn new(preferences: PreferencesStore, defaults: QueryDefaults, api_key: String) -> Self {
        Self {
            preferences,
            defaults,
            api_key,
            meal_and_diet: None,
            network_status: false,
            back_online: false,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub async fn read_meal_and_diet_type(&self) -> MealAndDietType {
        self.preferences.read_meal_and_diet_type().await
    }

    pub async fn read_back_online(&self) -> bool {
        self.preferences.read_back_online().await
    }

    /// Adopt the stored selection as the current one
    pub async fn load_meal_and_diet_type(&mut self) {
        self.meal_and_diet = Some(self.preferences.read_meal_and_diet_type().await);
    }

    /// Remember a selection without persisting it
    pub fn save_meal_and_diet_type_temp(
        &mut self,
        meal_type: &str,
        meal_type_id: i32,
        diet_type: &str,
        diet_type_id: i32,
    ) {
        self.meal_and_diet = Some(MealAndDietType {
            selected_meal_type: meal_type.to_string(),
            selected_meal_type_id: meal_type_id,
            selected_diet_type: diet_type.to_string(),
            selected_diet_type_id: diet_type_id,
        });
    }

    /// Persist the current selection, if there is one
    pub async fn save_meal_and_diet_type(&self) {
        if let Some(selection) = &self.meal_and_diet {
            if let Err(e) = self.preferences.save_meal_and_diet_type(selection).await {
                warn!("Failed to save meal and diet type: {}", e);
            }
        }
    }

    pub fn apply_queries(&self) -> Queries {
        let mut queries = self.base_queries();

        let (meal_type, diet_type) = match &self.meal_and_diet {
            Some(selection) => (
                selection.selected_meal_type.clone(),
                selection.selected_diet_type.clone(),
            ),
            None => (
                self.defaults.meal_type.clone(),
                self.defaults.diet_type.clone(),
            ),
        };
        queries.insert(QUERY_TYPE.to_string(), meal_type);
        queries.insert(QUERY_DIET.to_string(), diet_type);

        queries
    }

    pub fn apply_search_query(&self, search_query: &str) -> Queries {
        let mut queries = self.base_queries();
        queries.insert(QUERY_SEARCH.to_string(), search_query.to_string());
        queries
    }

    fn base_queries(&self) -> Queries {
        let mut queries = Queries::new();
        queries.insert(
            QUERY_NUMBER.to_string(),
            self.defaults.recipes_number.clone(),
        );
        queries.insert(QUERY_API_KEY.to_string(), self.api_key.clone());
        queries.insert(QUERY_ADD_RECIPE_INFORMATION.to_string(), "true".to_string());
        queries.insert(QUERY_FILL_INGREDIENTS.to_string(), "true".to_string());
        queries
    }

    /// Message to show for the current `network_status`, if any.
    ///
    /// Going offline arms the "back online" notice; the next online check
    /// shows it once and disarms it.
    pub async fn show_network_status(&mut self) -> Option<&'static str> {
        if !self.network_status {
            self.save_back_online(true).await;
            info!("{}", NO_INTERNET_CONNECTION);
            Some(NO_INTERNET_CONNECTION)
        } else if self.back_online {
            self.save_back_online(false).await;
            info!("{}", BACK_ONLINE);
            Some(BACK_ONLINE)
        } else {
            None
        }
    }

    async fn save_back_online(&mut self, back_online: bool) {
        self.back_online = back_online;
        if let Err(e) = self.preferences.save_back_online(back_online).await {
            warn!("Failed to save back-online flag: {}", e);
        }
    }
}
