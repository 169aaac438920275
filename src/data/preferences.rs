use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DIET_TYPE, DEFAULT_MEAL_TYPE, PREFERENCES_BACK_ONLINE, PREFERENCES_DIET_TYPE,
    PREFERENCES_DIET_TYPE_ID, PREFERENCES_MEAL_TYPE, PREFERENCES_MEAL_TYPE_ID,
};
use crate::data::local::LocalDataSource;
use crate::error::Result;

/// The meal and diet filter picked by the user.
///
/// The ids are the positions of the picked chips in the filter sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealAndDietType {
    pub selected_meal_type: String,
    pub selected_meal_type_id: i32,
    pub selected_diet_type: String,
    pub selected_diet_type_id: i32,
}

impl Default for MealAndDietType {
    fn default() -> Self {
        Self {
            selected_meal_type: DEFAULT_MEAL_TYPE.to_string(),
            selected_meal_type_id: 0,
            selected_diet_type: DEFAULT_DIET_TYPE.to_string(),
            selected_diet_type_id: 0,
        }
    }
}

/// Persisted user preferences
#[derive(Clone)]
pub struct PreferencesStore {
    local: LocalDataSource,
}

impl PreferencesStore {
    pub fn new(local: LocalDataSource) -> Self {
        Self { local }
    }

    pub async fn save_meal_and_diet_type(&self, selection: &MealAndDietType) -> Result<()> {
        self.local
            .set_preferences(vec![
                (PREFERENCES_MEAL_TYPE, selection.selected_meal_type.clone()),
                (
                    PREFERENCES_MEAL_TYPE_ID,
                    selection.selected_meal_type_id.to_string(),
                ),
                (PREFERENCES_DIET_TYPE, selection.selected_diet_type.clone()),
                (
                    PREFERENCES_DIET_TYPE_ID,
                    selection.selected_diet_type_id.to_string(),
                ),
            ])
            .await
    }

    pub async fn save_back_online(&self, back_online: bool) -> Result<()> {
        self.local
            .set_preferences(vec![(PREFERENCES_BACK_ONLINE, back_online.to_string())])
            .await
    }

    /// Stored selection, with defaults for anything missing or unreadable
    pub async fn read_meal_and_diet_type(&self) -> MealAndDietType {
        let defaults = MealAndDietType::default();
        MealAndDietType {
            selected_meal_type: self
                .read(PREFERENCES_MEAL_TYPE)
                .await
                .unwrap_or(defaults.selected_meal_type),
            selected_meal_type_id: self
                .read(PREFERENCES_MEAL_TYPE_ID)
                .await
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.selected_meal_type_id),
            selected_diet_type: self
                .read(PREFERENCES_DIET_TYPE)
                .await
                .unwrap_or(defaults.selected_diet_type),
            selected_diet_type_id: self
                .read(PREFERENCES_DIET_TYPE_ID)
                .await
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.selected_diet_type_id),
        }
    }

    pub async fn read_back_online(&self) -> bool {
        self.read(PREFERENCES_BACK_ONLINE)
            .await
            .and_then(|v| v.parse().ok())
            .unwrap_or(false)
    }

    async fn read(&self, key: &'static str) -> Option<String> {
        match self.local.get_preference(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read preference '{}': {}", key, e);
                None
            }
        }
    }
}
