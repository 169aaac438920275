use scraper::Html;
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response body of `/recipes/complexSearch`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FoodRecipe {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Recipe>,
}

impl FoodRecipe {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A single recipe as returned with `addRecipeInformation=true`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "id")]
    pub recipe_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// HTML summary as sent by the API
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ready_in_minutes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aggregate_likes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vegan: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vegetarian: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gluten_free: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dairy_free: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub very_healthy: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cheap: bool,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extended_ingredients: Vec<ExtendedIngredient>,
}

impl Recipe {
    /// The summary with HTML markup removed
    pub fn summary_text(&self) -> String {
        let fragment = Html::parse_fragment(&self.summary);
        let text: String = fragment.root_element().text().collect();
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtendedIngredient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub consistency: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
}

/// Response body of `/food/jokes/random`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoodJoke {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}
